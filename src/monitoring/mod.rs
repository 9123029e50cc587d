/*!
 * Monitoring
 * Structured tracing for benchmark runs
 */

mod tracer;

pub use tracer::init_tracing;
