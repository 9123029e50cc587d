/*!
 * Core Module
 * Lock primitives, processor hints, and error handling
 */

pub mod errors;
pub mod hints;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use hints::*;
