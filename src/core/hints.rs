/*!
 * Processor Hints
 * Spin-wait and optimization-barrier primitives shared by every lock strategy
 */

/// Yield a short fixed delay to the execution unit
///
/// # Implementation
/// Maps to `std::hint::spin_loop`, which emits `pause` on x86, `yield`/`isb`
/// on ARM, and nothing on targets without a spin-wait instruction. Correctness
/// never depends on it; only the polling rate does.
#[inline(always)]
pub fn cpu_relax() {
    std::hint::spin_loop();
}

/// Issue `iters` consecutive pause hints
#[inline]
pub fn pause(iters: u32) {
    for _ in 0..iters {
        cpu_relax();
    }
}

/// Burn `iters` iterations of a counting loop the optimizer cannot elide
///
/// Unlike [`pause`], this keeps the core's execution units busy. It is the
/// "active" delay used by busy-loop constant backoff.
#[inline]
pub fn busy_spin(iters: u32) {
    let mut i = 0u32;
    while black_box(i) < iters {
        i += 1;
    }
}

/// Prevent the compiler from optimizing away or const-folding a value
///
/// Critical-section bodies in the harness go through this so the increment
/// loop is not collapsed into a single add.
pub use std::hint::black_box;
