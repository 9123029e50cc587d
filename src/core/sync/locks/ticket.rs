/*!
 * Ticket Lock
 *
 * Two counters: the next place in line and the place being served. Acquiring
 * takes a ticket with one fetch-and-increment and waits for it to be called;
 * releasing calls the next ticket. Waiters are served in exactly the order
 * they drew tickets, so no thread can be overtaken indefinitely.
 *
 * # Wraparound
 *
 * Both counters advance with wrapping arithmetic at the same width, and only
 * equality is ever compared, so service order stays correct across the
 * `u64::MAX → 0` boundary.
 *
 * # Oversubscription
 *
 * FIFO hand-off convoys when waiters outnumber cores: if the next ticket's
 * owner is descheduled, every later waiter spins until it runs again.
 */

use super::traits::RawLock;
use crate::core::sync::backoff::{Backoff, BackoffPolicy, NoBackoff};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// FIFO spin-lock, optionally backing off while waiting for its turn
#[derive(Debug, Default)]
pub struct TicketLock<P: BackoffPolicy = NoBackoff> {
    next_ticket: CachePadded<AtomicU64>,
    // Written only by the current holder
    now_serving: CachePadded<AtomicU64>,
    policy: P,
}

impl TicketLock<NoBackoff> {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// A free lock whose first ticket is `ticket`
    ///
    /// Useful to exercise counter wraparound without 2⁶⁴ acquisitions.
    pub const fn starting_at(ticket: u64) -> Self {
        Self {
            next_ticket: CachePadded::new(AtomicU64::new(ticket)),
            now_serving: CachePadded::new(AtomicU64::new(ticket)),
            policy: NoBackoff,
        }
    }
}

impl<P: BackoffPolicy> TicketLock<P> {
    /// Ticket lock that runs `policy` while its ticket is not yet served
    pub fn with_policy(policy: P) -> Self {
        Self {
            next_ticket: CachePadded::new(AtomicU64::new(0)),
            now_serving: CachePadded::new(AtomicU64::new(0)),
            policy,
        }
    }

    /// Acquire and return the ticket that was served
    #[inline]
    pub fn lock_ticketed(&self) -> u64 {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        if self.now_serving.load(Ordering::Acquire) != ticket {
            self.wait_for_turn(ticket);
        }
        ticket
    }

    #[cold]
    fn wait_for_turn(&self, ticket: u64) {
        let mut backoff = self.policy.start();
        while self.now_serving.load(Ordering::Acquire) != ticket {
            backoff.snooze();
        }
    }

    /// Ticket currently being served
    pub fn now_serving(&self) -> u64 {
        self.now_serving.load(Ordering::Relaxed)
    }

    /// Ticket the next caller will draw
    pub fn next_ticket(&self) -> u64 {
        self.next_ticket.load(Ordering::Relaxed)
    }

    /// Holder plus waiters, as of a racy snapshot
    ///
    /// `now_serving` is read first: every ticket it has passed was drawn
    /// before the release that published it, so the later `next_ticket`
    /// read is never behind and the difference never wraps.
    pub fn queue_depth(&self) -> u64 {
        let serving = self.now_serving.load(Ordering::Acquire);
        let next = self.next_ticket.load(Ordering::Relaxed);
        next.wrapping_sub(serving)
    }
}

unsafe impl<P: BackoffPolicy> RawLock for TicketLock<P> {
    #[inline]
    fn acquire(&self) {
        self.lock_ticketed();
    }

    /// Succeeds only when nobody holds or waits: claims the served ticket
    #[inline]
    fn try_acquire(&self) -> bool {
        let serving = self.now_serving.load(Ordering::Acquire);
        self.next_ticket
            .compare_exchange(
                serving,
                serving.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    #[inline]
    unsafe fn release(&self) {
        // Single writer: a load and a release store suffice, no RMW
        let next = self.now_serving.load(Ordering::Relaxed).wrapping_add(1);
        self.now_serving.store(next, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.queue_depth() != 0
    }

    fn name(&self) -> &'static str {
        "ticket"
    }
}
