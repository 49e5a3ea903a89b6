//! Fixed-window rate limit gate.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use super::window::WindowUnit;
use crate::error::{CrptError, Result};

/// A counting gate that bounds in-window request slots to a fixed capacity.
///
/// Callers take a slot with [`acquire`](Self::acquire) and give it back by
/// dropping the returned [`SlotPermit`]. A background task restores full
/// capacity once per window, independent of how many slots are checked out.
///
/// This is a fixed-window limiter: the reset sets the counter back to
/// `capacity` on a timer rather than tracking per-request expiry. Requests
/// issued just before and just after a window boundary can therefore
/// approach double the nominal rate in a short span.
///
/// This struct is thread-safe and can be shared across multiple tasks.
pub struct RateLimitedGate {
    shared: Arc<Shared>,
    reset_task: JoinHandle<()>,
}

struct Shared {
    /// Maximum slots per window
    capacity: u32,
    /// Reset granularity
    window: WindowUnit,
    /// Mutable counter state, guarded by a mutex
    state: Mutex<State>,
    /// Wakes waiters on release and on window reset
    wakeup: Notify,
}

struct State {
    available: u32,
    closed: bool,
}

impl RateLimitedGate {
    /// Create a new gate with the given window and capacity.
    ///
    /// Spawns the periodic reset task, so this must be called from within a
    /// Tokio runtime. Returns a configuration error if `capacity` is zero.
    pub fn new(window: WindowUnit, capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(CrptError::Config(
                "request limit must be positive".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            capacity,
            window,
            state: Mutex::new(State {
                available: capacity,
                closed: false,
            }),
            wakeup: Notify::new(),
        });

        let reset_task = Self::spawn_reset_task(Arc::clone(&shared));

        debug!(
            capacity = capacity,
            window = %window,
            "Rate limit gate created"
        );

        Ok(Self { shared, reset_task })
    }

    /// Wait until a slot is available and take it.
    ///
    /// Returns a permit that releases the slot when dropped, on every exit
    /// path of the work performed while holding it. No fairness is
    /// guaranteed among concurrent waiters. Dropping the returned future
    /// while it is still waiting consumes no slot. Returns
    /// [`CrptError::GateClosed`] if the gate is closed before a slot frees
    /// up.
    pub async fn acquire(&self) -> Result<SlotPermit> {
        loop {
            // Register for a wakeup before re-checking the counter so a
            // release or reset landing in between is not lost.
            let wakeup = self.shared.wakeup.notified();
            tokio::pin!(wakeup);
            wakeup.as_mut().enable();

            {
                let mut state = self.shared.state.lock();
                if state.closed {
                    return Err(CrptError::GateClosed);
                }
                if state.available > 0 {
                    state.available -= 1;
                    trace!(available = state.available, "Slot acquired");
                    return Ok(SlotPermit {
                        shared: Arc::clone(&self.shared),
                    });
                }
            }

            trace!("Gate depleted, waiting for release or window reset");
            wakeup.await;
        }
    }

    /// Close the gate and stop the reset task.
    ///
    /// Blocked waiters observe [`CrptError::GateClosed`] promptly; slots
    /// already handed out remain valid until their permits drop.
    pub fn close(&self) {
        self.reset_task.abort();
        {
            let mut state = self.shared.state.lock();
            state.closed = true;
        }
        self.shared.wakeup.notify_waiters();
        debug!("Rate limit gate closed");
    }

    /// Get the number of currently available slots.
    pub fn available(&self) -> u32 {
        self.shared.state.lock().available
    }

    /// Get the configured capacity.
    pub fn capacity(&self) -> u32 {
        self.shared.capacity
    }

    /// Get the configured window unit.
    pub fn window(&self) -> WindowUnit {
        self.shared.window
    }

    /// Spawn the background task that restores full capacity once per window.
    ///
    /// The reset stores `capacity` into the counter rather than adding back
    /// unused slots, so permits still outstanding at the boundary cannot
    /// push the counter above the configured maximum when they eventually
    /// drop. This task is the only code path that resets the counter.
    fn spawn_reset_task(shared: Arc<Shared>) -> JoinHandle<()> {
        let period = shared.window.duration();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of an interval completes immediately; skip it
            // so the first reset lands one full window after creation.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let restored = {
                    let mut state = shared.state.lock();
                    let before = state.available;
                    state.available = shared.capacity;
                    shared.capacity - before
                };
                trace!(restored = restored, "Window reset, capacity restored");
                if restored > 0 {
                    shared.wakeup.notify_waiters();
                }
            }
        })
    }
}

impl Drop for RateLimitedGate {
    fn drop(&mut self) {
        self.reset_task.abort();
    }
}

/// A slot held from a [`RateLimitedGate`], released on drop.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct SlotPermit {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SlotPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPermit").finish_non_exhaustive()
    }
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            // A window reset may already have restored full capacity while
            // this slot was out; the counter never exceeds the limit.
            if state.available < self.shared.capacity {
                state.available += 1;
            }
        }
        self.shared.wakeup.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready};

    #[tokio::test]
    async fn test_acquire_within_capacity_does_not_block() {
        let gate = RateLimitedGate::new(WindowUnit::Minute, 3).unwrap();

        let _a = gate.acquire().await.unwrap();
        let _b = gate.acquire().await.unwrap();
        let _c = gate.acquire().await.unwrap();

        assert_eq!(gate.available(), 0);
    }

    #[tokio::test]
    async fn test_acquire_blocks_when_depleted() {
        let gate = RateLimitedGate::new(WindowUnit::Minute, 1).unwrap();
        let held = gate.acquire().await.unwrap();

        let mut waiting = tokio_test::task::spawn(gate.acquire());
        assert_pending!(waiting.poll());

        drop(held);
        assert!(waiting.is_woken());
        let permit = assert_ready!(waiting.poll()).unwrap();
        drop(permit);

        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_capacity_plus_one_concurrent_acquires() {
        let gate = RateLimitedGate::new(WindowUnit::Minute, 3).unwrap();

        let permits = vec![
            gate.acquire().await.unwrap(),
            gate.acquire().await.unwrap(),
            gate.acquire().await.unwrap(),
        ];

        let mut fourth = tokio_test::task::spawn(gate.acquire());
        assert_pending!(fourth.poll());

        drop(permits);
        assert!(fourth.is_woken());
        let _p = assert_ready!(fourth.poll()).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_full_capacity() {
        let gate = RateLimitedGate::new(WindowUnit::Second, 2).unwrap();

        let a = gate.acquire().await.unwrap();
        let b = gate.acquire().await.unwrap();
        assert_eq!(gate.available(), 0);

        // Crossing the window boundary restores the full budget even though
        // both slots are still checked out.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(gate.available(), 2);

        // The late releases must not push the counter above capacity.
        drop(a);
        drop(b);
        assert_eq!(gate.available(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_acquire_completes_on_reset() {
        let gate = Arc::new(RateLimitedGate::new(WindowUnit::Second, 1).unwrap());
        let held = gate.acquire().await.unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _permit = gate.acquire().await.unwrap();
            })
        };

        // The held permit is never dropped; only the window reset can free
        // the waiter.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        waiter.await.unwrap();
        drop(held);
    }

    #[tokio::test]
    async fn test_cancelled_acquire_consumes_no_slot() {
        let gate = RateLimitedGate::new(WindowUnit::Minute, 2).unwrap();
        let a = gate.acquire().await.unwrap();
        let b = gate.acquire().await.unwrap();

        let mut waiting = tokio_test::task::spawn(gate.acquire());
        assert_pending!(waiting.poll());
        drop(waiting);

        drop(a);
        drop(b);
        assert_eq!(gate.available(), 2);

        // Both slots are immediately acquirable again.
        let _a = gate.acquire().await.unwrap();
        let _b = gate.acquire().await.unwrap();
        assert_eq!(gate.available(), 0);
    }

    #[tokio::test]
    async fn test_close_fails_blocked_waiters() {
        let gate = Arc::new(RateLimitedGate::new(WindowUnit::Minute, 1).unwrap());
        let held = gate.acquire().await.unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.acquire().await })
        };
        tokio::task::yield_now().await;

        gate.close();
        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(CrptError::GateClosed)));

        // New acquires fail immediately once closed.
        assert!(matches!(gate.acquire().await, Err(CrptError::GateClosed)));
        drop(held);
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected() {
        let result = RateLimitedGate::new(WindowUnit::Second, 0);
        assert!(matches!(result, Err(CrptError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_after_reset_is_capped() {
        let gate = RateLimitedGate::new(WindowUnit::Second, 1).unwrap();
        let held = gate.acquire().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(gate.available(), 1);

        drop(held);
        assert_eq!(gate.available(), 1);
    }
}
