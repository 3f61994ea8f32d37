//! Once-per-second tick fan-out.
//!
//! The RTC interrupt (or the simulator's wall clock) calls
//! [`TickSignal::tick`]; every live [`TickSubscription`] accumulates the
//! ticks until its owner drains them from the UI loop with
//! [`TickSubscription::take_pending`]. Dropping a subscription removes it
//! from the signal, so a destroyed widget can never be ticked.
//!
//! The registry is guarded by a critical-section mutex so `tick` may be
//! called from interrupt context on the device.

use alloc::vec::Vec;
use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::debug;

/// Process-wide 1 Hz tick used for blinking indicators.
pub static TICK_SECOND: TickSignal = TickSignal::new();

#[derive(Debug)]
struct Subscriber {
    id: u32,
    pending: u32,
}

#[derive(Debug)]
struct Registry {
    next_id: u32,
    subscribers: Vec<Subscriber>,
}

/// A periodic signal with any number of subscribers.
pub struct TickSignal {
    registry: Mutex<CriticalSectionRawMutex, RefCell<Registry>>,
}

impl Default for TickSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSignal {
    pub const fn new() -> Self {
        Self {
            registry: Mutex::new(RefCell::new(Registry {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register a new subscriber. The returned handle unsubscribes on drop.
    pub fn subscribe(&'static self) -> TickSubscription {
        let id = self.registry.lock(|registry| {
            let mut registry = registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id = registry.next_id.wrapping_add(1);
            registry.subscribers.push(Subscriber { id, pending: 0 });
            id
        });
        debug!("Tick subscriber {} registered", id);

        TickSubscription { signal: self, id }
    }

    /// Deliver one tick to every subscriber.
    pub fn tick(&self) {
        self.registry.lock(|registry| {
            for subscriber in registry.borrow_mut().subscribers.iter_mut() {
                subscriber.pending = subscriber.pending.saturating_add(1);
            }
        });
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock(|registry| registry.borrow().subscribers.len())
    }

    fn take_pending(&self, id: u32) -> u32 {
        self.registry.lock(|registry| {
            registry
                .borrow_mut()
                .subscribers
                .iter_mut()
                .find(|s| s.id == id)
                .map(|s| core::mem::take(&mut s.pending))
                .unwrap_or(0)
        })
    }

    fn unsubscribe(&self, id: u32) {
        self.registry.lock(|registry| {
            registry.borrow_mut().subscribers.retain(|s| s.id != id);
        });
        debug!("Tick subscriber {} released", id);
    }
}

/// Registration handle returned by [`TickSignal::subscribe`].
#[derive(Debug)]
pub struct TickSubscription {
    signal: &'static TickSignal,
    id: u32,
}

impl TickSubscription {
    /// Ticks received since the last call; resets the counter.
    pub fn take_pending(&self) -> u32 {
        self.signal.take_pending(self.id)
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.signal.unsubscribe(self.id);
    }
}

impl core::fmt::Debug for TickSignal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickSignal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_accumulate_until_taken() {
        static TICKS: TickSignal = TickSignal::new();
        let sub = TICKS.subscribe();

        TICKS.tick();
        TICKS.tick();

        assert_eq!(sub.take_pending(), 2);
        assert_eq!(sub.take_pending(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        static TICKS: TickSignal = TickSignal::new();
        let first = TICKS.subscribe();
        let second = TICKS.subscribe();
        assert_eq!(TICKS.subscriber_count(), 2);

        drop(first);
        assert_eq!(TICKS.subscriber_count(), 1);

        TICKS.tick();
        assert_eq!(second.take_pending(), 1);

        drop(second);
        assert_eq!(TICKS.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_ids_are_independent() {
        static TICKS: TickSignal = TickSignal::new();
        let early = TICKS.subscribe();
        TICKS.tick();
        let late = TICKS.subscribe();
        TICKS.tick();

        assert_eq!(early.take_pending(), 2);
        assert_eq!(late.take_pending(), 1);
    }
}
