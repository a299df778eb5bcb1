//! Single-slot broadcast channel holding the latest published value.
//!
//! Provides [`LatestValueChannel`], the cell every binding and derived-state
//! composer writes into, and [`Subscriber`], the read handle handed to UI
//! consumers. A subscriber first observes the current value, then every later
//! value. Slow subscribers only ever see the most recent value; intermediate
//! values published between two reads are dropped.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embassy_sync::waitqueue::MultiWakerRegistration;

use crate::binding::BindingError;

/// Number of wakers a channel tracks before waking everyone to make room.
pub const MAX_SUBSCRIBERS: usize = 4;

/// Terminal signal received by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Termination {
    /// The producer finished normally.
    Completed,
    /// The producer failed.
    Failed(BindingError),
}

struct Slot<T> {
    value: T,
    version: u32,
    terminal: Option<Termination>,
    wakers: MultiWakerRegistration<MAX_SUBSCRIBERS>,
}

/// Broadcast cell that always holds a value.
///
/// Writes go through [`on_next`](Self::on_next) and are made by exactly one
/// owner (a binding or a composer). Any number of readers may call
/// [`get_value`](Self::get_value) or hold a [`Subscriber`].
///
/// # Type Parameters
/// * `T` - Value type, cloned out to readers
/// * `M` - Raw mutex guarding the slot; [`NoopRawMutex`] for single-context use
pub struct LatestValueChannel<T, M: RawMutex = NoopRawMutex> {
    default: T,
    slot: Mutex<M, RefCell<Slot<T>>>,
}

impl<T: Clone, M: RawMutex> LatestValueChannel<T, M> {
    /// Creates a channel whose current value is `default`.
    pub fn new(default: T) -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Slot {
                value: default.clone(),
                version: 0,
                terminal: None,
                wakers: MultiWakerRegistration::new(),
            })),
            default,
        }
    }

    /// Publishes a new value and wakes every waiting subscriber.
    ///
    /// Ignored once the channel has terminated.
    pub fn on_next(&self, value: T) {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.terminal.is_some() {
                return;
            }
            slot.value = value;
            slot.version = slot.version.wrapping_add(1);
            slot.wakers.wake();
        });
    }

    /// Returns a copy of the current value. Never blocks.
    pub fn get_value(&self) -> T {
        self.slot.lock(|slot| slot.borrow().value.clone())
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.slot.lock(|slot| f(&slot.borrow().value))
    }

    /// Publishes the construction default again.
    pub fn reset(&self) {
        self.on_next(self.default.clone());
    }

    /// Returns the value the channel was created with.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Signals normal completion. No further values are delivered.
    pub fn on_complete(&self) {
        self.terminate(Termination::Completed);
    }

    /// Signals failure. No further values are delivered.
    pub fn on_error(&self, error: BindingError) {
        self.terminate(Termination::Failed(error));
    }

    /// Returns the terminal signal, if one was received.
    pub fn termination(&self) -> Option<Termination> {
        self.slot.lock(|slot| slot.borrow().terminal)
    }

    /// Number of values published since construction (wrapping).
    pub fn version(&self) -> u32 {
        self.slot.lock(|slot| slot.borrow().version)
    }

    /// Returns a subscriber that first yields the current value.
    pub fn subscribe(&self) -> Subscriber<'_, T, M> {
        Subscriber {
            channel: self,
            seen: None,
        }
    }

    fn terminate(&self, termination: Termination) {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.terminal.is_none() {
                slot.terminal = Some(termination);
                slot.wakers.wake();
            }
        });
    }
}

impl<T: Clone + PartialEq, M: RawMutex> LatestValueChannel<T, M> {
    /// Publishes `value` only if it differs from the current value.
    ///
    /// # Returns
    /// `true` if the value was published.
    pub fn on_next_if_changed(&self, value: T) -> bool {
        if self.with_value(|current| *current == value) {
            return false;
        }
        self.on_next(value);
        true
    }
}

/// Read handle on a [`LatestValueChannel`].
///
/// Tracks the last version it returned, so each read yields either the newest
/// value or nothing.
pub struct Subscriber<'a, T, M: RawMutex = NoopRawMutex> {
    channel: &'a LatestValueChannel<T, M>,
    seen: Option<u32>,
}

impl<T: Clone, M: RawMutex> Subscriber<'_, T, M> {
    /// Returns the newest unseen value without waiting.
    ///
    /// Returns `None` if nothing new was published or the channel terminated.
    pub fn try_next(&mut self) -> Option<T> {
        let seen = self.seen;
        let next = self.channel.slot.lock(|slot| {
            let slot = slot.borrow();
            if slot.terminal.is_some() || seen == Some(slot.version) {
                None
            } else {
                Some((slot.version, slot.value.clone()))
            }
        });
        next.map(|(version, value)| {
            self.seen = Some(version);
            value
        })
    }

    /// Waits for the newest unseen value.
    ///
    /// Resolves to `None` once the channel has terminated.
    pub async fn next(&mut self) -> Option<T> {
        let seen = self.seen;
        let (version, value) = poll_fn(|cx| {
            self.channel.slot.lock(|slot| {
                let mut slot = slot.borrow_mut();
                if slot.terminal.is_some() {
                    return Poll::Ready(None);
                }
                if seen != Some(slot.version) {
                    return Poll::Ready(Some((slot.version, slot.value.clone())));
                }
                slot.wakers.register(cx.waker());
                Poll::Pending
            })
        })
        .await?;
        self.seen = Some(version);
        Some(value)
    }

    /// Returns `true` once the channel has terminated.
    pub fn is_closed(&self) -> bool {
        self.channel.termination().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_sees_latest_value_only() {
        let channel: LatestValueChannel<u32> = LatestValueChannel::new(0);
        let mut subscriber = channel.subscribe();

        channel.on_next(1);
        channel.on_next(2);

        assert_eq!(subscriber.try_next(), Some(2));
        assert_eq!(subscriber.try_next(), None);
    }

    #[test]
    fn on_next_if_changed_skips_equal_values() {
        let channel: LatestValueChannel<u32> = LatestValueChannel::new(5);
        assert!(!channel.on_next_if_changed(5));
        assert_eq!(channel.version(), 0);
        assert!(channel.on_next_if_changed(6));
        assert_eq!(channel.version(), 1);
    }

    #[test]
    fn reset_restores_default() {
        let channel: LatestValueChannel<i32> = LatestValueChannel::new(-1);
        channel.on_next(40);
        channel.reset();
        assert_eq!(channel.get_value(), -1);
    }
}
