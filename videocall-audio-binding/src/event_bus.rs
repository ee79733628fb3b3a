/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Broadcast bus for audio binding events.
//!
//! Each [`AudioBinding`](crate::AudioBinding) owns one bus. Any number of consumers can
//! subscribe; each receives every event emitted after it subscribed.
//!
//! # Example
//!
//! ```ignore
//! let mut rx = binding.subscribe_events();
//! wasm_bindgen_futures::spawn_local(async move {
//!     while let Ok(event) = rx.recv().await {
//!         match event {
//!             AudioEvent::DeviceSelectionFailed { reason, .. } => {
//!                 // Tell the user the microphone is unavailable
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//! ```

use crate::events::AudioEvent;
use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender};

#[derive(Clone)]
pub struct AudioEventBus {
    sender: Sender<AudioEvent>,
    // Keeps the channel open while nobody is subscribed.
    _keep_open: InactiveReceiver<AudioEvent>,
}

impl AudioEventBus {
    /// Creates a bus holding at most `capacity` undelivered events per subscriber.
    ///
    /// When the channel is full the oldest event is dropped to make room.
    pub fn new(capacity: usize) -> Self {
        let (mut sender, receiver) = broadcast(capacity.max(1));
        sender.set_overflow(true);
        Self {
            sender,
            _keep_open: receiver.deactivate(),
        }
    }

    /// Returns a receiver that will receive all future events.
    pub fn subscribe(&self) -> Receiver<AudioEvent> {
        self.sender.new_receiver()
    }

    /// Emits an event to all subscribers.
    ///
    /// Never blocks. With no active subscriber the event is discarded.
    pub fn emit(&self, event: AudioEvent) {
        let _ = self.sender.try_broadcast(event);
    }

    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_broadcast::TryRecvError;

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let bus = AudioEventBus::new(4);
        bus.emit(AudioEvent::SessionStarted);
        bus.emit(AudioEvent::BindingTornDown);
    }

    #[test]
    fn test_subscriber_receives_events_in_order() {
        let bus = AudioEventBus::new(4);
        let mut rx = bus.subscribe();
        bus.emit(AudioEvent::SharingChanged(false));
        bus.emit(AudioEvent::SharingChanged(true));

        assert_eq!(rx.try_recv().unwrap(), AudioEvent::SharingChanged(false));
        assert_eq!(rx.try_recv().unwrap(), AudioEvent::SharingChanged(true));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_late_subscriber_misses_past_events() {
        let bus = AudioEventBus::new(4);
        bus.emit(AudioEvent::SessionStarted);
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let bus = AudioEventBus::new(2);
        let mut rx = bus.subscribe();
        bus.emit(AudioEvent::SharingChanged(true));
        bus.emit(AudioEvent::SharingChanged(false));
        bus.emit(AudioEvent::BindingTornDown);

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Overflowed(1))));
        assert_eq!(rx.try_recv().unwrap(), AudioEvent::SharingChanged(false));
        assert_eq!(rx.try_recv().unwrap(), AudioEvent::BindingTornDown);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(AudioEventBus::new(0).capacity(), 1);
    }
}
