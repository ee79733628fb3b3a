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

//! This crate binds the audio output of a live meeting session to an element owned by the UI,
//! and keeps the participant's local mute state observable for the UI layer.
//!
//! The session itself (capture, encoding, transport, device access) is provided by whatever
//! SDK the app uses, behind the [`AudioVideoSession`] trait. This crate makes no assumptions
//! about the UI framework; state changes are reported through callbacks and through an
//! [`AudioEvent`] broadcast channel.
//!
//! # Outline of usage
//!
//! ## Mounting:
//! ```ignore
//! let audio_element = AudioElementRef::new();
//! let options = AudioBindingOptions {
//!     on_state_changed: Rc::new(|state| { /* re-render */ }),
//!     on_device_error: Rc::new(|e| { /* show a toast */ }),
//!     ..Default::default()
//! };
//! let binding = AudioBinding::mount(session, audio_element.clone(), devices.selected(), options);
//!
//! // once the element has been rendered
//! audio_element.set(Some(element));
//! binding.refresh();
//! ```
//!
//! ## Mute toggling:
//! ```ignore
//! binding.toggle_audio();
//! let label = if binding.is_sharing_audio() { "Mute" } else { "Unmute" };
//! ```
//!
//! ## Device selection:
//! ```ignore
//! let mut devices = AudioInputDevices::new();
//! devices.on_selected = binding.audio_input_setter();
//! devices.load(enumerated_microphones);
//! devices.select("mic-2");
//! ```
//!
//! ## Unmounting:
//!
//! Dropping the binding (or calling [`AudioBinding::teardown`]) unbinds the element, removes the
//! observer and unsubscribes from mute changes.

mod binding;
mod config;
mod devices;
mod element_ref;
mod error;
mod event_bus;
mod events;
mod platform;
mod session;

pub use binding::{AudioBinding, AudioBindingOptions, AudioBindingState};
pub use config::{AudioBindingConfig, DEFAULT_EVENT_BUS_CAPACITY};
pub use devices::{AudioInputDevice, AudioInputDevices};
pub use element_ref::AudioElementRef;
pub use error::{ConfigError, DeviceSelectionError};
pub use event_bus::AudioEventBus;
pub use events::AudioEvent;
pub use session::{
    AudioVideoObserver, AudioVideoSession, MuteHandler, ObserverHandle, SessionStatus,
};
