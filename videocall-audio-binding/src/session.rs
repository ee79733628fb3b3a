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

//! The capability set [`AudioBinding`](crate::AudioBinding) needs from a live meeting session.
//!
//! The session itself (audio capture, transport, device access) is owned by whatever SDK the host
//! application uses. This module only describes the operations the binding calls on it.

use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;

use crate::error::DeviceSelectionError;

/// Callback invoked by the session with the new local mute flag.
///
/// Registration and removal are by reference: the session must compare handlers with
/// [`Rc::ptr_eq`] so that removing one handler leaves every other registration in place.
pub type MuteHandler = Rc<dyn Fn(bool)>;

/// A registered lifecycle observer. Compared with [`Rc::ptr_eq`] on removal.
pub type ObserverHandle = Rc<dyn AudioVideoObserver>;

/// Status reported by the session when it stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub code: u32,
    pub reason: String,
}

impl SessionStatus {
    pub fn new(code: u32, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.code)
    }
}

/// Session lifecycle notifications. Every method defaults to doing nothing.
pub trait AudioVideoObserver {
    fn audio_video_did_start(&self) {}

    fn audio_video_did_stop(&self, _status: SessionStatus) {}

    /// `reconnecting` is true when the session lost its connection and is trying to get it back.
    fn audio_video_did_start_connecting(&self, _reconnecting: bool) {}
}

/// Operations of an externally owned real-time audio/video session.
///
/// Everything except [`choose_audio_input_device`](Self::choose_audio_input_device) is treated
/// as infallible.
pub trait AudioVideoSession {
    /// The output surface decoded remote audio is rendered into, e.g. an `HtmlAudioElement`.
    type AudioElement: Clone;

    fn realtime_is_local_audio_muted(&self) -> bool;

    /// Idempotent.
    fn realtime_mute_local_audio(&self);

    /// Idempotent.
    fn realtime_unmute_local_audio(&self);

    fn realtime_subscribe_to_mute_and_unmute_local_audio(&self, handler: MuteHandler);

    fn realtime_unsubscribe_to_mute_and_unmute_local_audio(&self, handler: &MuteHandler);

    fn bind_audio_element(&self, element: &Self::AudioElement);

    fn unbind_audio_element(&self);

    fn add_observer(&self, observer: ObserverHandle);

    fn remove_observer(&self, observer: &ObserverHandle);

    /// Makes `device_id` the active audio input. `None` means no device has been chosen.
    ///
    /// The returned future must not borrow the session so it can be driven on the local
    /// executor after the caller returns.
    fn choose_audio_input_device(
        &self,
        device_id: Option<&str>,
    ) -> LocalBoxFuture<'static, Result<(), DeviceSelectionError>>;
}
