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

//! Framework-agnostic event types for the audio binding.
//!
//! These events are emitted via the event bus and can be subscribed to by any
//! frontend framework (Yew, Dioxus, Leptos, React via wasm-bindgen, etc.)

use crate::session::SessionStatus;

/// Events emitted by [`AudioBinding`](crate::AudioBinding) that UI frameworks can subscribe to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    // === Mute Events ===
    /// The session reported a new local mute flag. Carries the new `is_sharing_audio` value.
    SharingChanged(bool),

    // === Device Events ===
    /// The session accepted the audio input device
    AudioInputInitialized(Option<String>),

    /// The session rejected the audio input device (missing hardware, blocked permission)
    DeviceSelectionFailed {
        device_id: Option<String>,
        reason: String,
    },

    /// The audio element was unbound and the observer removed
    BindingTornDown,

    // === Session Lifecycle Events ===
    SessionStarted,

    SessionStopped(SessionStatus),

    /// The session is connecting, `reconnecting` is true after a dropped connection
    SessionConnecting { reconnecting: bool },
}
