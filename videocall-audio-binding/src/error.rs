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

//! Error types for the audio binding.

use thiserror::Error;

/// Why the session could not switch to the requested audio input.
///
/// This never escapes [`AudioBinding`](crate::AudioBinding) as an `Err`; it is handed to the
/// `on_device_error` callback and emitted on the event bus.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeviceSelectionError {
    /// The user or the browser blocked microphone access.
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    /// The device is missing, unplugged, or held by another application.
    #[error("Audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The session refused to select an input because none was chosen.
    #[error("No audio input device selected")]
    NoDeviceSelected,

    #[error("Unable to select audio input: {0}")]
    Other(String),
}

/// Errors produced while loading an [`AudioBindingConfig`](crate::AudioBindingConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
