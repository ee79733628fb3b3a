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

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 64;

/// Tunables for [`AudioBinding`](crate::AudioBinding).
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBindingConfig {
    /// Re-issue a mute after a successful device selection when the user had muted.
    ///
    /// Selecting an input may reset the hardware mute state on some sessions; this has not been
    /// confirmed against every SDK, so it can be switched off.
    pub reconcile_mute_after_selection: bool,

    /// Capacity of the [`AudioEvent`](crate::AudioEvent) broadcast channel. Oldest events are
    /// dropped on overflow.
    pub event_bus_capacity: usize,
}

impl Default for AudioBindingConfig {
    fn default() -> Self {
        Self {
            reconcile_mute_after_selection: true,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

impl AudioBindingConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_bus_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "event_bus_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
