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
use std::rc::Rc;

/// One audio input as reported by the host's device enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioInputDevice {
    pub device_id: String,
    pub label: String,
}

impl AudioInputDevice {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
        }
    }
}

/// A "smart" list of audio input devices that keeps track of the current selection.
///
/// This is the device-selection side of an [`AudioBinding`](crate::AudioBinding): enumeration is
/// done by the host, the list only remembers what is available and which entry the user picked.
/// It has no explicit connection to the binding; set [`on_selected`](Self::on_selected) to a
/// callback that forwards to
/// [`AudioBinding::set_audio_input_device`](crate::AudioBinding::set_audio_input_device).
pub struct AudioInputDevices {
    devices: Vec<AudioInputDevice>,
    selected: Option<String>,

    /// Called with the new selection whenever it changes. `None` means the selected device
    /// disappeared and no other device is left.
    pub on_selected: Rc<dyn Fn(Option<String>)>,
}

#[allow(clippy::new_without_default)]
impl AudioInputDevices {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            selected: None,
            on_selected: Rc::new(|_| {}),
        }
    }

    /// Replaces the known device list.
    ///
    /// A previous selection that is no longer present is dropped. If nothing is selected after
    /// that, the first device becomes the selection. [`on_selected`](Self::on_selected) fires
    /// if the selection changed, with `None` when the list is now empty.
    pub fn load(&mut self, devices: Vec<AudioInputDevice>) {
        self.devices = devices;
        let previous = self.selected.take();
        if let Some(selected) = &previous {
            if self.contains(selected) {
                self.selected = Some(selected.clone());
            } else {
                log::info!("Selected audio input {selected} disappeared");
            }
        }
        if self.selected.is_none() {
            self.selected = self.devices.first().map(|d| d.device_id.clone());
        }
        if self.selected != previous {
            (self.on_selected)(self.selected.clone());
        }
    }

    /// Select a device by id.
    ///
    /// Does nothing if `device_id` is not in [`devices()`](Self::devices).
    pub fn select(&mut self, device_id: &str) {
        if self.contains(device_id) {
            self.selected = Some(device_id.to_string());
            (self.on_selected)(self.selected.clone());
        } else {
            log::warn!("Ignoring selection of unknown audio input {device_id}");
        }
    }

    pub fn devices(&self) -> &[AudioInputDevice] {
        &self.devices
    }

    /// The id of the selected device, the first device if none was picked, or `None` if there
    /// are no devices.
    pub fn selected(&self) -> Option<String> {
        match &self.selected {
            Some(selected) => Some(selected.clone()),
            // device 0 is the default selection
            None => self.devices.first().map(|d| d.device_id.clone()),
        }
    }

    fn contains(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d.device_id == device_id)
    }
}
