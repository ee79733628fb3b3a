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

use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::AudioBindingConfig;
use crate::element_ref::AudioElementRef;
use crate::error::DeviceSelectionError;
use crate::event_bus::AudioEventBus;
use crate::events::AudioEvent;
use crate::platform;
use crate::session::{
    AudioVideoObserver, AudioVideoSession, MuteHandler, ObserverHandle, SessionStatus,
};

/// Observable output of an [`AudioBinding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioBindingState {
    /// True while local audio is unmuted, as last reported by the session.
    pub is_sharing_audio: bool,
    /// True once the session accepted the audio input for the current binding.
    pub is_audio_input_initialized: bool,
}

/// Options and callbacks for [`AudioBinding::mount`].
pub struct AudioBindingOptions {
    pub config: AudioBindingConfig,

    /// Called with the new state whenever either flag actually changes.
    pub on_state_changed: Rc<dyn Fn(AudioBindingState)>,

    /// Called when the session rejects the audio input, e.g. to show a
    /// "unable to connect to microphone" toast.
    pub on_device_error: Rc<dyn Fn(DeviceSelectionError)>,
}

impl Default for AudioBindingOptions {
    fn default() -> Self {
        Self {
            config: AudioBindingConfig::default(),
            on_state_changed: Rc::new(|_| {}),
            on_device_error: Rc::new(|_| {}),
        }
    }
}

/// Binds an audio element to a meeting session and mirrors the session's local mute state.
///
/// The binding has two independent halves:
///
/// * **mute sync**: a handler subscribed to the session's mute notifications keeps
///   [`is_sharing_audio`](Self::is_sharing_audio) equal to `!muted`. Nothing else writes it;
///   [`toggle_audio`](Self::toggle_audio) only sends a command to the session.
/// * **binding lifecycle**: bind the element, register an observer, then select the audio input
///   asynchronously. It re-runs whenever the element ref, the input device, the sharing flag, or
///   the session changes, tearing down the previous run first.
///
/// Each lifecycle run and each teardown bumps a generation counter. A device selection that
/// completes after its run was superseded is discarded.
///
/// Must be used from a single thread. On native targets the binding has to live inside a
/// `tokio::task::LocalSet`.
///
/// Dropping the binding tears it down.
pub struct AudioBinding<S: AudioVideoSession + 'static> {
    inner: Rc<Inner<S>>,
}

struct MuteSubscription<S> {
    session: Rc<S>,
    handler: MuteHandler,
}

struct ActiveBinding<S> {
    session: Rc<S>,
    observer: ObserverHandle,
}

struct Inner<S: AudioVideoSession + 'static> {
    session: RefCell<Rc<S>>,
    audio_element: RefCell<AudioElementRef<S::AudioElement>>,
    audio_input_device: RefCell<Option<String>>,
    state: Cell<AudioBindingState>,
    generation: Cell<u64>,
    mute_subscription: RefCell<Option<MuteSubscription<S>>>,
    active: RefCell<Option<ActiveBinding<S>>>,
    unmounted: Cell<bool>,
    config: AudioBindingConfig,
    events: AudioEventBus,
    on_state_changed: Rc<dyn Fn(AudioBindingState)>,
    on_device_error: Rc<dyn Fn(DeviceSelectionError)>,
}

impl<S: AudioVideoSession + 'static> AudioBinding<S> {
    /// Subscribes to mute changes on `session` and runs the binding lifecycle once.
    ///
    /// `is_sharing_audio` starts out as the negation of the session's current mute flag.
    /// If `audio_element` is empty nothing is bound until [`refresh`](Self::refresh) or
    /// [`set_audio_element`](Self::set_audio_element) is called.
    ///
    /// # Panics
    ///
    /// On native targets, panics if called outside a `tokio::task::LocalSet` while an audio
    /// element is present, because device selection is spawned with
    /// `tokio::task::spawn_local`. The same applies to every method that re-runs the lifecycle.
    pub fn mount(
        session: Rc<S>,
        audio_element: AudioElementRef<S::AudioElement>,
        audio_input_device: Option<String>,
        options: AudioBindingOptions,
    ) -> Self {
        let AudioBindingOptions {
            config,
            on_state_changed,
            on_device_error,
        } = options;
        let initial = AudioBindingState {
            is_sharing_audio: !session.realtime_is_local_audio_muted(),
            is_audio_input_initialized: false,
        };
        let inner = Rc::new(Inner {
            session: RefCell::new(session),
            audio_element: RefCell::new(audio_element),
            audio_input_device: RefCell::new(audio_input_device),
            state: Cell::new(initial),
            generation: Cell::new(0),
            mute_subscription: RefCell::new(None),
            active: RefCell::new(None),
            unmounted: Cell::new(false),
            events: AudioEventBus::new(config.event_bus_capacity),
            config,
            on_state_changed,
            on_device_error,
        });
        inner.subscribe_mute();
        inner.run_lifecycle();
        Self { inner }
    }

    pub fn state(&self) -> AudioBindingState {
        self.inner.state.get()
    }

    pub fn is_sharing_audio(&self) -> bool {
        self.state().is_sharing_audio
    }

    pub fn is_audio_input_initialized(&self) -> bool {
        self.state().is_audio_input_initialized
    }

    /// Asks the session to flip its local mute flag.
    ///
    /// The new value reaches [`is_sharing_audio`](Self::is_sharing_audio) through the mute
    /// subscription, not from here.
    pub fn toggle_audio(&self) {
        self.inner.toggle_audio();
    }

    /// Switches to another session. Moves the mute subscription and re-runs the lifecycle.
    pub fn set_session(&self, session: Rc<S>) {
        self.inner.set_session(session);
    }

    /// Re-runs the lifecycle if `audio_element` is a different ref than the current one.
    pub fn set_audio_element(&self, audio_element: AudioElementRef<S::AudioElement>) {
        self.inner.set_audio_element(audio_element);
    }

    /// Re-runs the lifecycle if the device id changed.
    pub fn set_audio_input_device(&self, device_id: Option<String>) {
        self.inner.set_audio_input_device(device_id);
    }

    /// Re-runs the lifecycle unconditionally, e.g. after the element ref was filled in.
    pub fn refresh(&self) {
        if self.inner.unmounted.get() {
            return;
        }
        self.inner.run_lifecycle();
    }

    /// A callback that forwards a device selection to
    /// [`set_audio_input_device`](Self::set_audio_input_device), suitable for
    /// [`AudioInputDevices::on_selected`](crate::AudioInputDevices::on_selected).
    ///
    /// Holds only a weak reference; does nothing once the binding is dropped.
    pub fn audio_input_setter(&self) -> Rc<dyn Fn(Option<String>)> {
        let weak: Weak<Inner<S>> = Rc::downgrade(&self.inner);
        Rc::new(move |device_id| {
            if let Some(inner) = weak.upgrade() {
                inner.set_audio_input_device(device_id);
            }
        })
    }

    /// Returns a receiver for [`AudioEvent`]s emitted from now on.
    pub fn subscribe_events(&self) -> async_broadcast::Receiver<AudioEvent> {
        self.inner.events.subscribe()
    }

    /// Unbinds the element, removes the observer, unsubscribes the mute handler and resets
    /// `is_audio_input_initialized`. Calling it again does nothing.
    pub fn teardown(&self) {
        self.inner.teardown();
    }
}

impl<S: AudioVideoSession + 'static> Drop for AudioBinding<S> {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl<S: AudioVideoSession + 'static> Inner<S> {
    // Borrows of the RefCells below are never held across a call into the session or a user
    // callback; both may re-enter the binding.

    fn subscribe_mute(self: &Rc<Self>) {
        let session = self.session.borrow().clone();
        let weak = Rc::downgrade(self);
        let handler: MuteHandler = Rc::new(move |muted| {
            if let Some(inner) = weak.upgrade() {
                inner.on_local_mute_changed(muted);
            }
        });
        session.realtime_subscribe_to_mute_and_unmute_local_audio(handler.clone());
        *self.mute_subscription.borrow_mut() = Some(MuteSubscription { session, handler });
    }

    fn unsubscribe_mute(&self) {
        let subscription = self.mute_subscription.borrow_mut().take();
        if let Some(MuteSubscription { session, handler }) = subscription {
            session.realtime_unsubscribe_to_mute_and_unmute_local_audio(&handler);
        }
    }

    fn on_local_mute_changed(self: &Rc<Self>, muted: bool) {
        if self.unmounted.get() {
            return;
        }
        let sharing = !muted;
        let changed = self.replace_state(|state| state.is_sharing_audio = sharing);
        if changed.is_none() {
            return;
        }
        debug!("Local audio {}", if muted { "muted" } else { "unmuted" });
        self.notify(changed);
        self.events.emit(AudioEvent::SharingChanged(sharing));
        // The sharing flag is one of the lifecycle inputs.
        self.run_lifecycle();
    }

    fn toggle_audio(&self) {
        if self.unmounted.get() {
            debug!("toggle_audio called after teardown, ignoring");
            return;
        }
        let session = self.session.borrow().clone();
        if session.realtime_is_local_audio_muted() {
            session.realtime_unmute_local_audio();
        } else {
            session.realtime_mute_local_audio();
        }
    }

    fn set_session(self: &Rc<Self>, session: Rc<S>) {
        if self.unmounted.get() || Rc::ptr_eq(&*self.session.borrow(), &session) {
            return;
        }
        debug!("Switching audio binding to a new session");
        // Tear down against the old session before the handle is replaced.
        self.teardown_binding();
        self.unsubscribe_mute();
        *self.session.borrow_mut() = session.clone();
        self.subscribe_mute();

        let sharing = !session.realtime_is_local_audio_muted();
        let changed = self.replace_state(|state| state.is_sharing_audio = sharing);
        if changed.is_some() {
            self.notify(changed);
            self.events.emit(AudioEvent::SharingChanged(sharing));
        }
        self.run_lifecycle();
    }

    fn set_audio_element(self: &Rc<Self>, audio_element: AudioElementRef<S::AudioElement>) {
        if self.unmounted.get() || self.audio_element.borrow().same_ref(&audio_element) {
            return;
        }
        *self.audio_element.borrow_mut() = audio_element;
        self.run_lifecycle();
    }

    fn set_audio_input_device(self: &Rc<Self>, device_id: Option<String>) {
        if self.unmounted.get() || *self.audio_input_device.borrow() == device_id {
            return;
        }
        debug!("Audio input device changed to {device_id:?}");
        *self.audio_input_device.borrow_mut() = device_id;
        self.run_lifecycle();
    }

    fn run_lifecycle(self: &Rc<Self>) {
        self.teardown_binding();
        let generation = self.bump_generation();

        let element = self.audio_element.borrow().current();
        let Some(element) = element else {
            debug!("No audio element to bind yet");
            return;
        };

        let session = self.session.borrow().clone();
        session.bind_audio_element(&element);
        let observer: ObserverHandle = Rc::new(LifecycleObserver {
            events: self.events.clone(),
        });
        session.add_observer(observer.clone());
        *self.active.borrow_mut() = Some(ActiveBinding {
            session: session.clone(),
            observer,
        });

        let device_id = self.audio_input_device.borrow().clone();
        debug!("Selecting audio input {device_id:?} (generation {generation})");
        let selection = session.choose_audio_input_device(device_id.as_deref());
        let weak = Rc::downgrade(self);
        platform::spawn_local(async move {
            let result = selection.await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_device_selection(generation, device_id, result);
            }
        });
    }

    fn finish_device_selection(
        &self,
        generation: u64,
        device_id: Option<String>,
        result: Result<(), DeviceSelectionError>,
    ) {
        if generation != self.generation.get() {
            debug!(
                "Discarding stale audio input selection for {device_id:?} (generation {generation}, current {})",
                self.generation.get()
            );
            return;
        }

        match result {
            Ok(()) => {
                info!("Audio input {device_id:?} initialized");
                let changed = self.replace_state(|state| state.is_audio_input_initialized = true);
                self.notify(changed);
                self.events.emit(AudioEvent::AudioInputInitialized(device_id));

                // A state callback may have re-run or torn down the binding.
                if generation != self.generation.get() {
                    return;
                }
                if self.config.reconcile_mute_after_selection && !self.state.get().is_sharing_audio
                {
                    let session = self
                        .active
                        .borrow()
                        .as_ref()
                        .map(|active| active.session.clone());
                    if let Some(session) = session {
                        debug!("Re-applying local mute after audio input selection");
                        session.realtime_mute_local_audio();
                    }
                }
            }
            Err(e) => {
                warn!("Unable to connect to microphone {device_id:?}: {e}");
                self.events.emit(AudioEvent::DeviceSelectionFailed {
                    device_id,
                    reason: e.to_string(),
                });
                (self.on_device_error)(e);
            }
        }
    }

    fn teardown_binding(&self) {
        self.bump_generation();
        let active = self.active.borrow_mut().take();
        let Some(ActiveBinding { session, observer }) = active else {
            return;
        };
        let changed = self.replace_state(|state| state.is_audio_input_initialized = false);
        session.unbind_audio_element();
        session.remove_observer(&observer);
        debug!("Audio binding torn down");
        self.events.emit(AudioEvent::BindingTornDown);
        self.notify(changed);
    }

    fn teardown(&self) {
        if self.unmounted.replace(true) {
            return;
        }
        self.teardown_binding();
        self.unsubscribe_mute();
    }

    fn bump_generation(&self) -> u64 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }

    /// Applies `update` and returns the new state if it differs from the old one.
    fn replace_state(
        &self,
        update: impl FnOnce(&mut AudioBindingState),
    ) -> Option<AudioBindingState> {
        let old = self.state.get();
        let mut new = old;
        update(&mut new);
        if new == old {
            return None;
        }
        self.state.set(new);
        Some(new)
    }

    fn notify(&self, changed: Option<AudioBindingState>) {
        if let Some(state) = changed {
            (self.on_state_changed)(state);
        }
    }
}

/// Observer registered for the duration of one binding. It has no effect on binding state;
/// lifecycle notifications are logged and forwarded to the event bus.
struct LifecycleObserver {
    events: AudioEventBus,
}

impl AudioVideoObserver for LifecycleObserver {
    fn audio_video_did_start(&self) {
        debug!("Audio/video session started");
        self.events.emit(AudioEvent::SessionStarted);
    }

    fn audio_video_did_stop(&self, status: SessionStatus) {
        debug!("Audio/video session stopped: {status}");
        self.events.emit(AudioEvent::SessionStopped(status));
    }

    fn audio_video_did_start_connecting(&self, reconnecting: bool) {
        if reconnecting {
            debug!("Audio/video session reconnecting");
        }
        self.events.emit(AudioEvent::SessionConnecting { reconnecting });
    }
}
