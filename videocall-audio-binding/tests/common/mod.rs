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

//! In-memory session used by the integration tests.
//!
//! Records every call the binding makes. Device selection either resolves immediately or waits
//! until the test resolves it with [`MockSession::resolve_next_selection`].

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use videocall_audio_binding::{
    AudioVideoSession, DeviceSelectionError, MuteHandler, ObserverHandle, SessionStatus,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Mute,
    Unmute,
    Subscribe,
    Unsubscribe,
    Bind(String),
    Unbind,
    AddObserver,
    RemoveObserver,
    ChooseDevice(Option<String>),
}

pub enum SelectionMode {
    Succeed,
    Fail(DeviceSelectionError),
    Manual,
}

pub struct MockSession {
    muted: Cell<bool>,
    handlers: RefCell<Vec<MuteHandler>>,
    observers: RefCell<Vec<ObserverHandle>>,
    bound: RefCell<Option<String>>,
    calls: RefCell<Vec<Call>>,
    mode: RefCell<SelectionMode>,
    pending: RefCell<VecDeque<oneshot::Sender<Result<(), DeviceSelectionError>>>>,
}

impl MockSession {
    pub fn new(muted: bool, mode: SelectionMode) -> Rc<Self> {
        Rc::new(Self {
            muted: Cell::new(muted),
            handlers: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            bound: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
            mode: RefCell::new(mode),
            pending: RefCell::new(VecDeque::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn bound_element(&self) -> Option<String> {
        self.bound.borrow().clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    pub fn set_mode(&self, mode: SelectionMode) {
        *self.mode.borrow_mut() = mode;
    }

    pub fn pending_selections(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Completes the oldest selection still waiting.
    pub fn resolve_next_selection(&self, result: Result<(), DeviceSelectionError>) {
        let sender = self.pending.borrow_mut().pop_front();
        sender
            .expect("no pending device selection")
            .send(result)
            .expect("selection future was dropped");
    }

    /// Simulates a mute change that did not come from the binding, e.g. a hardware button.
    pub fn external_set_muted(&self, muted: bool) {
        self.set_muted(muted);
    }

    /// Registers an extra handler that the binding knows nothing about.
    pub fn add_foreign_handler(&self, handler: MuteHandler) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn emit_started(&self) {
        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer.audio_video_did_start();
        }
    }

    pub fn emit_stopped(&self, status: SessionStatus) {
        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer.audio_video_did_stop(status.clone());
        }
    }

    pub fn emit_connecting(&self, reconnecting: bool) {
        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer.audio_video_did_start_connecting(reconnecting);
        }
    }

    fn set_muted(&self, muted: bool) {
        if self.muted.replace(muted) == muted {
            return;
        }
        // Handlers may call back into the session.
        let handlers = self.handlers.borrow().clone();
        for handler in handlers {
            handler(muted);
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl AudioVideoSession for MockSession {
    type AudioElement = String;

    fn realtime_is_local_audio_muted(&self) -> bool {
        self.muted.get()
    }

    fn realtime_mute_local_audio(&self) {
        self.record(Call::Mute);
        self.set_muted(true);
    }

    fn realtime_unmute_local_audio(&self) {
        self.record(Call::Unmute);
        self.set_muted(false);
    }

    fn realtime_subscribe_to_mute_and_unmute_local_audio(&self, handler: MuteHandler) {
        self.record(Call::Subscribe);
        self.handlers.borrow_mut().push(handler);
    }

    fn realtime_unsubscribe_to_mute_and_unmute_local_audio(&self, handler: &MuteHandler) {
        self.record(Call::Unsubscribe);
        self.handlers
            .borrow_mut()
            .retain(|registered| !Rc::ptr_eq(registered, handler));
    }

    fn bind_audio_element(&self, element: &String) {
        self.record(Call::Bind(element.clone()));
        *self.bound.borrow_mut() = Some(element.clone());
    }

    fn unbind_audio_element(&self) {
        self.record(Call::Unbind);
        *self.bound.borrow_mut() = None;
    }

    fn add_observer(&self, observer: ObserverHandle) {
        self.record(Call::AddObserver);
        self.observers.borrow_mut().push(observer);
    }

    fn remove_observer(&self, observer: &ObserverHandle) {
        self.record(Call::RemoveObserver);
        self.observers
            .borrow_mut()
            .retain(|registered| !Rc::ptr_eq(registered, observer));
    }

    fn choose_audio_input_device(
        &self,
        device_id: Option<&str>,
    ) -> LocalBoxFuture<'static, Result<(), DeviceSelectionError>> {
        self.record(Call::ChooseDevice(device_id.map(str::to_string)));
        match &*self.mode.borrow() {
            SelectionMode::Succeed => async { Ok(()) }.boxed_local(),
            SelectionMode::Fail(e) => {
                let e = e.clone();
                async move { Err(e) }.boxed_local()
            }
            SelectionMode::Manual => {
                let (tx, rx) = oneshot::channel();
                self.pending.borrow_mut().push_back(tx);
                async move {
                    rx.await
                        .unwrap_or_else(|_| Err(DeviceSelectionError::Other("cancelled".into())))
                }
                .boxed_local()
            }
        }
    }
}

/// Lets spawned selection tasks run to completion.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
