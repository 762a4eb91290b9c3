//! Tray bridge.
//!
//! [`TrayBridge`] hands a menu tree to the native subsystem once and turns the
//! actions it reports into a settle result and deferred click handlers.

use crate::error::{Result, TrayError};
use crate::menu::{RootMenuItem, match_menu_item_id};
use crate::tray::action::Action;
use crate::tray::native::{ActionSink, NativeTraySubsystem};
use crate::tray::scheduler::{Scheduler, TokioScheduler};
use std::future::Future;
use std::pin::Pin;
use std::slice;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Connects caller-side menu trees to a native tray subsystem.
pub struct TrayBridge<N: NativeTraySubsystem> {
    native: Arc<N>,
    scheduler: Arc<dyn Scheduler>,
}

impl<N: NativeTraySubsystem> TrayBridge<N> {
    /// Creates a bridge over an already loaded native subsystem.
    ///
    /// Click handlers are run through `scheduler`.
    pub fn new(native: Arc<N>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { native, scheduler }
    }

    /// Creates a bridge whose click handlers run on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn with_tokio(native: Arc<N>) -> Self {
        Self::new(native, Arc::new(TokioScheduler::current()))
    }

    /// Puts the tray icon described by `tray`.
    ///
    /// The returned [`PendingTray`] settles on the first `ready` or `error`
    /// action. The registration with the native subsystem outlives it and keeps
    /// delivering clicks for as long as the icon exists.
    pub fn put_system_tray(&self, tray: Arc<RootMenuItem>) -> PendingTray {
        let (sender, receiver) = oneshot::channel();
        let dispatcher = Arc::new(ActionDispatcher {
            tray: Arc::clone(&tray),
            settle: Mutex::new(Some(sender)),
            scheduler: Arc::clone(&self.scheduler),
        });

        let callback: ActionSink = Arc::new(move |wire| dispatcher.dispatch(Action::decode(wire)));
        self.native.put_notify_icon(tray.to_native(), callback);

        PendingTray { receiver }
    }
}

struct ActionDispatcher {
    tray: Arc<RootMenuItem>,
    settle: Mutex<Option<oneshot::Sender<Result<()>>>>,
    scheduler: Arc<dyn Scheduler>,
}

impl ActionDispatcher {
    fn dispatch(&self, action: Action) {
        match action {
            Action::Ready => {
                if !self.settle(Ok(())) {
                    tracing::debug!("native tray reported ready again");
                }
            }
            Action::Error(message) => {
                if !self.settle(Err(TrayError::Native(message.clone()))) {
                    tracing::warn!(%message, "native tray reported an error after settling");
                }
            }
            Action::End => {
                tracing::debug!("native tray icon ended");
            }
            Action::Click(id) => {
                match match_menu_item_id(slice::from_ref(self.tray.item()), &id) {
                    Some(item) => {
                        let handler = Arc::clone(&item.on_click);
                        self.scheduler.schedule(Box::new(move || handler()));
                    }
                    None => tracing::debug!(%id, "no clickable menu item matches click"),
                }
            }
            Action::Unknown(raw) => {
                tracing::error!(action = %raw, "invalid action from native tray");
            }
        }
    }

    /// Settles the pending result. Returns false if it was already settled.
    fn settle(&self, result: Result<()>) -> bool {
        let sender = self
            .settle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(sender) => {
                // The caller may have dropped the PendingTray; the tray stays up regardless.
                let _ = sender.send(result);
                true
            }
            None => false,
        }
    }
}

/// Outcome of [`TrayBridge::put_system_tray`].
///
/// Resolves to `Ok(())` on `ready`, to [`TrayError::Native`] on `error`, and to
/// [`TrayError::Detached`] if the native side drops its callback first.
#[must_use = "dropping a PendingTray discards the ready/error outcome"]
pub struct PendingTray {
    receiver: oneshot::Receiver<Result<()>>,
}

impl PendingTray {
    /// Non-blocking check for hosts that poll once per frame.
    ///
    /// Returns `None` while unsettled. Once a result has been returned, later
    /// calls report [`TrayError::Detached`].
    pub fn try_settled(&mut self) -> Option<Result<()>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(TrayError::Detached)),
        }
    }
}

impl Future for PendingTray {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(TrayError::Detached)))
    }
}
