//! Single-tray session for frame-driven hosts.
//!
//! A [`TraySession`] owns at most one live bridge. It refuses a second put
//! while a tray is pending or up, and frees the slot again when putting fails,
//! so the host can retry.

use crate::error::Result;
use crate::menu::RootMenuItem;
use crate::tray::bridge::{PendingTray, TrayBridge};
use crate::tray::native::NativeTraySubsystem;
use std::sync::Arc;

/// At most one tray, polled once per frame.
pub struct TraySession<N: NativeTraySubsystem> {
    bridge: Option<TrayBridge<N>>,
    pending: Option<PendingTray>,
}

impl<N: NativeTraySubsystem> TraySession<N> {
    pub fn new() -> Self {
        Self {
            bridge: None,
            pending: None,
        }
    }

    /// Whether a tray is pending or up.
    pub fn is_active(&self) -> bool {
        self.bridge.is_some()
    }

    /// Puts `tray` through `bridge`.
    ///
    /// Returns `false` without touching `bridge` if a tray is already pending or up.
    pub fn put(&mut self, bridge: TrayBridge<N>, tray: Arc<RootMenuItem>) -> bool {
        if self.is_active() {
            return false;
        }

        self.pending = Some(bridge.put_system_tray(tray));
        self.bridge = Some(bridge);
        true
    }

    /// Returns the outcome of the last put once it settles, and only once.
    ///
    /// On failure the bridge is released and [`TraySession::put`] may be called again.
    pub fn poll(&mut self) -> Option<Result<()>> {
        let settled = self.pending.as_mut().and_then(PendingTray::try_settled)?;
        self.pending = None;
        if settled.is_err() {
            self.bridge = None;
        }
        Some(settled)
    }
}

impl<N: NativeTraySubsystem> Default for TraySession<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrayError;
    use crate::menu::MenuItem;
    use crate::tray::action::Action;
    use crate::tray::native::{ActionSink, NativeMenuItem};
    use crate::tray::scheduler::DeferredQueue;
    use std::sync::Mutex;

    /// Answers every put with a scripted action and keeps the callback alive.
    struct ScriptedNative {
        reply: Action,
        puts: Mutex<Vec<ActionSink>>,
    }

    impl ScriptedNative {
        fn new(reply: Action) -> Arc<Self> {
            Arc::new(Self {
                reply,
                puts: Mutex::new(Vec::new()),
            })
        }
    }

    impl NativeTraySubsystem for ScriptedNative {
        fn put_notify_icon(&self, _tree: NativeMenuItem, callback: ActionSink) {
            callback(self.reply.to_wire());
            self.puts.lock().unwrap().push(callback);
        }
    }

    fn bridge(native: &Arc<ScriptedNative>) -> TrayBridge<ScriptedNative> {
        TrayBridge::new(native.clone(), Arc::new(DeferredQueue::new()))
    }

    fn tray() -> Arc<RootMenuItem> {
        Arc::new(RootMenuItem::new(vec![0], MenuItem::new("App")))
    }

    #[test]
    fn failed_put_can_be_retried() {
        let failing = ScriptedNative::new(Action::Error("couldn't decode icon".to_string()));
        let mut session = TraySession::new();

        assert!(session.put(bridge(&failing), tray()));
        assert_eq!(
            session.poll(),
            Some(Err(TrayError::Native("couldn't decode icon".to_string())))
        );
        assert!(!session.is_active());
        assert_eq!(session.poll(), None);

        let working = ScriptedNative::new(Action::Ready);
        assert!(session.put(bridge(&working), tray()));
        assert_eq!(session.poll(), Some(Ok(())));
        assert!(session.is_active());
        assert_eq!(working.puts.lock().unwrap().len(), 1);
    }

    #[test]
    fn second_put_is_refused_while_pending_or_up() {
        let silent = ScriptedNative::new(Action::End);
        let mut session = TraySession::new();

        assert!(session.put(bridge(&silent), tray()));
        assert_eq!(session.poll(), None);
        assert!(!session.put(bridge(&silent), tray()));
        assert_eq!(silent.puts.lock().unwrap().len(), 1);

        let ready = ScriptedNative::new(Action::Ready);
        let mut session = TraySession::new();
        assert!(session.put(bridge(&ready), tray()));
        assert_eq!(session.poll(), Some(Ok(())));
        assert!(!session.put(bridge(&ready), tray()));
        assert_eq!(ready.puts.lock().unwrap().len(), 1);
    }
}
