//! Tray core functionality.
//!
//! This module contains the bridge between caller-side menu trees and a native
//! tray subsystem: wire action decoding, deferred click scheduling, the native
//! boundary, the single-tray session used by frame-driven hosts, and the
//! KSNI-backed subsystem.

pub mod action;
pub mod bridge;
pub mod ksni_impl;
pub mod native;
pub mod scheduler;
pub mod session;

pub use action::Action;
pub use bridge::{PendingTray, TrayBridge};
pub use ksni_impl::{KsniSubsystem, KsniTray};
pub use native::{ActionSink, NativeMenuItem, NativeTraySubsystem};
pub use scheduler::{DeferredQueue, Scheduler, Task, TokioScheduler};
pub use session::TraySession;
