//! Forwarding of tray diagnostics to the Godot console.
//!
//! The tray core logs through `tracing`. Inside the engine there is no other
//! subscriber, so this module installs one that writes each event to the Godot
//! output panel with a severity matching its level.

use godot::prelude::*;
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Writes formatted events to the Godot console, one call per event.
#[derive(Clone, Copy)]
pub struct GodotConsole {
    emit: fn(Level, &str),
}

impl GodotConsole {
    pub fn new() -> Self {
        Self {
            emit: emit_to_godot,
        }
    }
}

impl Default for GodotConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MakeWriter<'a> for GodotConsole {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO, self.emit)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level(), self.emit)
    }
}

/// Buffers one formatted event and emits it when dropped.
pub struct ConsoleLine {
    level: Level,
    buf: Vec<u8>,
    emit: fn(Level, &str),
}

impl ConsoleLine {
    fn new(level: Level, emit: fn(Level, &str)) -> Self {
        Self {
            level,
            buf: Vec::new(),
            emit,
        }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let text = text.trim_end();
        if !text.is_empty() {
            (self.emit)(self.level, text);
        }
    }
}

fn emit_to_godot(level: Level, text: &str) {
    match level {
        Level::ERROR => godot_error!("{}", text),
        Level::WARN => godot_warn!("{}", text),
        _ => godot_print!("{}", text),
    }
}

/// Installs the Godot console as the global `tracing` subscriber.
///
/// Does nothing if the host already installed a subscriber.
pub fn install() {
    let _ = tracing_subscriber::fmt()
        .with_writer(GodotConsole::new())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_level(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuItem, RootMenuItem};
    use crate::tray::native::{ActionSink, NativeMenuItem, NativeTraySubsystem};
    use crate::tray::scheduler::{DeferredQueue, Scheduler};
    use crate::tray::TrayBridge;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    static LINES: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

    fn record(level: Level, text: &str) {
        LINES.lock().unwrap().push((level, text.to_string()));
    }

    struct EchoNative;

    impl NativeTraySubsystem for EchoNative {
        fn put_notify_icon(&self, _tree: NativeMenuItem, callback: ActionSink) {
            callback(json!({ "hover": "a" }));
        }
    }

    #[test]
    fn tray_diagnostics_reach_the_console_with_their_level() {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(GodotConsole { emit: record })
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_level(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let bridge = TrayBridge::new(Arc::new(EchoNative), Arc::new(DeferredQueue::new()));
            let _pending = bridge.put_system_tray(Arc::new(RootMenuItem::new(
                vec![0],
                MenuItem::new("App"),
            )));

            let queue = DeferredQueue::new();
            queue.schedule(Box::new(|| panic!("handler failure")));
            queue.run_pending();
        });

        let lines = LINES.lock().unwrap();
        assert!(lines.iter().any(|(level, text)| {
            *level == Level::ERROR && text.contains("invalid action from native tray")
        }));
        assert!(lines.iter().any(|(level, text)| {
            *level == Level::ERROR && text.contains("tray click handler panicked")
        }));
        assert!(lines.iter().all(|(_, text)| !text.ends_with('\n')));
    }
}
