//! Terminal input thread and application event channel.
//!
//! [`EventHandler`] spawns an OS thread (not a tokio task) because
//! `crossterm::event::poll()` blocks and would starve the async runtime.
//! Drop signals shutdown without joining to avoid deadlocking if `poll`
//! blocks during panic unwinding.
//!
//! Mouse events are forwarded raw; the main loop owns the drag-selection
//! interpretation because it has the layout geometry.

use crate::app::{GhUser, RepoItem};
use crate::sync::BatchOutcome;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// Terminal lost focus. Cancels an in-flight drag so the selection box
    /// can't get stuck when the pointer-up happens in another window.
    FocusLost,
    Tick,
    ReposLoaded {
        /// Load sequence this result answers. Stale sequences are dropped.
        seq: u64,
        repos: Vec<RepoItem>,
        from_cache: bool,
    },
    UserLoaded(GhUser),
    DeleteDone {
        full_name: String,
    },
    BatchDone(BatchOutcome),
    /// Remote boundary reported an invalid session. The main loop resets
    /// state and exits with a sign-in hint.
    AuthExpired,
    /// Global toast, auto-dismisses after `ERROR_TTL_SECS`.
    Error(String),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let eventtx = tx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        let thread = std::thread::spawn(move || {
            while !shutdown_flag.load(Ordering::Relaxed) {
                match event::poll(tick_rate) {
                    Err(e) => {
                        let _ = eventtx.send(AppEvent::Error(format!("Terminal poll error: {e}")));
                        break;
                    }
                    Ok(false) => {
                        if eventtx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                        continue;
                    }
                    Ok(true) => {}
                }
                let app_event = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => Some(AppEvent::Key(key)),
                    Ok(CrosstermEvent::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                    Ok(CrosstermEvent::Resize(_, _)) => Some(AppEvent::Resize),
                    Ok(CrosstermEvent::FocusLost) => Some(AppEvent::FocusLost),
                    Ok(_) => None,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                        // EINTR, retry silently
                        None
                    }
                    Err(e) => {
                        let _ = eventtx.send(AppEvent::Error(format!("Terminal read error: {e}")));
                        break;
                    }
                };
                if let Some(app_event) = app_event {
                    if eventtx.send(app_event).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            rx,
            tx,
            shutdown,
            thread: Some(thread),
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if let Err(panic_payload) = handle.join() {
                let msg = panic_payload.downcast::<String>().map_or_else(
                    |p| {
                        p.downcast::<&str>()
                            .map_or_else(|_| "unknown panic".to_string(), |s| s.to_string())
                    },
                    |s| *s,
                );
                tracing::error!("event thread panicked: {msg}");
            }
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        // Only signal shutdown; don't join the thread in Drop to avoid
        // deadlocking if crossterm::event::poll is blocking (e.g. during
        // panic unwinding). The thread exits on its next poll tick.
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
