//! Background fetches for the UI.
//!
//! The app has no async runtime; a fetch is a worker thread and an mpsc
//! channel. Widgets own a [`Load`] and tick it once per frame; dropping the
//! widget drops the receiver, and the worker's send just fails silently.

use std::sync::mpsc;
use std::thread;

use super::AiError;

/// A single in-flight background computation.
pub struct Fetch<T> {
    rx: mpsc::Receiver<Result<T, AiError>>,
}

impl<T: Send + 'static> Fetch<T> {
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<T, AiError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may be gone if the user left the screen.
            let _ = tx.send(work());
        });
        Self { rx }
    }

    /// Non-blocking poll. `Some` exactly once, when the worker finishes.
    pub fn poll(&mut self) -> Option<Result<T, AiError>> {
        self.rx.try_recv().ok()
    }
}

/// Lifecycle of one screen's AI content.
pub enum Load<T> {
    Idle,
    Loading(Fetch<T>),
    Ready(T),
    Failed(AiError),
}

impl<T: Send + 'static> Load<T> {
    pub fn start<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<T, AiError> + Send + 'static,
    {
        Self::Loading(Fetch::spawn(work))
    }

    /// Advance Loading -> Ready/Failed when the worker reports in. Call once
    /// per frame before rendering.
    pub fn tick(&mut self) {
        if let Self::Loading(fetch) = self {
            if let Some(result) = fetch.poll() {
                *self = match result {
                    Ok(value) => Self::Ready(value),
                    Err(err) => Self::Failed(err),
                };
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn load_transitions_to_ready() {
        let mut load = Load::start(|| Ok(41 + 1));
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            load.tick();
            match &load {
                Load::Ready(value) => {
                    assert_eq!(*value, 42);
                    break;
                }
                Load::Failed(err) => panic!("unexpected failure: {err}"),
                _ if Instant::now() > deadline => panic!("fetch never completed"),
                _ => thread::sleep(Duration::from_millis(5)),
            }
        }
    }

    #[test]
    fn load_transitions_to_failed() {
        let mut load: Load<()> = Load::start(|| Err(AiError::Empty));
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            load.tick();
            match &load {
                Load::Failed(AiError::Empty) => break,
                Load::Ready(()) => panic!("unexpected success"),
                _ if Instant::now() > deadline => panic!("fetch never completed"),
                _ => thread::sleep(Duration::from_millis(5)),
            }
        }
    }
}
