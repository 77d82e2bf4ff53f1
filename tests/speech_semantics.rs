//! The narrator's singleton contract: speaking is last-writer-wins, never
//! queued, and a missing engine degrades to silent no-ops.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kidspark::speech::{Narrator, SpeechBackend, SpeechOpts, UtteranceControl};

/// Counts utterances that are currently audible.
struct CountingBackend {
    live: Arc<AtomicUsize>,
    started: Arc<AtomicUsize>,
}

struct CountingUtterance {
    live: Arc<AtomicUsize>,
    stopped: bool,
}

impl SpeechBackend for CountingBackend {
    fn name(&self) -> &str {
        "counting"
    }

    fn start(&mut self, _text: &str, _opts: &SpeechOpts) -> io::Result<Box<dyn UtteranceControl>> {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingUtterance {
            live: self.live.clone(),
            stopped: false,
        }))
    }
}

impl UtteranceControl for CountingUtterance {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_finished(&mut self) -> bool {
        self.stopped
    }
}

fn narrator() -> (Narrator, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let live = Arc::new(AtomicUsize::new(0));
    let started = Arc::new(AtomicUsize::new(0));
    let backend = CountingBackend {
        live: live.clone(),
        started: started.clone(),
    };
    (Narrator::with_backend(Some(Box::new(backend))), live, started)
}

#[test]
fn starting_b_cancels_a_instead_of_queueing() {
    let (narrator, live, started) = narrator();
    let a = narrator.speak("text A");
    let b = narrator.speak("text B");

    // Both were started, but only B is audible now.
    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert_eq!(live.load(Ordering::SeqCst), 1);
    assert!(a.was_cancelled());
    assert!(!b.was_cancelled());
    assert!(b.is_active());
}

#[test]
fn three_rapid_speaks_leave_exactly_one_voice() {
    let (narrator, live, _) = narrator();
    let _ = narrator.speak("one");
    let _ = narrator.speak("two");
    let last = narrator.speak("three");
    assert_eq!(live.load(Ordering::SeqCst), 1);
    assert!(last.is_active());
}

#[test]
fn cancel_stops_the_current_utterance() {
    let (narrator, live, _) = narrator();
    let handle = narrator.speak("hello");
    assert!(narrator.is_speaking());
    narrator.cancel();
    assert_eq!(live.load(Ordering::SeqCst), 0);
    assert!(handle.was_cancelled());
    assert!(!narrator.is_speaking());
}

#[test]
fn clones_share_the_same_singleton() {
    let (narrator, live, _) = narrator();
    let other = narrator.clone();
    let first = narrator.speak("from the poem player");
    let _second = other.speak("from the chat bot");
    // The clone's speak cancelled the original's utterance.
    assert_eq!(live.load(Ordering::SeqCst), 1);
    assert!(first.was_cancelled());
}

#[test]
fn absent_engine_is_a_silent_noop() {
    let narrator = Narrator::with_backend(None);
    assert!(!narrator.available());
    let handle = narrator.speak("nobody hears this");
    assert!(handle.is_finished());
    assert!(!handle.was_cancelled());
    narrator.cancel();
    assert!(!narrator.is_speaking());
}
