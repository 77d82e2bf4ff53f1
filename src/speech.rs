//! Speech: a shared narrator (text-to-speech) and an optional transcriber
//! (speech-to-text).
//!
//! The narrator is a true singleton across features — the chat bot, the poem
//! player and the lesson reader all speak through the same instance, and
//! starting a new utterance implicitly cancels the one in flight
//! (last-writer-wins, never queued). That behavior is deliberate and load
//! bearing: the poem player relies on it to interrupt itself cleanly.
//!
//! Desktop systems have no universal TTS API, so the production backend
//! drives a feature-detected command-line engine. When none is installed the
//! narrator reports unavailable and every call is a silent no-op.

use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use log::{info, warn};
use parking_lot::Mutex;

/// Rate and pitch, both 1.0 = the engine default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeechOpts {
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechOpts {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

impl SpeechOpts {
    /// The slower, slightly higher voice used for reading to children.
    pub fn storytime() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.1,
        }
    }

    /// The chat bot's robot-ish voice.
    pub fn robot() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.2,
        }
    }
}

/// An engine capable of starting one utterance.
pub trait SpeechBackend: Send {
    fn name(&self) -> &str;
    fn start(&mut self, text: &str, opts: &SpeechOpts) -> io::Result<Box<dyn UtteranceControl>>;
}

/// Control over one in-flight utterance.
pub trait UtteranceControl: Send {
    fn stop(&mut self);
    fn is_finished(&mut self) -> bool;
}

struct UtteranceState {
    control: Option<Box<dyn UtteranceControl>>,
    cancelled: bool,
}

/// Handle to one `speak` call. Cheap to clone; polling it never blocks.
#[derive(Clone)]
pub struct SpeechHandle(Arc<Mutex<UtteranceState>>);

impl SpeechHandle {
    fn live(control: Box<dyn UtteranceControl>) -> Self {
        Self(Arc::new(Mutex::new(UtteranceState {
            control: Some(control),
            cancelled: false,
        })))
    }

    /// A handle that was never audible (engine missing or spawn failure).
    fn dead() -> Self {
        Self(Arc::new(Mutex::new(UtteranceState {
            control: None,
            cancelled: false,
        })))
    }

    pub fn was_cancelled(&self) -> bool {
        self.0.lock().cancelled
    }

    /// Finished, cancelled, or never started.
    pub fn is_finished(&self) -> bool {
        let mut state = self.0.lock();
        if state.cancelled {
            return true;
        }
        match state.control.as_mut() {
            Some(control) => control.is_finished(),
            None => true,
        }
    }

    /// Still audibly speaking.
    pub fn is_active(&self) -> bool {
        !self.is_finished()
    }

    fn cancel(&self) {
        let mut state = self.0.lock();
        if state.cancelled {
            return;
        }
        if let Some(control) = state.control.as_mut() {
            if !control.is_finished() {
                control.stop();
                state.cancelled = true;
            }
        }
    }
}

struct NarratorInner {
    backend: Option<Box<dyn SpeechBackend>>,
    current: Option<SpeechHandle>,
}

/// The shared speech synthesizer. Clones share one underlying engine.
#[derive(Clone)]
pub struct Narrator {
    inner: Arc<Mutex<NarratorInner>>,
}

impl Narrator {
    /// Probe the system for a usable engine.
    pub fn detect() -> Self {
        let backend = CommandBackend::detect();
        match &backend {
            Some(b) => info!("speech engine: {}", b.name()),
            None => info!("no speech engine found, narration disabled"),
        }
        Self::with_backend(backend.map(|b| Box::new(b) as Box<dyn SpeechBackend>))
    }

    /// Build with an explicit backend (or none). Tests inject fakes here.
    pub fn with_backend(backend: Option<Box<dyn SpeechBackend>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NarratorInner {
                backend,
                current: None,
            })),
        }
    }

    pub fn available(&self) -> bool {
        self.inner.lock().backend.is_some()
    }

    pub fn speak(&self, text: &str) -> SpeechHandle {
        self.speak_with(text, SpeechOpts::default())
    }

    /// Start speaking `text`, cancelling whatever was in flight.
    pub fn speak_with(&self, text: &str, opts: SpeechOpts) -> SpeechHandle {
        let mut inner = self.inner.lock();
        if let Some(previous) = inner.current.take() {
            previous.cancel();
        }
        let Some(backend) = inner.backend.as_mut() else {
            return SpeechHandle::dead();
        };
        match backend.start(text, &opts) {
            Ok(control) => {
                let handle = SpeechHandle::live(control);
                inner.current = Some(handle.clone());
                handle
            }
            Err(err) => {
                warn!("speech engine failed to start: {err}");
                SpeechHandle::dead()
            }
        }
    }

    /// Cancel the in-flight utterance, if any.
    pub fn cancel(&self) {
        if let Some(current) = self.inner.lock().current.take() {
            current.cancel();
        }
    }

    pub fn is_speaking(&self) -> bool {
        let inner = self.inner.lock();
        inner
            .current
            .as_ref()
            .is_some_and(|current| current.is_active())
    }
}

// ---------------------------------------------------------------------------
// Command-line engine backend
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum EngineKind {
    Espeak,
    Say,
    SpdSay,
}

struct CommandBackend {
    program: &'static str,
    kind: EngineKind,
}

impl CommandBackend {
    fn detect() -> Option<Self> {
        const CANDIDATES: [(&str, EngineKind); 4] = [
            ("espeak-ng", EngineKind::Espeak),
            ("espeak", EngineKind::Espeak),
            ("say", EngineKind::Say),
            ("spd-say", EngineKind::SpdSay),
        ];
        CANDIDATES
            .into_iter()
            .find(|(program, _)| on_path(program))
            .map(|(program, kind)| Self { program, kind })
    }
}

/// PATH lookup without spawning anything.
pub(crate) fn on_path(program: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| is_executable(&dir.join(program)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl SpeechBackend for CommandBackend {
    fn name(&self) -> &str {
        self.program
    }

    fn start(&mut self, text: &str, opts: &SpeechOpts) -> io::Result<Box<dyn UtteranceControl>> {
        let mut cmd = Command::new(self.program);
        match self.kind {
            EngineKind::Espeak => {
                // espeak: words-per-minute and a 0-99 pitch scale.
                cmd.arg("-s")
                    .arg(((175.0 * opts.rate) as i32).to_string())
                    .arg("-p")
                    .arg(((50.0 * opts.pitch).clamp(0.0, 99.0) as i32).to_string())
                    .arg(text);
            }
            EngineKind::Say => {
                cmd.arg("-r")
                    .arg(((175.0 * opts.rate) as i32).to_string())
                    .arg(text);
            }
            EngineKind::SpdSay => {
                let scale = |v: f32| (((v - 1.0) * 100.0).clamp(-100.0, 100.0) as i32).to_string();
                cmd.arg("-w")
                    .arg("-r")
                    .arg(scale(opts.rate))
                    .arg("-p")
                    .arg(scale(opts.pitch))
                    .arg(text);
            }
        }
        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(Box::new(ProcessUtterance { child }))
    }
}

struct ProcessUtterance {
    child: Child,
}

impl UtteranceControl for ProcessUtterance {
    fn stop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn is_finished(&mut self) -> bool {
        // An error from try_wait means the child is unreachable; treat it as
        // done rather than stuck.
        self.child.try_wait().map(|s| s.is_some()).unwrap_or(true)
    }
}

// ---------------------------------------------------------------------------
// Speech-to-text
// ---------------------------------------------------------------------------

/// Best-effort transcription via an external command configured with
/// `KIDSPARK_TRANSCRIBE_CMD` (it must record from the microphone and print
/// the transcript on stdout). Absent configuration hides the mic affordance
/// entirely.
pub struct Transcriber {
    program: String,
    args: Vec<String>,
}

impl Transcriber {
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var("KIDSPARK_TRANSCRIBE_CMD").ok()?;
        let mut parts = raw.split_whitespace().map(str::to_owned);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Start listening; the result arrives on the returned handle.
    pub fn listen(&self) -> Transcription {
        let (tx, rx) = mpsc::channel();
        let program = self.program.clone();
        let args = self.args.clone();
        thread::spawn(move || {
            let result = Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output()
                .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_owned());
            let _ = tx.send(result);
        });
        Transcription { rx }
    }
}

/// One in-flight listen. Poll per frame.
pub struct Transcription {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl Transcription {
    pub fn poll(&mut self) -> Option<io::Result<String>> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend whose utterances never end until stopped, and which counts
    /// live utterances so tests can observe the last-writer-wins contract.
    struct FakeBackend {
        live: Arc<AtomicUsize>,
    }

    struct FakeUtterance {
        live: Arc<AtomicUsize>,
        stopped: bool,
    }

    impl SpeechBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        fn start(&mut self, _text: &str, _opts: &SpeechOpts) -> io::Result<Box<dyn UtteranceControl>> {
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeUtterance {
                live: self.live.clone(),
                stopped: false,
            }))
        }
    }

    impl UtteranceControl for FakeUtterance {
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

    fn narrator_with_counter() -> (Narrator, Arc<AtomicUsize>) {
        let live = Arc::new(AtomicUsize::new(0));
        let narrator =
            Narrator::with_backend(Some(Box::new(FakeBackend { live: live.clone() })));
        (narrator, live)
    }

    #[test]
    fn speak_cancels_previous_utterance() {
        let (narrator, live) = narrator_with_counter();
        let first = narrator.speak("text A");
        assert!(first.is_active());
        let second = narrator.speak("text B");
        // Only B remains audible; A reports cancelled, not queued behind B.
        assert_eq!(live.load(Ordering::SeqCst), 1);
        assert!(first.was_cancelled());
        assert!(second.is_active());
    }

    #[test]
    fn cancel_silences_everything() {
        let (narrator, live) = narrator_with_counter();
        let handle = narrator.speak("hello");
        narrator.cancel();
        assert_eq!(live.load(Ordering::SeqCst), 0);
        assert!(handle.was_cancelled());
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn missing_engine_degrades_silently() {
        let narrator = Narrator::with_backend(None);
        assert!(!narrator.available());
        let handle = narrator.speak("nobody hears this");
        assert!(handle.is_finished());
        assert!(!handle.was_cancelled());
        assert!(!narrator.is_speaking());
    }
}
