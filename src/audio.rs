//! Tone audio for the mini-games: short synthesized notes and the looping
//! background melody.
//!
//! Notes are synthesized in memory (sine or square oscillator with a short
//! attack and an exponential decay, the same envelope the games' sounds are
//! tuned around) and handed as WAV files to a feature-detected command-line
//! player. With no player installed every call degrades to silence.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use log::info;

const SAMPLE_RATE: u32 = 22_050;

/// Note frequencies used around the app (Hz).
pub mod notes {
    pub const C4: f32 = 261.63;
    pub const D4: f32 = 293.66;
    pub const E4: f32 = 329.63;
    pub const F4: f32 = 349.23;
    pub const G4: f32 = 392.00;
    pub const A4: f32 = 440.00;
    pub const B4: f32 = 493.88;
    pub const C5: f32 = 523.25;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// One synthesized tone.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    pub freq: f32,
    pub duration: f32,
    pub wave: Waveform,
    pub gain: f32,
}

impl Tone {
    pub fn note(freq: f32, duration: f32) -> Self {
        Self {
            freq,
            duration,
            wave: Waveform::Sine,
            gain: 0.5,
        }
    }

    pub fn blip(freq: f32) -> Self {
        Self {
            freq,
            duration: 0.12,
            wave: Waveform::Square,
            gain: 0.35,
        }
    }
}

/// Feature-detected tone player. Cheap to clone; clones share the detected
/// player and the temp-file counter.
#[derive(Clone)]
pub struct ToneSynth {
    player: Option<&'static str>,
    serial: Arc<AtomicU64>,
}

impl ToneSynth {
    pub fn detect() -> Self {
        const PLAYERS: [&str; 4] = ["paplay", "pw-play", "aplay", "afplay"];
        let player = PLAYERS.into_iter().find(|p| crate::speech::on_path(p));
        match player {
            Some(p) => info!("tone player: {p}"),
            None => info!("no audio player found, tones disabled"),
        }
        Self {
            player,
            serial: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A synth that never makes a sound; used in tests.
    pub fn silent() -> Self {
        Self {
            player: None,
            serial: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn available(&self) -> bool {
        self.player.is_some()
    }

    /// Fire-and-forget playback. Returns immediately.
    pub fn play(&self, tone: Tone) {
        let Some(player) = self.player else {
            return;
        };
        let wav = synthesize(tone);
        let serial = self.serial.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "kidspark-tone-{}-{serial}.wav",
            std::process::id()
        ));
        thread::spawn(move || {
            if fs::write(&path, wav).is_ok() {
                let _ = Command::new(player)
                    .arg(&path)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status();
            }
            let _ = fs::remove_file(&path);
        });
    }
}

/// Render a tone to a mono 16-bit WAV.
fn synthesize(tone: Tone) -> Vec<u8> {
    let sample_count = (tone.duration.max(0.01) * SAMPLE_RATE as f32) as usize;
    let attack = (SAMPLE_RATE as f32 * 0.01) as usize;
    let mut samples = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let t = i as f32 / SAMPLE_RATE as f32;
        let phase = (t * tone.freq).fract();
        let raw = match tone.wave {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };
        // Short linear attack to avoid a click, then exponential decay.
        let envelope = if i < attack {
            i as f32 / attack as f32
        } else {
            let progress = (i - attack) as f32 / (sample_count - attack).max(1) as f32;
            (-5.0 * progress).exp()
        };
        samples.push((raw * envelope * tone.gain * i16::MAX as f32) as i16);
    }
    wav_bytes(&samples)
}

fn wav_bytes(samples: &[i16]) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let byte_rate = SAMPLE_RATE * 2;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// The cheerful background melody (C major chime pattern): frequency and
/// duration in seconds.
const MELODY: [(f32, f32); 12] = [
    (notes::C4, 0.5),
    (notes::E4, 0.5),
    (notes::G4, 0.5),
    (notes::C5, 1.0),
    (notes::G4, 0.5),
    (notes::E4, 0.5),
    (notes::C4, 1.0),
    (notes::D4, 0.5),
    (notes::F4, 0.5),
    (notes::G4, 0.5),
    (notes::D4, 0.5),
    (notes::C4, 2.0),
];

/// Loops the background melody on its own scheduler thread. The thread is
/// owned by this value: toggling off (or dropping) raises the stop flag and
/// the loop exits at the next note boundary.
pub struct MusicBox {
    synth: ToneSynth,
    stop: Option<Arc<AtomicBool>>,
}

impl MusicBox {
    pub fn new(synth: ToneSynth) -> Self {
        Self { synth, stop: None }
    }

    pub fn is_playing(&self) -> bool {
        self.stop.is_some()
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn start(&mut self) {
        if self.stop.is_some() || !self.synth.available() {
            return;
        }
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let synth = self.synth.clone();
        thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                for &(freq, duration) in &MELODY {
                    if flag.load(Ordering::Relaxed) {
                        return;
                    }
                    synth.play(Tone {
                        freq,
                        duration,
                        wave: Waveform::Sine,
                        gain: 0.15,
                    });
                    thread::sleep(Duration::from_secs_f32(duration));
                }
            }
        });
        self.stop = Some(stop);
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for MusicBox {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_is_well_formed() {
        let wav = synthesize(Tone::note(notes::A4, 0.1));
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        let data_len = u32::from_le_bytes(wav[40..44].try_into().unwrap()) as usize;
        assert_eq!(wav.len(), 44 + data_len);
        // 0.1 s at 22.05 kHz mono 16-bit.
        assert_eq!(data_len, 2205 * 2);
    }

    #[test]
    fn envelope_decays_to_near_silence() {
        let wav = synthesize(Tone::note(notes::C4, 0.5));
        let tail = &wav[wav.len() - 200..];
        let loudest_tail = tail
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]).unsigned_abs())
            .max()
            .unwrap();
        assert!(loudest_tail < i16::MAX as u16 / 20);
    }

    #[test]
    fn silent_synth_never_panics() {
        let synth = ToneSynth::silent();
        assert!(!synth.available());
        synth.play(Tone::blip(800.0));
        let mut music = MusicBox::new(synth);
        music.toggle();
        assert!(!music.is_playing());
    }
}
