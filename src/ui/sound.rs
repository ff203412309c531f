/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// Which effect a game event triggers, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sfx {
    Step,
    Bump,
    Win,
    Trapped,
    Caught,
}

impl Sfx {
    pub fn for_event(event: &GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::RatMoved { .. } => Some(Sfx::Step),
            GameEvent::MoveRejected { .. } => Some(Sfx::Bump),
            GameEvent::Won { .. } => Some(Sfx::Win),
            GameEvent::Trapped { .. } => Some(Sfx::Trapped),
            GameEvent::Caught { .. } => Some(Sfx::Caught),
            GameEvent::PursuerMoved { .. } | GameEvent::PursuerBlocked => None,
        }
    }
}

/// The outcome jingle replaces the step blip when both happen in one tick.
pub fn pick(events: &[GameEvent]) -> Option<Sfx> {
    let mut picked = None;
    for sfx in events.iter().filter_map(Sfx::for_event) {
        picked = match (picked, sfx) {
            (None, s) => Some(s),
            (Some(Sfx::Step | Sfx::Bump), s) => Some(s),
            (keep, _) => keep,
        };
    }
    picked
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_step: Arc<Vec<u8>>,
        sfx_bump: Arc<Vec<u8>>,
        sfx_win: Arc<Vec<u8>>,
        sfx_trapped: Arc<Vec<u8>>,
        sfx_caught: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "no audio output, sound disabled");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_step: Arc::new(make_wav(&gen_blip(660.0, 0.03, 0.15))),
                sfx_bump: Arc::new(make_wav(&gen_blip(140.0, 0.05, 0.2))),
                sfx_win: Arc::new(make_wav(&gen_win())),
                sfx_trapped: Arc::new(make_wav(&gen_trapped())),
                sfx_caught: Arc::new(make_wav(&gen_caught())),
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = match sfx {
                Sfx::Step => &self.sfx_step,
                Sfx::Bump => &self.sfx_bump,
                Sfx::Win => &self.sfx_win,
                Sfx::Trapped => &self.sfx_trapped,
                Sfx::Caught => &self.sfx_caught,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators, all mono f32 samples
    // ════════════════════════════════════════════════════════════

    /// Simple sine blip at given frequency and duration
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    fn gen_notes(notes: &[f32], note_dur: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Escape: ascending C5→E5→G5→C6
    fn gen_win() -> Vec<f32> {
        gen_notes(&[523.0, 659.0, 784.0, 1047.0], 0.1, 0.3)
    }

    /// Trap: descending whistle then a thud
    fn gen_trapped() -> Vec<f32> {
        let duration = 0.25;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut samples: Vec<f32> = (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 700.0 - t * 500.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * freq * TAU).sin() * (1.0 - t).powf(0.6) * 0.25
            })
            .collect();
        samples.extend(gen_blip(80.0, 0.12, 0.35));
        samples
    }

    /// Caught: sad A4→F#4→Eb4→C4 with a fade
    fn gen_caught() -> Vec<f32> {
        let mut samples = gen_notes(&[440.0, 370.0, 311.0, 261.0], 0.12, 0.3);
        let total = samples.len();
        let fade_len = total / 4;
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a 16-bit PCM buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * bits_per_sample as u32 / 8;
        let block_align = bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM
        buf.extend_from_slice(&1u16.to_le_bytes());  // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

impl SoundEngine {
    /// Play the single most important effect of a frame's events.
    pub fn play_events(&self, events: &[GameEvent]) {
        if let Some(sfx) = pick(events) {
            self.play(sfx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MoveDir;
    use crate::domain::grid::Cell;

    #[test]
    fn outcome_beats_step() {
        let events = [
            GameEvent::RatMoved { to: Cell::new(1, 2) },
            GameEvent::PursuerMoved { to: Cell::new(1, 2) },
            GameEvent::Caught { difficulty: 1 },
        ];
        assert_eq!(pick(&events), Some(Sfx::Caught));
    }

    #[test]
    fn quiet_frames() {
        assert_eq!(pick(&[]), None);
        assert_eq!(pick(&[GameEvent::PursuerBlocked]), None);
        assert_eq!(pick(&[GameEvent::MoveRejected { dir: MoveDir::Up }]), Some(Sfx::Bump));
    }
}
