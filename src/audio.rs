//! Audio system using Web Audio API
//!
//! Procedurally generated sound cues - no external files needed.
//! Each cue is a short sequence of oscillator tones; native builds only log.

use crate::sim::{AudioSink, SoundCue};

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq: f32,
    /// Seconds until the gain has decayed
    pub duration: f64,
    pub volume: f32,
    /// Seconds after the cue starts
    pub delay: f64,
}

const fn tone(wave: Wave, freq: f32, duration: f64, volume: f32, delay: f64) -> Tone {
    Tone {
        wave,
        freq,
        duration,
        volume,
        delay,
    }
}

/// Tones making up a cue
pub fn tones(cue: SoundCue) -> Vec<Tone> {
    use Wave::*;
    match cue {
        SoundCue::Hit => vec![tone(Square, 200.0, 0.1, 0.2, 0.0)],
        SoundCue::CriticalHit => vec![
            tone(Sawtooth, 300.0, 0.15, 0.3, 0.0),
            tone(Sine, 500.0, 0.1, 0.2, 0.05),
        ],
        // Rising triad
        SoundCue::MagicAttack => (0..3)
            .map(|i| tone(Sine, 400.0 + i as f32 * 200.0, 0.1, 0.15, i as f64 * 0.05))
            .collect(),
        SoundCue::HeavyAttack => vec![tone(Sawtooth, 100.0, 0.2, 0.3, 0.0)],
        SoundCue::RangedAttack => vec![tone(Triangle, 600.0, 0.08, 0.15, 0.0)],
        SoundCue::Jump => vec![
            tone(Sine, 300.0, 0.1, 0.1, 0.0),
            tone(Sine, 400.0, 0.1, 0.1, 0.05),
        ],
        // C E G C
        SoundCue::Victory => [262.0, 330.0, 392.0, 523.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| tone(Sine, f, 0.3, 0.2, i as f64 * 0.15))
            .collect(),
        SoundCue::Defeat => vec![
            tone(Sawtooth, 200.0, 0.5, 0.2, 0.0),
            tone(Sawtooth, 150.0, 0.5, 0.2, 0.2),
        ],
    }
}

/// Audio manager for battle sound cues
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::trace!("Sound cue {:?}", cue);

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };
            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for t in tones(cue) {
                play_tone(ctx, &t, vol);
            }
        }
    }
}

impl AudioSink for AudioManager {
    fn notify(&mut self, cue: SoundCue) {
        self.play(cue);
    }
}

#[cfg(target_arch = "wasm32")]
fn play_tone(ctx: &web_sys::AudioContext, tone: &Tone, vol: f32) -> Option<()> {
    use web_sys::OscillatorType;

    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(match tone.wave {
        Wave::Sine => OscillatorType::Sine,
        Wave::Square => OscillatorType::Square,
        Wave::Sawtooth => OscillatorType::Sawtooth,
        Wave::Triangle => OscillatorType::Triangle,
    });
    osc.frequency().set_value(tone.freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    let t = ctx.current_time() + tone.delay;
    gain.gain().set_value_at_time(tone.volume * vol, t).ok()?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
        .ok()?;
    osc.start_with_when(t).ok()?;
    osc.stop_with_when(t + tone.duration).ok()?;
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SoundCue; 8] = [
        SoundCue::Hit,
        SoundCue::CriticalHit,
        SoundCue::MagicAttack,
        SoundCue::HeavyAttack,
        SoundCue::RangedAttack,
        SoundCue::Jump,
        SoundCue::Victory,
        SoundCue::Defeat,
    ];

    #[test]
    fn test_every_cue_has_tones() {
        for cue in ALL {
            let t = tones(cue);
            assert!(!t.is_empty(), "{:?}", cue);
            for tone in t {
                assert!(tone.volume > 0.0 && tone.volume <= 0.3);
                assert!(tone.duration > 0.0);
            }
        }
    }

    #[test]
    fn test_victory_is_ascending_arpeggio() {
        let t = tones(SoundCue::Victory);
        assert_eq!(t.len(), 4);
        assert!(t.windows(2).all(|w| w[1].freq > w[0].freq && w[1].delay > w[0].delay));
    }

    #[test]
    fn test_mute() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        assert!(audio.is_muted());
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_muted(false);
        audio.set_master_volume(3.0);
        assert_eq!(audio.effective_volume(), 1.0);
        audio.notify(SoundCue::Hit);
    }
}
