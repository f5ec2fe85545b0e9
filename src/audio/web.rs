//! Audio sink using Web Audio API
//!
//! Procedurally generated cues - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, Cue};

/// Web Audio backed sink
pub struct WebAudio {
    ctx: Option<AudioContext>,
    /// Every voice routes through this bus; swapping it silences them all
    bus: Option<GainNode>,
    /// Cue level while unmuted
    volume: f32,
    muted: bool,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let bus = ctx.as_ref().and_then(Self::create_bus);
        Self {
            ctx,
            bus,
            volume: 0.8,
            muted: false,
        }
    }

    fn create_bus(ctx: &AudioContext) -> Option<GainNode> {
        let bus = ctx.create_gain().ok()?;
        bus.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(bus)
    }

    /// Set cue volume (0.0 - 1.0), see [`crate::Settings::cue_volume`]
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Create an oscillator with gain envelope, routed through the bus
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let bus = self.bus.as_ref()?;
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(bus).ok()?;

        Some((osc, gain))
    }

    /// Shoot - short laser chirp
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Hit - crunchy pop
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        // Bright crack on top
        if let Some((osc, gain)) = self.create_osc(ctx, 2500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.06).ok();
        }
    }

    /// Game start - rising arpeggio
    fn play_game_start(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

impl AudioSink for WebAudio {
    fn play(&mut self, cue: Cue) {
        let vol = self.volume;
        if self.muted || vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Shoot => self.play_shoot(ctx, vol),
            Cue::Hit => self.play_hit(ctx, vol),
            Cue::GameStart => self.play_game_start(ctx, vol),
            Cue::GameOver => self.play_game_over(ctx, vol),
        }
    }

    fn stop_all(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if let Some(bus) = self.bus.take() {
            let _ = bus.disconnect();
        }
        self.bus = Self::create_bus(ctx);
        if self.bus.is_none() {
            log::warn!("Failed to recreate audio bus - audio disabled");
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
