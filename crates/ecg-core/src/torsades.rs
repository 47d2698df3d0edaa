//! Continuous polymorphic VT model with a twisting amplitude envelope and a
//! slowly rotating axis.

use std::f64::consts::PI;

use rand::Rng;

use crate::waveform::{hash01, smoothstep};

const FM_RATE_HZ: f64 = 0.28;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorsadesParams {
    pub envelope_period_s: f64,
    pub envelope_phase: f64,
    pub axis_period_s: f64,
    pub axis_phase: f64,
    pub fm_depth: f64,
    pub fm_phase: f64,
    pub morph_phase: f64,
    pub morph_rate_hz: f64,
}

impl TorsadesParams {
    pub fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let tau = 2.0 * PI;
        Self {
            envelope_period_s: 3.6 + rng.gen::<f64>() * 1.2,
            envelope_phase: rng.gen::<f64>() * tau,
            axis_period_s: 4.2 + rng.gen::<f64>() * 2.0,
            axis_phase: rng.gen::<f64>() * tau,
            fm_depth: 0.06 + rng.gen::<f64>() * 0.05,
            fm_phase: rng.gen::<f64>() * tau,
            morph_phase: rng.gen::<f64>() * tau,
            morph_rate_hz: 0.10 + rng.gen::<f64>() * 0.10,
        }
    }

    /// Voltage in pixels at `t_s` seconds of unwrapped simulation time.
    pub fn voltage_px(&self, t_s: f64, heart_rate_bpm: f64, r_amp_px: f64) -> f64 {
        let tau = 2.0 * PI;
        let f = heart_rate_bpm.clamp(160.0, 240.0) / 60.0;

        let fm = self.fm_depth * (tau * FM_RATE_HZ * t_s + self.fm_phase).sin();
        let drift = 0.015 * (tau * 0.11 * t_s + 1.1).sin();
        let phase = tau * (f * 2.0 * t_s + fm + drift);

        let h1 = phase.sin();
        let h3 = 0.55 * (3.0 * phase + 0.35).sin();
        let h5 = 0.20 * (5.0 * phase + 0.85).sin();
        let morph = 0.08 * (tau * self.morph_rate_hz * t_s + self.morph_phase).sin();
        let raw = (1.0 + morph) * h1 + (1.0 - morph) * h3 + h5;
        let wave = 0.55 * (1.35 * raw).tanh() + 0.25 * (phase + 0.25).sin() + 0.20 * (phase + 0.65).sin();

        let env_sin = 0.5 + 0.5 * (tau * t_s / self.envelope_period_s + self.envelope_phase).sin();
        let envelope = 0.18 + 0.82 * smoothstep(0.08, 0.92, env_sin).powf(1.15);
        let jitter = 1.0 + 0.03 * (hash01((t_s * 12.0).floor()) - 0.5);

        let axis = 0.20 + 0.80 * (tau * t_s / self.axis_period_s + self.axis_phase).sin();

        -(1.15 * r_amp_px * envelope * jitter) * wave * axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn voltage_is_bounded_by_envelope() {
        let mut rng = StdRng::seed_from_u64(9);
        let params = TorsadesParams::seeded(&mut rng);
        let r = 40.0;
        for i in 0..5000 {
            let v = params.voltage_px(i as f64 * 0.002, 210.0, r);
            assert!(v.is_finite());
            assert!(v.abs() <= 1.15 * r * 1.1, "voltage {v} out of range");
        }
    }
}
