//! Fibrillatory baseline for atrial fibrillation.

use std::f64::consts::PI;

use rand::Rng;
use smallvec::SmallVec;

const COMPONENTS: usize = 8;
const BASE_AMPLITUDE_MV: f64 = 0.14;
const DRIFT_HZ: f64 = 0.25;
const QRS_BLANK_SIGMA_MS: f64 = 25.0;
const T_BLANK_SIGMA_MS: f64 = 70.0;
const T_BLANK_DEPTH: f64 = 0.55;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FibrillatoryComponent {
    pub freq_hz: f64,
    pub phase: f64,
    pub weight: f64,
}

/// Sum of a handful of low-frequency sinusoids with a slow amplitude drift.
#[derive(Clone, Debug, PartialEq)]
pub struct FibrillatoryWave {
    pub components: SmallVec<[FibrillatoryComponent; COMPONENTS]>,
    pub drift_phase: f64,
}

impl FibrillatoryWave {
    pub fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let components = (0..COMPONENTS)
            .map(|_| FibrillatoryComponent {
                freq_hz: 4.0 + 6.0 * rng.gen::<f64>(),
                phase: rng.gen::<f64>() * 2.0 * PI,
                weight: 0.4 + 0.9 * rng.gen::<f64>(),
            })
            .collect();
        Self {
            components,
            drift_phase: rng.gen::<f64>() * 2.0 * PI,
        }
    }

    /// Baseline value in pixels at `time_ms` (unblanked).
    pub fn value_px(&self, time_ms: f64, mv_to_px: f64) -> f64 {
        let t = time_ms / 1000.0;
        let mut sum = 0.0;
        let mut weights = 0.0;
        for c in &self.components {
            sum += c.weight * (2.0 * PI * c.freq_hz * t + c.phase).sin();
            weights += c.weight;
        }
        if weights > 0.0 {
            sum /= weights;
        }
        let drift = 0.75 + 0.25 * (2.0 * PI * DRIFT_HZ * t + self.drift_phase).sin();
        let rough = 0.25 * (2.0 * PI * 16.0 * t + 1.3).sin() + 0.2 * (2.0 * PI * 22.0 * t + 2.1).sin();
        BASE_AMPLITUDE_MV * mv_to_px * drift * (0.85 * sum + 0.15 * rough)
    }
}

/// Attenuation near a QRS: 0 at the R peak, 1 far from it.
pub fn qrs_blanking(dt_ms: f64) -> f64 {
    if !dt_ms.is_finite() {
        return 1.0;
    }
    let z = dt_ms / QRS_BLANK_SIGMA_MS;
    1.0 - (-0.5 * z * z).exp()
}

/// Partial attenuation near a T-wave centre.
pub fn t_blanking(dt_ms: f64) -> f64 {
    if !dt_ms.is_finite() {
        return 1.0;
    }
    let z = dt_ms / T_BLANK_SIGMA_MS;
    1.0 - T_BLANK_DEPTH * (-0.5 * z * z).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn seeded_components_are_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let wave = FibrillatoryWave::seeded(&mut rng);
        assert_eq!(wave.components.len(), COMPONENTS);
        for c in &wave.components {
            assert!((4.0..=10.0).contains(&c.freq_hz));
            assert!((0.4..=1.3).contains(&c.weight));
        }
    }

    #[test]
    fn blanking_is_zero_at_r_and_one_far_away() {
        assert_eq!(qrs_blanking(0.0), 0.0);
        assert!(qrs_blanking(500.0) > 0.999);
        assert!((t_blanking(0.0) - 0.45).abs() < 1e-12);
        assert_eq!(qrs_blanking(f64::INFINITY), 1.0);
    }
}
