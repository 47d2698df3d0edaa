//! Waveform primitives: bump shapes, the P/QRS/T generators and the
//! per-lead timing skew.

use std::f64::consts::PI;
use std::ops::Add;

use crate::constants::*;
use crate::seed::hash_key;

/// Pixel amplitudes derived from the millivolt constants for one paper
/// calibration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Amplitudes {
    pub mv_to_px: f64,
    pub p: f64,
    pub q: f64,
    pub r: f64,
    pub s: f64,
    pub t: f64,
}

impl Amplitudes {
    pub fn for_pixels_per_mm(pixels_per_mm: f64) -> Self {
        let mv_to_px = MM_PER_MV * pixels_per_mm;
        Self {
            mv_to_px,
            p: AMP_P_MV * mv_to_px,
            q: AMP_Q_MV * mv_to_px,
            r: AMP_R_MV * mv_to_px,
            s: AMP_S_MV * mv_to_px,
            t: AMP_T_MV * mv_to_px,
        }
    }
}

/// Classification of a trace sample, used for colouring and highlights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum WaveType {
    #[default]
    Baseline,
    P,
    Qrs,
    T,
}

/// Half-period sine on `[start, start + duration]`, zero elsewhere.
#[inline]
pub fn sine_lobe(t: f64, start: f64, duration: f64, amp: f64) -> f64 {
    if duration <= 0.0 || t < start || t > start + duration {
        return 0.0;
    }
    amp * (PI * (t - start) / duration).sin()
}

/// Gaussian bump. A zero sigma is treated as 1.
#[inline]
pub fn gaussian(t: f64, center: f64, sigma: f64, amp: f64) -> f64 {
    let s = if sigma == 0.0 { 1.0 } else { sigma };
    let z = (t - center) / s;
    amp * (-0.5 * z * z).exp()
}

#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let u = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    u * u * (3.0 - 2.0 * u)
}

pub fn p_wave(t: f64, center: f64, width: f64, amps: &Amplitudes) -> f64 {
    if (t - center).abs() > P_SUPPORT_MS {
        return 0.0;
    }
    gaussian(t, center, width / P_SIGMA_DIVISOR, amps.p)
}

pub fn t_wave(t: f64, center: f64, width: f64, amps: &Amplitudes) -> f64 {
    if (t - center).abs() > T_SUPPORT_MS {
        return 0.0;
    }
    gaussian(t, center, width / T_SIGMA_DIVISOR, amps.t)
}

/// The three deflections of a ventricular complex, kept apart so leads can
/// weight them independently.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QrsParts {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl QrsParts {
    pub fn sum(&self) -> f64 {
        self.q + self.r + self.s
    }

    pub fn scaled(self, k: f64) -> Self {
        Self {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }

    /// Split a single QRS value into fixed q/r/s shares.
    pub fn split(total: f64) -> Self {
        Self {
            q: total * 0.22,
            r: total * 0.56,
            s: total * 0.22,
        }
    }
}

impl Add for QrsParts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

/// Q, R and S bumps around the R peak at `center`. `skew_ms` shifts Q
/// forward and S back so each lead gets a slightly different notch.
pub fn qrs_parts(t: f64, center: f64, width: f64, skew_ms: f64, amps: &Amplitudes) -> QrsParts {
    if (t - center).abs() > QRS_SUPPORT_WIDTHS * width {
        return QrsParts::default();
    }
    let sigma = width / QRS_SIGMA_DIVISOR;
    let offset = width * QS_OFFSET_FRACTION;
    QrsParts {
        q: gaussian(t, center - offset + skew_ms, sigma, amps.q),
        r: gaussian(t, center, sigma, amps.r),
        s: gaussian(t, center + offset - S_SKEW_FACTOR * skew_ms, sigma, amps.s),
    }
}

/// Deterministic timing skew for a lead key, in `{-1.8, -1.2, .., 1.8}` ms.
pub fn lead_skew_ms(lead_key: &str) -> f64 {
    let h = hash_key(&format!("{lead_key}_skew"));
    ((h % 7) as f64 - 3.0) * 0.6
}

/// Low-amplitude hash noise in `[0, 1)`.
#[inline]
pub fn hash01(x: f64) -> f64 {
    let s = (x * 127.1 + 311.7).sin() * 43_758.545_312_3;
    s - s.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_lobe_is_hard_clipped() {
        assert_eq!(sine_lobe(-1.0, 0.0, 100.0, 5.0), 0.0);
        assert_eq!(sine_lobe(101.0, 0.0, 100.0, 5.0), 0.0);
        assert!((sine_lobe(50.0, 0.0, 100.0, 5.0) - 5.0).abs() < 1e-12);
        assert_eq!(sine_lobe(10.0, 0.0, 0.0, 5.0), 0.0);
    }

    #[test]
    fn gaussian_peaks_at_center_and_handles_zero_sigma() {
        assert_eq!(gaussian(10.0, 10.0, 3.0, 2.0), 2.0);
        assert!(gaussian(11.0, 10.0, 0.0, 1.0) < 1.0);
    }

    #[test]
    fn waves_vanish_outside_support() {
        let amps = Amplitudes::for_pixels_per_mm(4.0);
        assert_eq!(p_wave(500.0, 0.0, 80.0, &amps), 0.0);
        assert_eq!(t_wave(-500.0, 0.0, 120.0, &amps), 0.0);
        assert_eq!(qrs_parts(1000.0, 0.0, 90.0, 0.0, &amps).sum(), 0.0);
    }

    #[test]
    fn skew_is_deterministic_and_bounded() {
        for key in ["I", "II", "III", "AVR", "AVL", "AVF", "V1", "V6"] {
            let a = lead_skew_ms(key);
            assert_eq!(a, lead_skew_ms(key));
            assert!(a.abs() <= 1.8 + 1e-12, "skew {a} for {key}");
        }
    }
}
