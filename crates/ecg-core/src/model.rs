//! Pure voltage synthesis over a beat schedule.

use crate::axis::AxisState;
use crate::constants::*;
use crate::fibrillation::{qrs_blanking, t_blanking};
use crate::lead::{self, LeadId};
use crate::rhythm::RhythmId;
use crate::sample::LeadSample;
use crate::schedule::BeatSchedule;
use crate::stemi::st_shape;
use crate::waveform::{lead_skew_ms, p_wave, qrs_parts, t_wave, Amplitudes, QrsParts, WaveType};

/// Borrowed view of everything needed to evaluate a lead at a time.
#[derive(Clone, Copy, Debug)]
pub struct VoltageModel<'a> {
    pub schedule: &'a BeatSchedule,
    pub amps: Amplitudes,
    pub axis: AxisState,
    pub st_elevation_mv: f64,
}

impl<'a> VoltageModel<'a> {
    /// Wave components for `lead` at `time_ms`, before projection.
    pub fn components(&self, time_ms: f64, lead: LeadId) -> LeadSample {
        let schedule = self.schedule;
        if let Some(torsades) = &schedule.torsades {
            let total = torsades.voltage_px(time_ms / 1000.0, schedule.heart_rate_bpm, self.amps.r);
            return LeadSample {
                qrs: QrsParts::split(total),
                ..LeadSample::default()
            };
        }

        let time = schedule.wrap_time(time_ms);
        let is_afib = schedule.rhythm == RhythmId::AtrialFibrillation;
        let skew = lead_skew_ms(lead.key());
        let st_weight = schedule.rhythm.territory().map_or(0.0, |t| t.lead_weight(lead));
        let elevation_lead = st_weight > 0.0;
        let t_scale = if is_afib { AFIB_T_SCALE } else { 1.0 };

        let mut out = LeadSample::default();
        let mut nearest_dt_r = f64::INFINITY;
        let mut nearest_dt_t = f64::INFINITY;
        let mut nearest_st = f64::INFINITY;

        for beat in &schedule.beats {
            if !beat.has_p && !beat.has_qrs {
                continue;
            }
            if !is_afib && beat.has_p {
                out.p += p_wave(time, beat.p_center_ms(), P_WIDTH_MS, &self.amps);
            }
            if !beat.has_qrs {
                continue;
            }

            let dt = time - beat.r_time_ms;
            if dt.abs() < nearest_dt_r.abs() {
                nearest_dt_r = dt;
            }
            let mut parts = qrs_parts(time, beat.r_time_ms, beat.qrs_ms, skew, &self.amps)
                .scaled(beat.qrs_scale * beat.polarity);
            if elevation_lead {
                parts.s *= STEMI_S_BLUNTING;
            }
            out.qrs = out.qrs + parts;

            let t_center = beat.t_center_ms(schedule.t_duration_ms);
            if beat.has_t {
                if !elevation_lead {
                    out.t += t_scale * t_wave(time, t_center, T_WIDTH_MS, &self.amps);
                }
                let dt_t = time - t_center;
                if dt_t.abs() < nearest_dt_t.abs() {
                    nearest_dt_t = dt_t;
                }
            }

            if st_weight != 0.0 {
                let start = beat.qrs_end_ms();
                let end = beat.t_end_ms();
                if end > start && time >= start && time <= end {
                    let dist = (time - (start + end) / 2.0).abs();
                    if dist < nearest_st {
                        let u = (time - start) / (end - start);
                        out.st = self.st_elevation_mv * self.amps.mv_to_px * st_weight * st_shape(u);
                        nearest_st = dist;
                    }
                }
            }
        }

        if let Some(fib) = &schedule.fibrillation {
            out.baseline =
                fib.value_px(time_ms, self.amps.mv_to_px) * qrs_blanking(nearest_dt_r) * t_blanking(nearest_dt_t);
        }
        out
    }

    pub fn lead_voltage(&self, time_ms: f64, lead: LeadId) -> f64 {
        lead::project(&self.components(time_ms, lead), lead, &self.axis)
    }

    /// Which wave a sample at `time_ms` belongs to, by nearest wave centre.
    pub fn wave_type(&self, time_ms: f64) -> WaveType {
        let schedule = self.schedule;
        if schedule.torsades.is_some() {
            return WaveType::Qrs;
        }
        let time = schedule.wrap_time(time_ms);
        let is_afib = schedule.rhythm == RhythmId::AtrialFibrillation;
        let mut best = WaveType::Baseline;
        let mut best_dist = f64::INFINITY;
        let mut consider = |wave: WaveType, center: f64, window: f64| {
            let dist = (time - center).abs();
            if dist < window && dist < best_dist {
                best = wave;
                best_dist = dist;
            }
        };

        for beat in &schedule.beats {
            if beat.has_p && !is_afib {
                consider(WaveType::P, beat.p_center_ms(), P_CLASSIFY_WINDOW_MS);
            }
            if beat.has_qrs {
                consider(WaveType::Qrs, beat.r_time_ms, beat.qrs_ms);
                if beat.has_t {
                    let (start, end) = beat.t_window(schedule.t_duration_ms);
                    consider(WaveType::T, (start + end) / 2.0, T_CLASSIFY_MIN_WINDOW_MS.max(end - start));
                }
            }
        }
        best
    }
}
