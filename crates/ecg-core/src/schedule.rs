//! Beat scheduling: turns a preset, a heart rate and a seed into an ordered
//! list of beats covering the display window.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::constants::*;
use crate::fibrillation::FibrillatoryWave;
use crate::intervals;
use crate::rhythm::{Intervals, RhythmId, RhythmPreset};
use crate::torsades::TorsadesParams;

/// One scheduled cardiac cycle. Atrial-only entries (`has_qrs == false`)
/// carry a P wave and nothing else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beat {
    pub r_time_ms: f64,
    pub has_p: bool,
    pub has_qrs: bool,
    pub has_t: bool,
    pub pr_ms: f64,
    pub qrs_ms: f64,
    pub qt_ms: f64,
    pub qrs_scale: f64,
    pub polarity: f64,
}

impl Beat {
    pub fn conducted(r_time_ms: f64, base: &Intervals) -> Self {
        Self {
            r_time_ms,
            has_p: true,
            has_qrs: true,
            has_t: true,
            pr_ms: base.pr_ms,
            qrs_ms: base.qrs_ms,
            qt_ms: base.qt_ms,
            qrs_scale: 1.0,
            polarity: 1.0,
        }
    }

    pub fn p_center_ms(&self) -> f64 {
        self.r_time_ms - self.pr_ms + P_CENTER_OFFSET_MS
    }

    pub fn qrs_onset_ms(&self) -> f64 {
        self.r_time_ms - self.qrs_ms / 2.0
    }

    pub fn qrs_end_ms(&self) -> f64 {
        self.qrs_onset_ms() + self.qrs_ms
    }

    pub fn t_end_ms(&self) -> f64 {
        self.qrs_onset_ms() + self.qt_ms
    }

    /// Start and end of the T wave given the preset's T duration.
    pub fn t_window(&self, t_duration_ms: f64) -> (f64, f64) {
        let end = self.t_end_ms();
        let start = (self.r_time_ms + self.qrs_ms / 2.0 + MIN_ST_SEGMENT_MS).max(end - t_duration_ms);
        (start, end)
    }

    pub fn t_center_ms(&self, t_duration_ms: f64) -> f64 {
        let (start, end) = self.t_window(t_duration_ms);
        (start + end) / 2.0
    }

    /// Conducted beats have both a P wave and a QRS.
    pub fn is_conducted(&self) -> bool {
        self.has_p && self.has_qrs
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BeatSchedule {
    pub rhythm: RhythmId,
    pub heart_rate_bpm: f64,
    pub beats: Vec<Beat>,
    pub window_ms: f64,
    pub rhythm_duration_ms: f64,
    pub base_rr_ms: f64,
    pub t_duration_ms: f64,
    pub seed: u64,
    pub fibrillation: Option<FibrillatoryWave>,
    pub torsades: Option<TorsadesParams>,
    pub advisory: Option<String>,
}

impl BeatSchedule {
    /// Wrap an absolute time into the schedule's period.
    pub fn wrap_time(&self, time_ms: f64) -> f64 {
        if self.rhythm_duration_ms > 0.0 && time_ms.is_finite() {
            time_ms.rem_euclid(self.rhythm_duration_ms)
        } else {
            time_ms
        }
    }

    pub fn ventricular_beats(&self) -> impl Iterator<Item = &Beat> {
        self.beats.iter().filter(|b| b.has_qrs)
    }
}

/// Build the schedule for `preset`. Pure: identical inputs give identical
/// schedules.
pub fn build_schedule(preset: &RhythmPreset, heart_rate_bpm: f64, window_ms: f64, seed: u64) -> BeatSchedule {
    let bpm = preset.clamp_heart_rate(heart_rate_bpm).unwrap_or(preset.default_hr);
    let base_rr = 60_000.0 / bpm.max(MIN_RATE_BPM);
    let window = if window_ms.is_finite() && window_ms > 0.0 { window_ms } else { DEFAULT_WINDOW_MS };
    let iv = &preset.intervals;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut beats = Vec::new();
    let mut fibrillation = None;
    let mut torsades = None;

    match preset.id {
        RhythmId::Sinus | RhythmId::StemiInferior | RhythmId::StemiAnterior | RhythmId::StemiLateral => {
            sinus_beats(&mut beats, iv, base_rr, window)
        }
        RhythmId::FirstDegreeBlock => first_degree_beats(&mut beats, iv, base_rr, window),
        RhythmId::MobitzI => mobitz_one_beats(&mut beats, iv, base_rr, window),
        RhythmId::MobitzII => {
            mobitz_two_beats(&mut beats, iv, base_rr, window, &mut rng);
            mobitz_two_self_check(&beats);
        }
        RhythmId::CompleteHeartBlock => complete_block_beats(&mut beats, iv, bpm, window),
        RhythmId::AtrialFibrillation => {
            fibrillation = Some(FibrillatoryWave::seeded(&mut rng));
            afib_beats(&mut beats, iv, bpm, window, &mut rng);
        }
        RhythmId::MonomorphicVt => ventricular_tachycardia_beats(&mut beats, iv, bpm, window),
        RhythmId::PolymorphicVt => {
            torsades = Some(TorsadesParams::seeded(&mut rng));
        }
    }

    if beats.is_empty() && preset.id != RhythmId::PolymorphicVt {
        log::warn!("[ecg] {} schedule was empty; falling back to sinus beats", preset.id);
        sinus_beats(&mut beats, iv, base_rr, window);
    }
    beats.sort_by(|a, b| a.r_time_ms.total_cmp(&b.r_time_ms));
    if preset.id == RhythmId::AtrialFibrillation {
        for beat in &mut beats {
            beat.has_p = false;
            beat.pr_ms = 0.0;
        }
    }

    let (beats, advisory) = intervals::stabilize(&beats, preset);
    let rhythm_duration_ms = beats
        .last()
        .map_or(window, |last| window.max(last.r_time_ms + base_rr));

    BeatSchedule {
        rhythm: preset.id,
        heart_rate_bpm: bpm,
        beats,
        window_ms: window,
        rhythm_duration_ms,
        base_rr_ms: base_rr,
        t_duration_ms: iv.t_duration_ms,
        seed,
        fibrillation,
        torsades,
        advisory,
    }
}

fn sinus_beats(out: &mut Vec<Beat>, iv: &Intervals, base_rr: f64, window: f64) {
    let mut cycle = 0.0;
    while cycle < window {
        out.push(Beat::conducted(cycle + iv.pr_ms + iv.qrs_ms / 2.0, iv));
        cycle += base_rr;
    }
}

fn first_degree_beats(out: &mut Vec<Beat>, iv: &Intervals, base_rr: f64, window: f64) {
    let pr = iv.pr_ms.max(FIRST_DEGREE_MIN_PR_MS);
    let mut cycle = 0.0;
    while cycle < window {
        out.push(Beat {
            pr_ms: pr,
            ..Beat::conducted(cycle + pr + iv.qrs_ms / 2.0, iv)
        });
        cycle += base_rr;
    }
}

// Wenckebach: PR lengthens across the cycle until one P fails to conduct.
fn mobitz_one_beats(out: &mut Vec<Beat>, iv: &Intervals, base_rr: f64, window: f64) {
    let cycle_len = MOBITZ_I_PR_STEPS_MS.len() + 1;
    let mut cycle = 0.0;
    let mut idx = 0usize;
    while cycle < window {
        let step = idx % cycle_len;
        let conducted = step < MOBITZ_I_PR_STEPS_MS.len();
        let pr = MOBITZ_I_PR_STEPS_MS[step.min(MOBITZ_I_PR_STEPS_MS.len() - 1)];
        out.push(Beat {
            pr_ms: pr,
            has_qrs: conducted,
            has_t: conducted,
            ..Beat::conducted(cycle + pr + iv.qrs_ms / 2.0, iv)
        });
        cycle += base_rr;
        idx += 1;
    }
}

fn mobitz_two_beats<R: Rng + ?Sized>(out: &mut Vec<Beat>, iv: &Intervals, base_rr: f64, window: f64, rng: &mut R) {
    let pr = iv.pr_ms.max(MOBITZ_II_MIN_PR_MS);
    let mut next_drop = MOBITZ_II_FIRST_DROP;
    let mut cycle = 0.0;
    let mut idx = 0usize;
    while cycle < window {
        let dropped = idx == next_drop;
        out.push(Beat {
            pr_ms: pr,
            has_qrs: !dropped,
            has_t: !dropped,
            ..Beat::conducted(cycle + pr + iv.qrs_ms / 2.0, iv)
        });
        if dropped {
            // mostly 4:3, sometimes 3:2, rarely 5:4
            let base = if rng.gen::<f64>() < 0.7 { 4 } else { 3 };
            let extra = usize::from(rng.gen::<f64>() < 0.15);
            next_drop += (base + extra).max(MOBITZ_II_MIN_DROP_SPACING);
        }
        cycle += base_rr;
        idx += 1;
    }
}

fn mobitz_two_self_check(beats: &[Beat]) {
    if log::log_enabled!(log::Level::Debug) {
        for (i, b) in beats.iter().take(12).enumerate() {
            log::debug!(
                "[ecg][mobitz2] #{i} P@{:.0}ms QRS={} PR={}",
                b.p_center_ms(),
                if b.has_qrs { "on" } else { "off" },
                if b.has_qrs { format!("{:.0}ms", b.pr_ms) } else { "(dropped)".to_string() }
            );
        }
    }

    let mut prs: Vec<i64> = beats.iter().filter(|b| b.has_qrs).map(|b| b.pr_ms.round() as i64).collect();
    prs.sort_unstable();
    prs.dedup();
    if prs.len() > 1 {
        log::warn!("[ecg][mobitz2] PR should be constant on conducted beats: {prs:?}");
    }

    let pattern: Vec<bool> = beats.iter().take(12).map(|b| b.has_qrs).collect();
    let alternating = pattern.len() > 1 && pattern.windows(2).all(|w| w[0] != w[1]);
    if alternating {
        log::warn!("[ecg][mobitz2] pattern looks like strict 2:1 block");
    }
}

// Atria and ventricles beat independently. Ventricular escape entries carry
// no P; atrial entries carry only a P.
fn complete_block_beats(out: &mut Vec<Beat>, iv: &Intervals, bpm: f64, window: f64) {
    let vent_rr = 60_000.0 / bpm.clamp(AVB3_VENT_RATE_MIN_BPM, AVB3_VENT_RATE_MAX_BPM);
    let mut t = 0.0;
    while t < window {
        out.push(Beat {
            has_p: false,
            pr_ms: 0.0,
            qrs_ms: iv.qrs_ms.max(AVB3_MIN_QRS_MS),
            qt_ms: iv.qt_ms.max(AVB3_MIN_QT_MS),
            ..Beat::conducted(t, iv)
        });
        t += vent_rr;
    }

    let atrial_rr = 60_000.0 / AVB3_ATRIAL_RATE_BPM;
    let mut t = 0.0;
    while t < window {
        out.push(Beat {
            has_qrs: false,
            has_t: false,
            pr_ms: AVB3_ATRIAL_PR_MS,
            ..Beat::conducted(t + AVB3_ATRIAL_PR_MS, iv)
        });
        t += atrial_rr;
    }
}

fn afib_beats<R: Rng + ?Sized>(out: &mut Vec<Beat>, iv: &Intervals, bpm: f64, window: f64, rng: &mut R) {
    let mean_rr = 60_000.0 / bpm.max(AFIB_MIN_RATE_BPM);
    let mut t = 0.0;
    while t < window {
        let z: f64 = rng.sample(StandardNormal);
        let rr = (mean_rr * (AFIB_RR_JITTER_SIGMA * z).exp()).clamp(AFIB_MIN_RR_MS, AFIB_MAX_RR_MS);
        out.push(Beat {
            has_p: false,
            pr_ms: 0.0,
            ..Beat::conducted(t + iv.qrs_ms / 2.0, iv)
        });
        t += rr;
    }
}

fn ventricular_tachycardia_beats(out: &mut Vec<Beat>, iv: &Intervals, bpm: f64, window: f64) {
    let rr = 60_000.0 / bpm.max(VT_MIN_RATE_BPM);
    let mut t = 0.0;
    while t < window {
        out.push(Beat {
            has_p: false,
            pr_ms: 0.0,
            qrs_ms: VT_QRS_MS,
            qt_ms: iv.qt_ms.max(VT_MIN_QT_MS),
            ..Beat::conducted(t, iv)
        });
        t += rr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(id: RhythmId, bpm: f64) -> BeatSchedule {
        build_schedule(id.preset(), bpm, 10_000.0, 1234)
    }

    #[test]
    fn beats_are_sorted_for_every_preset() {
        for id in RhythmId::ALL {
            let s = build(id, id.preset().default_hr);
            assert!(
                s.beats.windows(2).all(|w| w[0].r_time_ms <= w[1].r_time_ms),
                "{id} schedule is not sorted"
            );
        }
    }

    #[test]
    fn torsades_has_no_beats_but_carries_parameters() {
        let s = build(RhythmId::PolymorphicVt, 210.0);
        assert!(s.beats.is_empty());
        assert!(s.torsades.is_some());
        assert_eq!(s.rhythm_duration_ms, 10_000.0);
    }

    #[test]
    fn first_degree_pr_is_prolonged() {
        let s = build(RhythmId::FirstDegreeBlock, 70.0);
        assert!(s.beats.iter().all(|b| b.pr_ms >= FIRST_DEGREE_MIN_PR_MS));
    }

    #[test]
    fn mobitz_one_drops_every_fourth_p() {
        let s = build(RhythmId::MobitzI, 65.0);
        for (i, b) in s.beats.iter().enumerate() {
            assert_eq!(b.has_qrs, i % 4 != 3, "beat {i}");
            assert!(b.has_p);
        }
        assert_eq!(s.beats[0].pr_ms, 200.0);
        assert_eq!(s.beats[1].pr_ms, 260.0);
        assert_eq!(s.beats[2].pr_ms, 320.0);
    }

    #[test]
    fn rhythm_duration_covers_last_beat() {
        for id in RhythmId::ALL {
            let s = build(id, id.preset().default_hr);
            if let Some(last) = s.beats.last() {
                assert!(s.rhythm_duration_ms >= last.r_time_ms + s.base_rr_ms - 1e-9);
            }
            assert!(s.rhythm_duration_ms >= s.window_ms);
        }
    }
}
