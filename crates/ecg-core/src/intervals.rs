//! Interval measurements: the schedule guardrail, on-trace brackets and the
//! readout box text.

use crate::axis::AxisMode;
use crate::rhythm::{IntervalExpectation, RhythmPreset};
use crate::schedule::{Beat, BeatSchedule};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Hold the constant-flagged intervals of a regular rhythm at their mean.
///
/// Returns a new, re-sorted beat list plus an advisory when any spread
/// exceeded the preset tolerance. Rhythms without an expectation pass
/// through untouched.
pub fn stabilize(beats: &[Beat], preset: &RhythmPreset) -> (Vec<Beat>, Option<String>) {
    let mut out = beats.to_vec();
    let Some(expect) = preset.expectation else {
        return (out, None);
    };
    let conducted: Vec<usize> = (0..out.len()).filter(|&i| out[i].has_qrs).collect();
    if conducted.is_empty() {
        return (out, None);
    }

    let mut parts = Vec::new();
    if expect.constant_pr {
        normalize_field(&mut out, &conducted, &expect, "PR", &mut parts, |b| &mut b.pr_ms);
    }
    if expect.constant_qrs {
        normalize_field(&mut out, &conducted, &expect, "QRS", &mut parts, |b| &mut b.qrs_ms);
    }
    if expect.constant_rr && conducted.len() > 1 {
        let mut order = conducted.clone();
        order.sort_by(|&a, &b| out[a].r_time_ms.total_cmp(&out[b].r_time_ms));
        let diffs: Vec<f64> = order
            .windows(2)
            .map(|w| out[w[1]].r_time_ms - out[w[0]].r_time_ms)
            .filter(|d| d.is_finite())
            .collect();
        if let Some(range) = ValueRange::of(diffs.iter().copied()) {
            if range.spread() > expect.tolerance_ms {
                parts.push(format!("RR {:.0}-{:.0} ms", range.min, range.max));
            }
            let avg = mean(&diffs);
            let first = out[order[0]].r_time_ms;
            for (k, &i) in order.iter().enumerate() {
                out[i].r_time_ms = first + k as f64 * avg;
            }
        }
    }
    out.sort_by(|a, b| a.r_time_ms.total_cmp(&b.r_time_ms));

    if parts.is_empty() {
        return (out, None);
    }
    let message = format!(
        "{}: {} (stabilized)",
        preset.id.as_str().replace('_', " "),
        parts.join("; ")
    );
    log::warn!("[ecg] interval guardrail triggered: {message}");
    (out, Some(message))
}

fn normalize_field(
    beats: &mut [Beat],
    conducted: &[usize],
    expect: &IntervalExpectation,
    name: &str,
    parts: &mut Vec<String>,
    field: impl Fn(&mut Beat) -> &mut f64,
) {
    let values: Vec<f64> = conducted
        .iter()
        .map(|&i| *field(&mut beats[i]))
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    let Some(range) = ValueRange::of(values.iter().copied()) else {
        return;
    };
    if range.spread() > expect.tolerance_ms {
        parts.push(format!("{name} {:.0}-{:.0} ms", range.min, range.max));
    }
    let avg = mean(&values);
    for &i in conducted {
        let v = field(&mut beats[i]);
        if *v > 0.0 {
            *v = avg;
        }
    }
}

/// Measured intervals for one scheduled beat, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeatIntervals {
    pub pr_ms: Option<f64>,
    pub qrs_ms: f64,
    pub qt_ms: f64,
    pub rr_ms: Option<f64>,
}

/// Intervals of every ventricular beat. RR is measured to the next
/// ventricular beat, with the last one wrapping around the schedule period.
pub fn beat_intervals(schedule: &BeatSchedule) -> Vec<BeatIntervals> {
    let vent: Vec<&Beat> = schedule.ventricular_beats().collect();
    let n = vent.len();
    vent.iter()
        .enumerate()
        .map(|(i, b)| {
            let rr_ms = (n > 1).then(|| {
                let next = vent[(i + 1) % n];
                if i + 1 == n {
                    next.r_time_ms + schedule.rhythm_duration_ms - b.r_time_ms
                } else {
                    next.r_time_ms - b.r_time_ms
                }
            });
            BeatIntervals {
                pr_ms: (b.has_p && b.pr_ms > 0.0).then_some(b.pr_ms),
                qrs_ms: b.qrs_ms,
                qt_ms: b.qt_ms,
                rr_ms,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntervalHighlights {
    pub rr: bool,
    pub pr: bool,
    pub qrs: bool,
    pub qt: bool,
}

impl IntervalHighlights {
    pub fn any(&self) -> bool {
        self.rr || self.pr || self.qrs || self.qt
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntervalKind {
    Rr,
    Pr,
    Qrs,
    Qt,
}

impl IntervalKind {
    pub fn label(self) -> &'static str {
        match self {
            IntervalKind::Rr => "RR",
            IntervalKind::Pr => "PR",
            IntervalKind::Qrs => "QRS",
            IntervalKind::Qt => "QT",
        }
    }

    /// Vertical lane, top to bottom.
    pub fn lane(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntervalBracket {
    pub kind: IntervalKind,
    pub start_ms: f64,
    pub end_ms: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub value_ms: i64,
    pub text: String,
}

/// Brackets visible in the sweep window starting at `window_start_ms` and
/// drawn up to pixel `x_max`.
pub fn interval_brackets(
    schedule: &BeatSchedule,
    on: &IntervalHighlights,
    window_start_ms: f64,
    x_max: f64,
    ms_per_pixel: f64,
) -> Vec<IntervalBracket> {
    let mut out = Vec::new();
    let beats = &schedule.beats;
    let duration = schedule.rhythm_duration_ms;
    if !on.any() || beats.is_empty() || duration <= 0.0 || ms_per_pixel <= 0.0 {
        return out;
    }
    let window_end_ms = window_start_ms + x_max * ms_per_pixel;
    let mut labelled = [false; 4];

    let mut push = |kind: IntervalKind, start_ms: f64, end_ms: f64, value_ms: i64, out: &mut Vec<IntervalBracket>| {
        let x1 = (start_ms - window_start_ms) / ms_per_pixel;
        let x2 = (end_ms - window_start_ms) / ms_per_pixel;
        if x2 < 0.0 || x1 > x_max {
            return;
        }
        let x_start = x1.clamp(0.0, x_max);
        let x_end = x2.clamp(0.0, x_max);
        if x_end - x_start <= 1.0 {
            return;
        }
        let text = if labelled[kind.lane()] {
            format!("{value_ms} ms")
        } else {
            format!("{} {value_ms} ms", kind.label())
        };
        labelled[kind.lane()] = true;
        out.push(IntervalBracket {
            kind,
            start_ms,
            end_ms,
            x_start,
            x_end,
            value_ms,
            text,
        });
    };

    let n = beats.len();
    for (i, beat) in beats.iter().enumerate() {
        let next = &beats[(i + 1) % n];
        if !beat.has_qrs || !next.has_qrs {
            continue;
        }
        let last = i + 1 == n;
        let t0 = beat.r_time_ms;
        let t1 = next.r_time_ms;
        let rr = if last { t1 + duration - t0 } else { t1 - t0 };
        let rr_ms = rr.round().max(0.0) as i64;

        let k_start = ((window_start_ms - t0) / duration).floor() as i64 - 1;
        let k_end = ((window_end_ms - t0) / duration).floor() as i64 + 1;
        for k in k_start..=k_end {
            let r_occ = t0 + k as f64 * duration;
            let next_occ = if last { t1 + (k + 1) as f64 * duration } else { t1 + k as f64 * duration };
            let qrs_start = r_occ - beat.qrs_ms / 2.0;
            if on.rr {
                push(IntervalKind::Rr, r_occ, next_occ, rr_ms, &mut out);
            }
            if on.pr && beat.has_p && beat.pr_ms > 0.0 {
                push(IntervalKind::Pr, qrs_start - beat.pr_ms, qrs_start, beat.pr_ms.round() as i64, &mut out);
            }
            if on.qrs {
                push(IntervalKind::Qrs, qrs_start, qrs_start + beat.qrs_ms, beat.qrs_ms.round() as i64, &mut out);
            }
            if on.qt {
                push(IntervalKind::Qt, qrs_start, qrs_start + beat.qt_ms, beat.qt_ms.round() as i64, &mut out);
            }
        }
    }
    out
}

/// Text shown in the readout box.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadoutSummary {
    pub hr_text: String,
    pub axis_text: String,
    pub pr_text: String,
    pub qrs_text: String,
    pub qt_text: String,
    pub advisory: Option<String>,
}

impl ReadoutSummary {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.hr_text.clone(),
            self.axis_text.clone(),
            self.pr_text.clone(),
            self.qrs_text.clone(),
            self.qt_text.clone(),
        ];
        if let Some(a) = &self.advisory {
            lines.push(format!("\u{26a0} {a}"));
        }
        lines
    }
}

fn format_range(name: &str, range: Option<ValueRange>, fallback: Option<f64>) -> String {
    match (range, fallback) {
        (Some(r), _) if r.min.round() == r.max.round() => format!("{name} {:.0} ms", r.min),
        (Some(r), _) => format!("{name} {:.0}\u{2013}{:.0} ms", r.min, r.max),
        (None, Some(v)) => format!("{name} {v:.0} ms"),
        (None, None) => format!("{name} \u{2014}"),
    }
}

pub fn readout_summary(schedule: &BeatSchedule, preset: &RhythmPreset, axis: AxisMode) -> ReadoutSummary {
    let measured = beat_intervals(schedule);
    let pr_text = if preset.id.shows_pr() {
        let range = ValueRange::of(measured.iter().filter_map(|m| m.pr_ms));
        let fallback = (preset.intervals.pr_ms > 0.0).then_some(preset.intervals.pr_ms);
        format_range("PR", range, fallback)
    } else {
        "PR \u{2014}".to_string()
    };
    let qrs = ValueRange::of(measured.iter().map(|m| m.qrs_ms));
    let qt = ValueRange::of(measured.iter().map(|m| m.qt_ms));
    ReadoutSummary {
        hr_text: format!("HR {:.0} bpm", schedule.heart_rate_bpm.round()),
        axis_text: format!("Axis: {}", axis.label()),
        pr_text,
        qrs_text: format_range("QRS", qrs, Some(preset.intervals.qrs_ms)),
        qt_text: format_range("QT", qt, Some(preset.intervals.qt_ms)),
        advisory: schedule.advisory.clone(),
    }
}
