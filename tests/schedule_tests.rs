// Beat scheduling across the rhythm table.

use ecg_core::intervals::stabilize;
use ecg_core::{build_schedule, Beat, BeatSchedule, RhythmId};

const WINDOW_MS: f64 = 10_000.0;

fn build(id: RhythmId, bpm: f64, seed: u64) -> BeatSchedule {
    build_schedule(id.preset(), bpm, WINDOW_MS, seed)
}

fn ventricular_rr(s: &BeatSchedule) -> Vec<f64> {
    let r: Vec<f64> = s.ventricular_beats().map(|b| b.r_time_ms).collect();
    r.windows(2).map(|w| w[1] - w[0]).collect()
}

#[test]
fn same_seed_gives_identical_schedules() {
    for id in RhythmId::ALL {
        let bpm = id.preset().default_hr;
        let a = build(id, bpm, 0xC0FFEE);
        let b = build(id, bpm, 0xC0FFEE);
        assert_eq!(a, b, "{id} is not deterministic");
    }
}

#[test]
fn different_seeds_change_stochastic_rhythms() {
    let a = build(RhythmId::AtrialFibrillation, 110.0, 1);
    let b = build(RhythmId::AtrialFibrillation, 110.0, 2);
    assert_ne!(a.beats, b.beats, "afib should depend on the seed");
}

#[test]
fn sinus_at_75_bpm_has_800_ms_rr() {
    let s = build(RhythmId::Sinus, 75.0, 7);
    let rr = ventricular_rr(&s);
    assert!(rr.len() >= 11, "expected a full window of beats, got {}", rr.len());
    for (i, d) in rr.iter().enumerate() {
        assert!((d - 800.0).abs() < 1e-6, "RR #{i} = {d}");
    }
    assert!(s.beats.iter().all(|b| b.has_p && b.has_qrs && b.has_t));
    assert!(s.advisory.is_none());
}

#[test]
fn mobitz_two_keeps_pr_constant_and_spaces_drops() {
    // 60 bpm over a minute: at least 50 P waves per schedule.
    let mut run_lengths = std::collections::BTreeSet::new();
    for seed in 0..40 {
        let s = build_schedule(RhythmId::MobitzII.preset(), 60.0, 60_000.0, seed);
        assert!(s.beats.len() >= 50, "seed {seed}: only {} beats", s.beats.len());
        let first: &[Beat] = &s.beats[..50];

        let prs: Vec<f64> = first.iter().filter(|b| b.has_qrs).map(|b| b.pr_ms).collect();
        assert!(prs.windows(2).all(|w| w[0] == w[1]), "seed {seed}: PR varies {prs:?}");
        assert!(first.iter().all(|b| b.has_p), "every Mobitz II cycle has a P");
        assert!(
            first.windows(2).all(|w| w[0].has_qrs || w[1].has_qrs),
            "seed {seed}: two dropped beats in a row"
        );

        let drops: Vec<usize> = first
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.has_qrs)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(drops.first(), Some(&3), "seed {seed}: first drop should be the fourth P");
        for w in drops.windows(2) {
            let conducted = w[1] - w[0] - 1;
            assert!(conducted >= 2, "seed {seed}: drops at {} and {} too close", w[0], w[1]);
            run_lengths.insert(conducted);
        }
    }
    assert!(run_lengths.contains(&2), "3:2 conduction never seen: {run_lengths:?}");
    assert!(run_lengths.contains(&3), "4:3 conduction never seen: {run_lengths:?}");
    assert!(
        run_lengths.iter().any(|&n| n >= 4),
        "longer conducted runs never seen: {run_lengths:?}"
    );
}

#[test]
fn afib_is_irregular_without_p_waves() {
    let s = build_schedule(RhythmId::AtrialFibrillation.preset(), 110.0, 60_000.0, 99);
    assert!(s.beats.iter().all(|b| !b.has_p), "afib beats must not carry P waves");
    assert!(s.fibrillation.is_some());
    let rr = ventricular_rr(&s);
    let mean = rr.iter().sum::<f64>() / rr.len() as f64;
    let var = rr.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / rr.len() as f64;
    let cv = var.sqrt() / mean;
    assert!(cv > 0.1, "RR coefficient of variation too small: {cv:.3}");
    assert!(rr.iter().all(|d| (350.0..=1800.0).contains(d)), "RR outside clamp");
}

#[test]
fn complete_block_has_two_independent_families() {
    let s = build(RhythmId::CompleteHeartBlock, 40.0, 3);
    let atrial: Vec<f64> = s.beats.iter().filter(|b| !b.has_qrs).map(|b| b.r_time_ms).collect();
    let vent: Vec<&Beat> = s.ventricular_beats().collect();

    assert!(atrial.len() >= 2 && vent.len() >= 2);
    for w in atrial.windows(2) {
        assert!((w[1] - w[0] - 750.0).abs() < 1e-6, "atrial RR {}", w[1] - w[0]);
    }
    for rr in ventricular_rr(&s) {
        assert!((rr - 1500.0).abs() < 1e-6, "ventricular RR {rr}");
    }
    assert!(vent.iter().all(|b| !b.has_p && b.qrs_ms >= 160.0 && b.qt_ms >= 420.0));
    assert!(s.beats.iter().filter(|b| !b.has_qrs).all(|b| b.has_p && !b.has_t));
}

#[test]
fn monomorphic_vt_is_wide_and_regular() {
    let s = build(RhythmId::MonomorphicVt, 200.0, 5);
    assert!(s.beats.iter().all(|b| !b.has_p && b.qrs_ms >= 160.0 && b.qt_ms >= 440.0));
    for rr in ventricular_rr(&s) {
        assert!((rr - 300.0).abs() < 1e-6, "RR {rr}");
    }
}

#[test]
fn polymorphic_vt_is_a_continuous_model() {
    let s = build(RhythmId::PolymorphicVt, 210.0, 5);
    assert!(s.beats.is_empty());
    assert!(s.torsades.is_some());
    assert!(s.fibrillation.is_none());
}

#[test]
fn heart_rate_is_clamped_to_the_preset() {
    let s = build(RhythmId::CompleteHeartBlock, 120.0, 1);
    assert_eq!(s.heart_rate_bpm, 50.0);
    let s = build(RhythmId::Sinus, f64::NAN, 1);
    assert_eq!(s.heart_rate_bpm, 75.0, "NaN falls back to the preset default");
}

fn jittered_sinus(jitter_ms: f64) -> Vec<Beat> {
    let iv = RhythmId::Sinus.preset().intervals;
    (0..12)
        .map(|i| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            Beat {
                pr_ms: iv.pr_ms + sign * jitter_ms,
                ..Beat::conducted(205.0 + i as f64 * 800.0 + sign * jitter_ms, &iv)
            }
        })
        .collect()
}

#[test]
fn guardrail_normalizes_small_jitter_silently() {
    let (beats, advisory) = stabilize(&jittered_sinus(1.0), RhythmId::Sinus.preset());
    assert!(advisory.is_none(), "±1 ms is within tolerance: {advisory:?}");
    let pr0 = beats[0].pr_ms;
    assert!(beats.iter().all(|b| (b.pr_ms - pr0).abs() < 1e-9), "PR not normalized");
    let rr: Vec<f64> = beats.windows(2).map(|w| w[1].r_time_ms - w[0].r_time_ms).collect();
    assert!(rr.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9), "RR not respaced: {rr:?}");
}

#[test]
fn guardrail_reports_large_jitter() {
    let (beats, advisory) = stabilize(&jittered_sinus(10.0), RhythmId::Sinus.preset());
    let Some(message) = advisory else {
        panic!("±10 ms should trigger the advisory");
    };
    assert!(message.starts_with("sinus: "), "{message}");
    assert!(message.contains("PR") && message.contains("RR"), "{message}");
    assert!(message.ends_with("(stabilized)"), "{message}");
    let pr0 = beats[0].pr_ms;
    assert!(beats.iter().all(|b| (b.pr_ms - pr0).abs() < 1e-9));
}

#[test]
fn guardrail_leaves_irregular_rhythms_alone() {
    let beats = jittered_sinus(30.0);
    let (out, advisory) = stabilize(&beats, RhythmId::MobitzI.preset());
    assert_eq!(out, beats);
    assert!(advisory.is_none());
}
