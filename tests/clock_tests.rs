// Sweep clock: looping windows and single-run playback.

use std::cell::Cell;
use std::rc::Rc;

use ecg_core::{SimulationClock, SweepGeometry};

fn geometry() -> SweepGeometry {
    // 400 px at 25 mm/s and 4 px/mm is a 4 s window.
    match SweepGeometry::new(400.0, 25.0, 4.0) {
        Some(g) => g,
        None => panic!("valid geometry rejected"),
    }
}

#[test]
fn geometry_converts_pixels_to_time() {
    let g = geometry();
    assert_eq!(g.ms_per_pixel, 10.0);
    assert_eq!(g.window_ms, 4000.0);
}

#[test]
fn looping_sweep_restarts_after_a_full_window() {
    let g = geometry();
    let mut clock = SimulationClock::new(true);
    clock.play();
    clock.tick(0.0);
    clock.tick(2000.0);
    let mid = clock.update_window(&g);
    assert_eq!(mid.start_ms, 0.0);
    assert_eq!(mid.x_max, 199, "half way across a 400 px surface");

    clock.tick(4001.0);
    let wrapped = clock.update_window(&g);
    assert_eq!(wrapped.start_ms, 4001.0, "sweep restarts at the current time");
    assert_eq!(wrapped.elapsed_ms, 0.0);
    assert_eq!(wrapped.x_max, 1);
    assert!(wrapped.cursor_visible);
}

#[test]
fn window_times_map_columns_from_the_sweep_start() {
    let g = geometry();
    let mut clock = SimulationClock::new(true);
    clock.play();
    clock.tick(0.0);
    clock.tick(1000.0);
    let w = clock.update_window(&g);
    assert_eq!(w.time_at(0), 0.0);
    assert_eq!(w.time_at(50), 500.0);
}

#[test]
fn single_run_completes_once_and_pauses() {
    let g = geometry();
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    let mut clock = SimulationClock::new(true);
    clock.start_single_run(g.window_ms, Some(Box::new(move || seen.set(seen.get() + 1))));
    assert!(clock.is_playing() && clock.single_run_active());
    assert!(!clock.is_looping());

    clock.tick(100.0);
    for now in (116..4200).step_by(16) {
        clock.tick(now as f64);
    }
    assert_eq!(calls.get(), 1, "completion fires exactly once");
    assert!(!clock.is_playing());
    assert!(!clock.single_run_active());
    assert_eq!(clock.simulated_time_ms(), g.window_ms, "held at the target");

    let frozen = clock.update_window(&g);
    assert_eq!(frozen.elapsed_ms, g.window_ms);
    assert!(!frozen.cursor_visible);

    clock.tick(9000.0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn single_run_reports_completion_in_tick_outcome() {
    let mut clock = SimulationClock::new(false);
    clock.start_single_run(50.0, None);
    clock.tick(0.0);
    let out = clock.tick(30.0);
    assert!(out.advanced && !out.single_run_completed);
    let out = clock.tick(60.0);
    assert!(out.single_run_completed);
}

#[test]
fn cancelling_a_single_run_can_skip_or_fire_the_callback() {
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let mut clock = SimulationClock::new(true);
    clock.start_single_run(4000.0, Some(Box::new(move || flag.set(true))));
    clock.cancel_single_run(false);
    assert!(!fired.get());
    assert!(!clock.single_run_active());

    let flag = fired.clone();
    clock.start_single_run(4000.0, Some(Box::new(move || flag.set(true))));
    clock.cancel_single_run(true);
    assert!(fired.get());
}

#[test]
fn reset_resolves_a_pending_single_run() {
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let mut clock = SimulationClock::new(true);
    clock.start_single_run(4000.0, Some(Box::new(move || flag.set(true))));
    clock.tick(0.0);
    clock.tick(1000.0);
    clock.reset();
    assert!(fired.get(), "waiters are released on reset");
    assert_eq!(clock.simulated_time_ms(), 0.0);
}

#[test]
fn starting_a_new_run_finishes_the_previous_one() {
    let first = Rc::new(Cell::new(false));
    let flag = first.clone();
    let mut clock = SimulationClock::new(true);
    clock.start_single_run(4000.0, Some(Box::new(move || flag.set(true))));
    clock.start_single_run(4000.0, None);
    assert!(first.get());
    assert!(clock.single_run_active());
}

#[test]
fn non_monotonic_time_never_rewinds() {
    let mut clock = SimulationClock::new(true);
    clock.play();
    clock.tick(1000.0);
    clock.tick(1500.0);
    clock.tick(1200.0);
    assert_eq!(clock.simulated_time_ms(), 500.0);
}
