//! Simulation time, the sweep window and single-run playback.

use std::fmt;

/// Pixel/time geometry of a sweep surface. Only constructible for
/// non-degenerate surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepGeometry {
    pub width_px: f64,
    pub ms_per_pixel: f64,
    pub window_ms: f64,
}

impl SweepGeometry {
    pub fn new(width_px: f64, paper_speed_mm_s: f64, pixels_per_mm: f64) -> Option<Self> {
        let ms_per_pixel = 1000.0 / (paper_speed_mm_s * pixels_per_mm);
        let window_ms = width_px * ms_per_pixel;
        let valid = width_px.is_finite()
            && width_px > 0.0
            && ms_per_pixel.is_finite()
            && ms_per_pixel > 0.0
            && window_ms.is_finite()
            && window_ms > 0.0;
        valid.then_some(Self {
            width_px,
            ms_per_pixel,
            window_ms,
        })
    }
}

/// Visible part of the sweep for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepWindow {
    pub start_ms: f64,
    pub elapsed_ms: f64,
    pub ms_per_pixel: f64,
    pub window_ms: f64,
    /// Last pixel column drawn (the sweep head).
    pub x_max: usize,
    pub cursor_visible: bool,
}

impl SweepWindow {
    pub fn time_at(&self, x: usize) -> f64 {
        self.start_ms + x as f64 * self.ms_per_pixel
    }
}

struct SingleRun {
    target_ms: f64,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for SingleRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleRun")
            .field("target_ms", &self.target_ms)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl SingleRun {
    fn finish(mut self) {
        if let Some(cb) = self.on_complete.take() {
            cb();
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub advanced: bool,
    pub single_run_completed: bool,
}

#[derive(Debug)]
pub struct SimulationClock {
    simulated_ms: f64,
    sweep_start_ms: f64,
    playing: bool,
    last_frame_ms: Option<f64>,
    looping: bool,
    single_run: Option<SingleRun>,
}

impl SimulationClock {
    pub fn new(looping: bool) -> Self {
        Self {
            simulated_ms: 0.0,
            sweep_start_ms: 0.0,
            playing: false,
            last_frame_ms: None,
            looping,
            single_run: None,
        }
    }

    pub fn simulated_time_ms(&self) -> f64 {
        self.simulated_ms
    }

    pub fn sweep_start_ms(&self) -> f64 {
        self.sweep_start_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn single_run_active(&self) -> bool {
        self.single_run.is_some()
    }

    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.last_frame_ms = None;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Zero the clock. A pending single run is cancelled and its callback
    /// fires so no waiter is left hanging.
    pub fn reset(&mut self) {
        self.cancel_single_run(true);
        self.simulated_ms = 0.0;
        self.sweep_start_ms = 0.0;
    }

    /// Start the next sweep at the current time.
    pub fn restart_sweep(&mut self) {
        self.sweep_start_ms = self.simulated_ms;
    }

    /// Advance by the wall-clock delta since the previous tick. The first
    /// tick after `play` advances by zero.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        if !self.playing {
            return TickOutcome::default();
        }
        let last = self.last_frame_ms.unwrap_or(now_ms);
        let dt = (now_ms - last).max(0.0);
        self.last_frame_ms = Some(now_ms);
        self.simulated_ms += dt;

        let target = self.single_run.as_ref().map(|r| r.target_ms);
        if let Some(target) = target {
            if self.simulated_ms >= target {
                self.simulated_ms = target;
                self.pause();
                if let Some(run) = self.single_run.take() {
                    run.finish();
                }
                return TickOutcome {
                    advanced: true,
                    single_run_completed: true,
                };
            }
        }
        TickOutcome {
            advanced: true,
            single_run_completed: false,
        }
    }

    /// Play exactly one sweep of `target_ms` from zero, then pause and call
    /// `on_complete`. Any earlier single run is completed first.
    pub fn start_single_run(&mut self, target_ms: f64, on_complete: Option<Box<dyn FnOnce()>>) {
        self.cancel_single_run(true);
        self.pause();
        self.looping = false;
        self.simulated_ms = 0.0;
        self.sweep_start_ms = 0.0;
        self.single_run = Some(SingleRun {
            target_ms: target_ms.max(1.0),
            on_complete,
        });
        self.play();
    }

    pub fn cancel_single_run(&mut self, resolve: bool) {
        if let Some(run) = self.single_run.take() {
            if resolve {
                run.finish();
            }
        }
    }

    /// Place the sweep window for this frame. Looping sweeps restart once a
    /// full window has elapsed; a single run is held inside the window.
    pub fn update_window(&mut self, geometry: &SweepGeometry) -> SweepWindow {
        let window_ms = geometry.window_ms;
        let mut elapsed = self.simulated_ms - self.sweep_start_ms;
        if self.looping {
            if elapsed >= window_ms || elapsed < 0.0 {
                self.sweep_start_ms = self.simulated_ms;
                elapsed = 0.0;
            }
        } else {
            if elapsed < 0.0 {
                self.sweep_start_ms = self.simulated_ms;
            }
            elapsed = elapsed.clamp(0.0, window_ms);
        }
        let progress = (elapsed / window_ms).min(1.0);
        let x_max = ((progress * (geometry.width_px - 1.0)).floor() as usize).max(1);
        SweepWindow {
            start_ms: self.sweep_start_ms,
            elapsed_ms: elapsed,
            ms_per_pixel: geometry.ms_per_pixel,
            window_ms,
            x_max,
            cursor_visible: self.looping || self.single_run.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_after_play_does_not_advance() {
        let mut clock = SimulationClock::new(true);
        clock.play();
        clock.tick(500.0);
        assert_eq!(clock.simulated_time_ms(), 0.0);
        clock.tick(516.0);
        assert_eq!(clock.simulated_time_ms(), 16.0);
    }

    #[test]
    fn paused_clock_ignores_ticks() {
        let mut clock = SimulationClock::new(true);
        let out = clock.tick(100.0);
        assert!(!out.advanced);
        assert_eq!(clock.simulated_time_ms(), 0.0);
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        assert!(SweepGeometry::new(0.0, 25.0, 4.0).is_none());
        assert!(SweepGeometry::new(400.0, 0.0, 4.0).is_none());
        assert!(SweepGeometry::new(f64::NAN, 25.0, 4.0).is_none());
        assert!(SweepGeometry::new(400.0, 25.0, 4.0).is_some());
    }
}
