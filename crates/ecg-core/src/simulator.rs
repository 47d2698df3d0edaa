//! The simulator facade: owns the configuration, the current schedule, the
//! clock and the display toggles, and regenerates synchronously on every
//! state change.

use glam::Vec2;
use smallvec::SmallVec;

use crate::axis::{AxisMode, AxisState};
use crate::clock::{SimulationClock, SweepGeometry, SweepWindow, TickOutcome};
use crate::conduction::ConductionLink;
use crate::config::{normalize_paper_speed, EngineConfig};
use crate::constants::{CALIBRATION_PULSE_MS, CALIBRATION_PULSE_MV};
use crate::error::EngineError;
use crate::intervals::{self, IntervalBracket, IntervalHighlights, ReadoutSummary};
use crate::lead::{self, LeadId};
use crate::measure::{CaliperScale, MeasureTool};
use crate::model::VoltageModel;
use crate::rhythm::{RhythmId, RhythmPreset};
use crate::sample::SampleCache;
use crate::schedule::{build_schedule, BeatSchedule};
use crate::seed::SeedSequence;
use crate::trace::{build_sweep_frame, Highlights, SweepFrame};
use crate::waveform::{Amplitudes, WaveType};

pub struct EcgSimulator {
    config: EngineConfig,
    amps: Amplitudes,
    rhythm: RhythmId,
    heart_rate_bpm: f64,
    axis: AxisState,
    schedule: BeatSchedule,
    clock: SimulationClock,
    cache: SampleCache,
    seeds: SeedSequence,
    highlights: Highlights,
    interval_highlights: IntervalHighlights,
    selected_lead: LeadId,
    highlighted_leads: SmallVec<[LeadId; 4]>,
    conduction: ConductionLink,
    measure: MeasureTool,
    width_px: f64,
    dirty: bool,
}

impl EcgSimulator {
    pub fn new(config: EngineConfig) -> Self {
        let rhythm = RhythmId::Sinus;
        let heart_rate_bpm = rhythm.preset().default_hr;
        let mut seeds = SeedSequence::new(config.seed_base);
        let seed = seeds.next_for(rhythm.as_str(), heart_rate_bpm);
        let schedule = build_schedule(rhythm.preset(), heart_rate_bpm, config.window_ms(), seed);
        let selected_lead = config.lead_set.leads().first().copied().unwrap_or(LeadId::II);
        log::info!(
            "[ecg] simulator ready: {} @ {heart_rate_bpm} bpm, {} px/mm",
            rhythm,
            config.pixels_per_mm
        );
        Self {
            amps: Amplitudes::for_pixels_per_mm(config.pixels_per_mm),
            clock: SimulationClock::new(config.looping),
            cache: SampleCache::new(config.sample_cache_limit),
            config: EngineConfig {
                paper_speed_mm_s: normalize_paper_speed(config.paper_speed_mm_s),
                ..config
            },
            rhythm,
            heart_rate_bpm,
            axis: AxisState::default(),
            schedule,
            seeds,
            highlights: Highlights::default(),
            interval_highlights: IntervalHighlights::default(),
            selected_lead,
            highlighted_leads: SmallVec::new(),
            conduction: ConductionLink::new(heart_rate_bpm),
            measure: MeasureTool::default(),
            width_px: 0.0,
            dirty: true,
        }
    }

    fn regenerate(&mut self) {
        let seed = self.seeds.next_for(self.rhythm.as_str(), self.heart_rate_bpm);
        self.schedule = build_schedule(self.rhythm.preset(), self.heart_rate_bpm, self.config.window_ms(), seed);
        self.cache.clear();
        self.dirty = true;
        log::debug!(
            "[ecg] regenerated {} @ {:.0} bpm: {} beats over {:.0} ms (seed {seed:#x})",
            self.rhythm,
            self.heart_rate_bpm,
            self.schedule.beats.len(),
            self.schedule.rhythm_duration_ms
        );
    }

    // --- rhythm and rate ---

    /// Select a rhythm by id. Unknown ids fall back to sinus rhythm.
    pub fn set_rhythm(&mut self, id: &str) -> RhythmId {
        let rhythm = RhythmId::parse_or_sinus(id);
        self.set_rhythm_id(rhythm);
        rhythm
    }

    pub fn set_rhythm_id(&mut self, rhythm: RhythmId) {
        self.rhythm = rhythm;
        let preset = rhythm.preset();
        self.heart_rate_bpm = preset.hr_clamp.clamp(preset.default_hr);
        self.conduction.set_heart_rate(self.heart_rate_bpm);
        self.highlighted_leads = rhythm
            .territory()
            .map(|t| t.elevated_leads().collect())
            .unwrap_or_default();
        self.regenerate();
        self.clock.restart_sweep();
        log::info!("[ecg] rhythm {} ({})", rhythm, preset.label);
    }

    /// Set the heart rate, clamped to the current preset. Returns the rate
    /// actually applied so callers can write it back to their input.
    pub fn set_heart_rate(&mut self, bpm: f64) -> f64 {
        match self.rhythm.preset().clamp_heart_rate(bpm) {
            Ok(applied) => {
                if applied != self.heart_rate_bpm {
                    self.heart_rate_bpm = applied;
                    self.conduction.set_heart_rate(applied);
                    self.regenerate();
                }
            }
            Err(e) => log::warn!("[ecg] {e}; keeping {} bpm", self.heart_rate_bpm),
        }
        self.heart_rate_bpm
    }

    pub fn rhythm(&self) -> RhythmId {
        self.rhythm
    }

    pub fn preset(&self) -> &'static RhythmPreset {
        self.rhythm.preset()
    }

    pub fn heart_rate(&self) -> f64 {
        self.heart_rate_bpm
    }

    pub fn schedule(&self) -> &BeatSchedule {
        &self.schedule
    }

    /// `(id, label)` pairs in table order.
    pub fn rhythm_list() -> impl Iterator<Item = (&'static str, &'static str)> {
        RhythmId::ALL.into_iter().map(|id| (id.as_str(), id.preset().label))
    }

    // --- axis ---

    pub fn set_axis_degrees(&mut self, deg: f64) {
        if self.axis.set_degrees(deg) {
            self.dirty = true;
        }
    }

    pub fn set_axis_mode(&mut self, mode: AxisMode) {
        if self.axis.set_mode(mode) {
            self.dirty = true;
        }
    }

    /// Pick the axis quadrant from the net QRS polarity of leads I and aVF.
    pub fn set_axis_quadrant(&mut self, lead_i_positive: bool, avf_positive: bool) {
        self.set_axis_mode(AxisMode::from_quadrant(lead_i_positive, avf_positive));
    }

    pub fn axis(&self) -> AxisState {
        self.axis
    }

    // --- display toggles ---

    pub fn set_paper_speed(&mut self, mm_s: f64) {
        let speed = normalize_paper_speed(mm_s);
        if speed != self.config.paper_speed_mm_s {
            self.config.paper_speed_mm_s = speed;
            self.clock.restart_sweep();
            self.dirty = true;
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn amplitudes(&self) -> Amplitudes {
        self.amps
    }

    pub fn set_highlights(&mut self, highlights: Highlights) {
        self.highlights = highlights;
        self.dirty = true;
    }

    pub fn highlights(&self) -> Highlights {
        self.highlights
    }

    pub fn set_interval_highlights(&mut self, on: IntervalHighlights) {
        self.interval_highlights = on;
        self.dirty = true;
    }

    pub fn interval_highlights(&self) -> IntervalHighlights {
        self.interval_highlights
    }

    pub fn select_lead(&mut self, name: &str) -> Result<LeadId, EngineError> {
        let lead: LeadId = name.parse()?;
        self.set_selected_lead(lead);
        Ok(lead)
    }

    pub fn set_selected_lead(&mut self, lead: LeadId) {
        if lead != self.selected_lead {
            self.selected_lead = lead;
            self.dirty = true;
        }
    }

    pub fn selected_lead(&self) -> LeadId {
        self.selected_lead
    }

    pub fn highlighted_leads(&self) -> &[LeadId] {
        &self.highlighted_leads
    }

    pub fn conduction(&self) -> ConductionLink {
        self.conduction
    }

    pub fn set_conduction_phase_offset(&mut self, offset: f64) -> bool {
        self.conduction.set_phase_offset(offset)
    }

    // --- calipers ---

    pub fn measure_tool(&self) -> &MeasureTool {
        &self.measure
    }

    pub fn set_measure_enabled(&mut self, on: bool) {
        if self.measure.set_enabled(on) {
            self.dirty = true;
            log::info!("[ecg] calipers {}", if on { "on" } else { "off" });
        }
    }

    /// Pixel mapping of a strip whose baseline sits at `baseline_y`.
    pub fn caliper_scale(&self, baseline_y: f32) -> Option<CaliperScale> {
        let geometry = self.sweep_geometry()?;
        Some(CaliperScale {
            ms_per_pixel: geometry.ms_per_pixel,
            mv_to_px: self.amps.mv_to_px,
            baseline_y,
        })
    }

    /// Click on the zoomed strip. `keep_existing` adds to the current
    /// measurements instead of starting over.
    pub fn measure_click(&mut self, point: Vec2, baseline_y: f32, keep_existing: bool) -> bool {
        let Some(scale) = self.caliper_scale(baseline_y) else {
            return false;
        };
        let changed = self.measure.click(point, &scale, keep_existing);
        self.dirty |= changed;
        changed
    }

    pub fn measure_double_click(&mut self, point: Vec2, baseline_y: f32) -> bool {
        let Some(scale) = self.caliper_scale(baseline_y) else {
            return false;
        };
        let removed = self.measure.double_click(point, &scale);
        self.dirty |= removed;
        removed
    }

    /// Drag the live caliper's end to the pointer.
    pub fn measure_track(&mut self, point: Vec2, baseline_y: f32) -> bool {
        let Some(scale) = self.caliper_scale(baseline_y) else {
            return false;
        };
        let moved = self.measure.track(scale.from_screen(point));
        self.dirty |= moved;
        moved
    }

    /// Returns and clears the redraw request raised by state changes.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // --- clock ---

    pub fn play(&mut self) {
        if !self.clock.is_playing() {
            self.clock.play();
            self.dirty = true;
        }
    }

    pub fn pause(&mut self) {
        if self.clock.is_playing() {
            self.clock.pause();
            self.dirty = true;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn reset(&mut self) {
        self.clock.reset();
        self.dirty = true;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.clock.set_looping(looping);
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        let outcome = self.clock.tick(now_ms);
        if outcome.single_run_completed {
            self.dirty = true;
            log::debug!("[ecg] single run complete at {:.0} ms", self.clock.simulated_time_ms());
        }
        outcome
    }

    /// Sweep exactly once across the surface and stop. `on_complete` runs
    /// when the sweep finishes or when the run is cancelled. Returns the
    /// target time of the run.
    pub fn render_once_and_freeze(&mut self, on_complete: Option<Box<dyn FnOnce()>>) -> f64 {
        let target = match self.sweep_geometry() {
            Some(g) => g.window_ms,
            None => self.config.window_ms().max(1000.0),
        };
        self.clock.start_single_run(target, on_complete);
        self.dirty = true;
        target
    }

    // --- geometry and sampling ---

    pub fn resize(&mut self, width_px: f64) {
        if width_px != self.width_px {
            self.width_px = width_px;
            self.dirty = true;
        }
    }

    pub fn width(&self) -> f64 {
        self.width_px
    }

    pub fn sweep_geometry(&self) -> Option<SweepGeometry> {
        SweepGeometry::new(self.width_px, self.config.paper_speed_mm_s, self.config.pixels_per_mm)
    }

    /// Place this frame's sweep window. `None` for a zero-size surface.
    pub fn update_sweep_window(&mut self) -> Option<SweepWindow> {
        let geometry = self.sweep_geometry()?;
        Some(self.clock.update_window(&geometry))
    }

    fn model(&self) -> VoltageModel<'_> {
        voltage_model(&self.schedule, self.amps, self.axis, &self.config)
    }

    /// The model plus the sample cache, borrowed disjointly.
    fn model_and_cache(&mut self) -> (VoltageModel<'_>, &mut SampleCache) {
        let model = voltage_model(&self.schedule, self.amps, self.axis, &self.config);
        (model, &mut self.cache)
    }

    /// Projected voltage of `lead` at `time_ms`, in pixels.
    pub fn lead_voltage(&mut self, time_ms: f64, lead: LeadId) -> f64 {
        let (model, cache) = self.model_and_cache();
        let sample = cache.get_or_insert_with(lead, time_ms, || model.components(time_ms, lead));
        lead::project(&sample, lead, &model.axis)
    }

    pub fn lead_voltage_by_name(&mut self, time_ms: f64, name: &str) -> Result<f64, EngineError> {
        let lead: LeadId = name.parse()?;
        Ok(self.lead_voltage(time_ms, lead))
    }

    pub fn wave_type(&self, time_ms: f64) -> WaveType {
        self.model().wave_type(time_ms)
    }

    /// Sample `lead` across `window`, capped at `max_columns` pixels.
    pub fn trace(&mut self, lead: LeadId, window: &SweepWindow, max_columns: Option<usize>) -> SweepFrame {
        let (model, cache) = self.model_and_cache();
        build_sweep_frame(window, max_columns, |t| {
            let sample = cache.get_or_insert_with(lead, t, || model.components(t, lead));
            (lead::project(&sample, lead, &model.axis), model.wave_type(t))
        })
    }

    /// Update the window and trace one lead across the full surface.
    pub fn sweep_frame(&mut self, lead: LeadId) -> Option<SweepFrame> {
        let window = self.update_sweep_window()?;
        Some(self.trace(lead, &window, None))
    }

    pub fn interval_brackets(&self, window: &SweepWindow) -> Vec<IntervalBracket> {
        intervals::interval_brackets(
            &self.schedule,
            &self.interval_highlights,
            window.start_ms,
            window.x_max as f64,
            window.ms_per_pixel,
        )
    }

    pub fn readout_summary(&self) -> ReadoutSummary {
        intervals::readout_summary(&self.schedule, self.rhythm.preset(), self.axis.mode())
    }

    /// Outline of the 1 mV x 200 ms calibration pulse starting at `origin`
    /// (screen coordinates, baseline at `origin.y`).
    pub fn calibration_pulse(&self, origin: Vec2, ms_per_pixel: f64) -> [Vec2; 4] {
        let width = (CALIBRATION_PULSE_MS / ms_per_pixel.max(f64::EPSILON)).max(4.0) as f32;
        let height = (CALIBRATION_PULSE_MV * self.amps.mv_to_px) as f32;
        [
            origin,
            origin - Vec2::new(0.0, height),
            origin + Vec2::new(width, -height),
            origin + Vec2::new(width, 0.0),
        ]
    }
}

fn voltage_model<'a>(
    schedule: &'a BeatSchedule,
    amps: Amplitudes,
    axis: AxisState,
    config: &EngineConfig,
) -> VoltageModel<'a> {
    VoltageModel {
        schedule,
        amps,
        axis,
        st_elevation_mv: config.st_elevation_mv,
    }
}
