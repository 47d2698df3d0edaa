//! Trace building: turns sampled voltages into colour-segmented polylines
//! and replays them into any drawing sink.

use glam::Vec2;

use crate::clock::SweepWindow;
use crate::waveform::WaveType;

pub const TRACE_BASE_COLOR: &str = "#1f2937";
pub const TRACE_P_COLOR: &str = "#2563eb";
pub const TRACE_QRS_COLOR: &str = "#d33f49";
pub const TRACE_T_COLOR: &str = "#2f855a";
pub const CURSOR_COLOR: &str = "#16a34a";

/// Which wave types get their own colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Highlights {
    pub p: bool,
    pub qrs: bool,
    pub t: bool,
}

pub fn color_for_wave(wave: WaveType, highlights: &Highlights) -> &'static str {
    match wave {
        WaveType::P if highlights.p => TRACE_P_COLOR,
        WaveType::Qrs if highlights.qrs => TRACE_QRS_COLOR,
        WaveType::T if highlights.t => TRACE_T_COLOR,
        _ => TRACE_BASE_COLOR,
    }
}

/// A run of points sharing one wave type. `x` is the pixel column and `y`
/// the voltage in pixels, positive upward.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceSegment {
    pub wave: WaveType,
    pub points: Vec<Vec2>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepFrame {
    pub segments: Vec<TraceSegment>,
    pub window: SweepWindow,
}

impl SweepFrame {
    pub fn cursor_x(&self) -> Option<f32> {
        self.window.cursor_visible.then_some(self.window.x_max as f32)
    }
}

/// Sample every pixel column `0..=x_max` (capped at `max_columns`), splitting
/// into a new segment whenever the wave type changes. The boundary point is
/// the last point of one segment and the first of the next.
pub fn build_sweep_frame(
    window: &SweepWindow,
    max_columns: Option<usize>,
    mut sample: impl FnMut(f64) -> (f64, WaveType),
) -> SweepFrame {
    let last_x = max_columns.map_or(window.x_max, |cap| window.x_max.min(cap));
    let mut segments: Vec<TraceSegment> = Vec::new();
    let (v0, w0) = sample(window.time_at(0));
    let mut current = TraceSegment {
        wave: w0,
        points: vec![Vec2::new(0.0, v0 as f32)],
    };
    for x in 1..=last_x {
        let (v, wave) = sample(window.time_at(x));
        let point = Vec2::new(x as f32, v as f32);
        current.points.push(point);
        if wave != current.wave {
            let next = TraceSegment {
                wave,
                points: vec![point],
            };
            segments.push(std::mem::replace(&mut current, next));
        }
    }
    segments.push(current);
    SweepFrame {
        segments,
        window: *window,
    }
}

/// Anything that can stroke polylines: a canvas, a text buffer, a test
/// recorder.
pub trait TraceSink {
    fn begin_segment(&mut self, color: &str, at: Vec2);
    fn line_to(&mut self, to: Vec2);
    fn stroke(&mut self);
    fn cursor(&mut self, x: f32);
}

/// Replay `frame` into `sink`, mapping trace points through `origin`
/// (tile left edge and baseline).
pub fn draw_frame<S: TraceSink + ?Sized>(frame: &SweepFrame, sink: &mut S, highlights: &Highlights, origin: Vec2) {
    let to_screen = |p: Vec2| Vec2::new(origin.x + p.x, origin.y - p.y);
    for seg in &frame.segments {
        let mut points = seg.points.iter().copied();
        let Some(first) = points.next() else {
            continue;
        };
        sink.begin_segment(color_for_wave(seg.wave, highlights), to_screen(first));
        for p in points {
            sink.line_to(to_screen(p));
        }
        sink.stroke();
    }
    if let Some(x) = frame.cursor_x() {
        sink.cursor(origin.x + x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(x_max: usize) -> SweepWindow {
        SweepWindow {
            start_ms: 0.0,
            elapsed_ms: 0.0,
            ms_per_pixel: 1.0,
            window_ms: 100.0,
            x_max,
            cursor_visible: true,
        }
    }

    #[test]
    fn segments_break_on_type_change_and_share_boundary() {
        let frame = build_sweep_frame(&window(30), None, |t| {
            let wave = if (10.0..20.0).contains(&t) { WaveType::Qrs } else { WaveType::Baseline };
            (t, wave)
        });
        assert_eq!(frame.segments.len(), 3);
        for pair in frame.segments.windows(2) {
            assert_eq!(pair[0].points.last(), pair[1].points.first());
            assert_ne!(pair[0].wave, pair[1].wave);
        }
    }

    #[test]
    fn highlight_colours_only_when_enabled() {
        let off = Highlights::default();
        let on = Highlights { p: true, qrs: true, t: true };
        assert_eq!(color_for_wave(WaveType::Qrs, &off), TRACE_BASE_COLOR);
        assert_eq!(color_for_wave(WaveType::Qrs, &on), TRACE_QRS_COLOR);
        assert_eq!(color_for_wave(WaveType::Baseline, &on), TRACE_BASE_COLOR);
    }
}
