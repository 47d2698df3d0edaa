//! Two-point calipers on the zoomed strip.
//!
//! Points are stored in strip units: milliseconds from the left edge and
//! millivolts above the baseline. A [`CaliperScale`] maps them to and from
//! screen pixels for drawing and hit testing.

use glam::Vec2;

/// Default pick distance for hit testing, in pixels.
pub const MEASURE_HIT_TOLERANCE_PX: f32 = 8.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CaliperPoint {
    pub ms: f64,
    pub mv: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub start: CaliperPoint,
    pub end: CaliperPoint,
}

impl Measurement {
    /// Absolute time span and signed voltage change, end minus start.
    pub fn delta(&self) -> (f64, f64) {
        ((self.end.ms - self.start.ms).abs(), self.end.mv - self.start.mv)
    }

    pub fn label_lines(&self) -> [String; 2] {
        let (dt, dv) = self.delta();
        [format!("\u{394}t {:.0} ms", dt.round()), format!("\u{394}V {dv:.2} mV")]
    }
}

/// Pixel mapping of one strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaliperScale {
    pub ms_per_pixel: f64,
    pub mv_to_px: f64,
    pub baseline_y: f32,
}

impl CaliperScale {
    pub fn to_screen(&self, p: CaliperPoint) -> Vec2 {
        let x = p.ms / self.ms_per_pixel;
        let y = self.baseline_y as f64 - p.mv * self.mv_to_px;
        Vec2::new(x as f32, y as f32)
    }

    pub fn from_screen(&self, p: Vec2) -> CaliperPoint {
        CaliperPoint {
            ms: p.x as f64 * self.ms_per_pixel,
            mv: (self.baseline_y - p.y) as f64 / self.mv_to_px,
        }
    }

    fn valid(&self) -> bool {
        self.ms_per_pixel.is_finite() && self.ms_per_pixel > 0.0 && self.mv_to_px.is_finite() && self.mv_to_px > 0.0
    }
}

fn distance_to_segment(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Finished measurements plus the one being placed, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureTool {
    enabled: bool,
    measurements: Vec<Measurement>,
    pending: Option<Measurement>,
}

impl MeasureTool {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the tool off drops every measurement. Returns true on change.
    pub fn set_enabled(&mut self, on: bool) -> bool {
        if self.enabled == on {
            return false;
        }
        self.enabled = on;
        if !on {
            self.clear();
        }
        true
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// The live caliper whose end follows the pointer.
    pub fn pending(&self) -> Option<&Measurement> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) {
        self.measurements.clear();
        self.pending = None;
    }

    /// Place a caliper point. The first point starts a live caliper (dropping
    /// earlier measurements unless `keep_existing`); the second finishes it.
    /// Returns the index of a finished measurement.
    pub fn add_point(&mut self, p: CaliperPoint, keep_existing: bool) -> Option<usize> {
        match self.pending.take() {
            None => {
                if !keep_existing {
                    self.measurements.clear();
                }
                self.pending = Some(Measurement { start: p, end: p });
                None
            }
            Some(live) => {
                self.measurements.push(Measurement { end: p, ..live });
                Some(self.measurements.len() - 1)
            }
        }
    }

    /// Move the live caliper's end. Returns true when one is being placed.
    pub fn track(&mut self, p: CaliperPoint) -> bool {
        match &mut self.pending {
            Some(live) => {
                live.end = p;
                true
            }
            None => false,
        }
    }

    /// Newest finished measurement within `tolerance` pixels of `point`.
    pub fn hit_test(&self, point: Vec2, scale: &CaliperScale, tolerance: f32) -> Option<usize> {
        if !scale.valid() {
            return None;
        }
        self.measurements.iter().rposition(|m| {
            let a = scale.to_screen(m.start);
            let b = scale.to_screen(m.end);
            distance_to_segment(a, b, point) <= tolerance
        })
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Measurement> {
        (index < self.measurements.len()).then(|| self.measurements.remove(index))
    }

    /// A click on the strip: ignored over an existing measurement, otherwise
    /// places a caliper point. Returns true when the tool state changed.
    pub fn click(&mut self, point: Vec2, scale: &CaliperScale, keep_existing: bool) -> bool {
        if !self.enabled || !scale.valid() || self.hit_test(point, scale, MEASURE_HIT_TOLERANCE_PX).is_some() {
            return false;
        }
        self.add_point(scale.from_screen(point), keep_existing);
        true
    }

    /// A double click removes the measurement under the pointer.
    pub fn double_click(&mut self, point: Vec2, scale: &CaliperScale) -> bool {
        if !self.enabled {
            return false;
        }
        self.hit_test(point, scale, MEASURE_HIT_TOLERANCE_PX)
            .and_then(|i| self.remove_at(i))
            .is_some()
    }
}
