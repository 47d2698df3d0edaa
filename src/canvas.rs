//! Canvas 2D rendering of the 12-lead grid and the zoomed rhythm strip.

use ecg_core::layout::{twelve_lead_grid, Viewport};
use ecg_core::trace::CURSOR_COLOR;
use ecg_core::{
    draw_frame, CaliperScale, EcgSimulator, IntervalBracket, MeasureTool, Measurement, SweepWindow, TraceSink,
};
use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys as web;

use crate::constants::*;
use crate::dom;

/// `TraceSink` over a 2D context, with the cursor confined to one tile.
pub struct CanvasSink<'a> {
    ctx: &'a web::CanvasRenderingContext2d,
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl<'a> CanvasSink<'a> {
    pub fn new(ctx: &'a web::CanvasRenderingContext2d, origin: Vec2, size: Vec2) -> Self {
        Self {
            ctx,
            top: origin.y as f64,
            bottom: (origin.y + size.y) as f64,
            left: origin.x as f64,
            right: (origin.x + size.x) as f64,
        }
    }
}

impl TraceSink for CanvasSink<'_> {
    fn begin_segment(&mut self, color: &str, at: Vec2) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(TRACE_LINE_WIDTH);
        self.ctx.move_to(at.x as f64, at.y as f64);
    }

    fn line_to(&mut self, to: Vec2) {
        if (to.x as f64) <= self.right {
            self.ctx.line_to(to.x as f64, to.y as f64);
        }
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn cursor(&mut self, x: f32) {
        let x = (x as f64).clamp(self.left, self.right - 1.0) + 0.5;
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(CURSOR_COLOR);
        self.ctx.set_line_width(CURSOR_LINE_WIDTH);
        self.ctx.move_to(x, self.top);
        self.ctx.line_to(x, self.bottom);
        self.ctx.stroke();
    }
}

struct Surface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    css_width: f64,
    css_height: f64,
}

impl Surface {
    fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = dom::context_2d(&canvas)?;
        let mut s = Self {
            canvas,
            ctx,
            css_width: 0.0,
            css_height: 0.0,
        };
        s.sync_size();
        Ok(s)
    }

    fn sync_size(&mut self) {
        self.css_width = dom::sync_canvas_backing_size(&self.canvas);
        self.css_height = self.canvas.get_bounding_client_rect().height();
    }

    /// Reset the transform to CSS pixels and clear.
    fn begin(&self) {
        let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.ctx.clear_rect(0.0, 0.0, self.css_width, self.css_height);
    }
}

pub struct EcgView {
    grid: Surface,
    zoom: Option<Surface>,
    viewports: Vec<Viewport>,
}

impl EcgView {
    pub fn new(grid: web::HtmlCanvasElement, zoom: Option<web::HtmlCanvasElement>) -> anyhow::Result<Self> {
        let grid = Surface::new(grid)?;
        let zoom = match zoom {
            Some(c) => Some(Surface::new(c)?),
            None => None,
        };
        let viewports = twelve_lead_grid(grid.css_width as f32, grid.css_height as f32);
        Ok(Self { grid, zoom, viewports })
    }

    pub fn grid_canvas(&self) -> &web::HtmlCanvasElement {
        &self.grid.canvas
    }

    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    pub fn zoom_canvas(&self) -> Option<&web::HtmlCanvasElement> {
        self.zoom.as_ref().map(|z| &z.canvas)
    }

    /// Baseline of the zoomed strip in CSS pixels.
    pub fn zoom_baseline(&self) -> f32 {
        self.zoom.as_ref().map_or(0.0, |z| zoom_bands(z).1)
    }

    /// Re-measure both canvases and re-tile. Returns the sweep width.
    pub fn resize(&mut self) -> f64 {
        self.grid.sync_size();
        if let Some(z) = &mut self.zoom {
            z.sync_size();
        }
        self.viewports = twelve_lead_grid(self.grid.css_width as f32, self.grid.css_height as f32);
        self.grid.css_width
    }

    pub fn draw(&self, sim: &mut EcgSimulator) {
        self.grid.begin();
        if let Some(z) = &self.zoom {
            z.begin();
        }
        let px_per_mm = sim.config().pixels_per_mm;
        draw_paper(&self.grid, px_per_mm);

        let Some(window) = sim.update_sweep_window() else {
            return;
        };
        let highlights = sim.highlights();
        let ctx = &self.grid.ctx;

        for vp in &self.viewports {
            ctx.save();
            ctx.begin_path();
            ctx.rect(vp.origin.x as f64, vp.origin.y as f64, vp.size.x as f64, vp.size.y as f64);
            ctx.clip();
            self.draw_tile_chrome(vp, sim);
            let frame = sim.trace(vp.lead, &window, Some(vp.size.x.max(1.0) as usize - 1));
            let mut sink = CanvasSink::new(ctx, vp.origin, vp.size);
            draw_frame(&frame, &mut sink, &highlights, Vec2::new(vp.origin.x, vp.baseline_y()));
            ctx.restore();
        }
        draw_readout(&self.grid, &sim.readout_summary().lines());

        if let Some(zoom) = &self.zoom {
            draw_paper(zoom, px_per_mm);
            self.draw_zoom(zoom, sim, &window);
        }
    }

    fn draw_tile_chrome(&self, vp: &Viewport, sim: &EcgSimulator) {
        let ctx = &self.grid.ctx;
        let (x, y, w, h) = (vp.origin.x as f64, vp.origin.y as f64, vp.size.x as f64, vp.size.y as f64);
        ctx.set_line_width(1.0);
        ctx.set_stroke_style_str(TILE_BORDER_COLOR);
        ctx.stroke_rect(x, y, w, h);

        let baseline = vp.baseline_y() as f64 + 0.5;
        ctx.begin_path();
        ctx.set_stroke_style_str(TILE_BASELINE_COLOR);
        ctx.move_to(x, baseline);
        ctx.line_to(x + w, baseline);
        ctx.stroke();

        ctx.set_font(LABEL_FONT);
        ctx.set_fill_style_str(TILE_LABEL_COLOR);
        _ = ctx.fill_text(vp.lead.label(), x + 6.0, y + 14.0);

        if sim.highlighted_leads().contains(&vp.lead) {
            ctx.set_line_width(2.0);
            ctx.set_stroke_style_str(TILE_HIGHLIGHT_COLOR);
            ctx.stroke_rect(x + 2.0, y + 2.0, w - 4.0, h - 4.0);
        }
        if sim.selected_lead() == vp.lead {
            ctx.set_line_width(1.5);
            ctx.set_stroke_style_str(TILE_SELECTED_COLOR);
            ctx.stroke_rect(x + 0.5, y + 0.5, w - 1.0, h - 1.0);
        }
    }

    fn draw_zoom(&self, zoom: &Surface, sim: &mut EcgSimulator, window: &SweepWindow) {
        let ctx = &zoom.ctx;
        let (band_top, baseline) = zoom_bands(zoom);
        let origin = Vec2::ZERO;
        let size = Vec2::new(zoom.css_width as f32, band_top as f32);
        let lead = sim.selected_lead();

        let frame = sim.trace(lead, window, Some(zoom.css_width.max(1.0) as usize - 1));
        let mut sink = CanvasSink::new(ctx, origin, size);
        draw_frame(&frame, &mut sink, &sim.highlights(), Vec2::new(0.0, baseline));

        ctx.set_font(LABEL_FONT);
        ctx.set_fill_style_str(TILE_LABEL_COLOR);
        _ = ctx.fill_text(lead.label(), 8.0, 16.0);

        let pulse = sim.calibration_pulse(Vec2::new(CALIBRATION_X_PX, baseline), window.ms_per_pixel);
        ctx.begin_path();
        ctx.set_stroke_style_str(CALIBRATION_COLOR);
        ctx.set_line_width(1.5);
        ctx.move_to(pulse[0].x as f64, pulse[0].y as f64);
        for p in &pulse[1..] {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.stroke();

        draw_brackets(zoom, &sim.interval_brackets(window), band_top);

        if let Some(scale) = sim.caliper_scale(baseline) {
            draw_calipers(zoom, sim.measure_tool(), &scale);
        }
    }
}

/// Top of the bracket band and the trace baseline of the zoomed strip.
fn zoom_bands(zoom: &Surface) -> (f64, f32) {
    let band_top = (zoom.css_height - BRACKET_BAND_PX).max(0.0);
    (band_top, (band_top * 0.6) as f32)
}

fn draw_calipers(surface: &Surface, tool: &MeasureTool, scale: &CaliperScale) {
    if !tool.is_enabled() {
        return;
    }
    let ctx = &surface.ctx;
    ctx.save();
    ctx.set_font(MEASURE_FONT);
    ctx.set_text_baseline("top");
    for m in tool.measurements() {
        draw_caliper(surface, m, scale, false);
    }
    if let Some(live) = tool.pending() {
        draw_caliper(surface, live, scale, true);
    }
    ctx.restore();
}

fn draw_caliper(surface: &Surface, m: &Measurement, scale: &CaliperScale, live: bool) {
    let ctx = &surface.ctx;
    let a = scale.to_screen(m.start);
    let b = scale.to_screen(m.end);
    let (ax, ay, bx, by) = (a.x as f64, a.y as f64, b.x as f64, b.y as f64);

    let dash = js_sys::Array::new();
    if live {
        dash.push(&JsValue::from_f64(4.0));
        dash.push(&JsValue::from_f64(3.0));
    }
    _ = ctx.set_line_dash(&dash);
    ctx.set_stroke_style_str(MEASURE_LINE_COLOR);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(ax, ay);
    ctx.line_to(bx, by);
    ctx.stroke();
    _ = ctx.set_line_dash(&js_sys::Array::new());

    ctx.set_fill_style_str(MEASURE_HANDLE_COLOR);
    for (x, y) in [(ax, ay), (bx, by)] {
        ctx.begin_path();
        _ = ctx.arc(x, y, MEASURE_HANDLE_RADIUS_PX, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }

    let lines = m.label_lines();
    let (pad_x, pad_y) = MEASURE_LABEL_PAD_PX;
    let text_w = lines
        .iter()
        .filter_map(|l| ctx.measure_text(l).ok())
        .map(|t| t.width())
        .fold(0.0_f64, f64::max);
    let w = text_w + pad_x * 2.0;
    let h = MEASURE_LINE_HEIGHT_PX * 2.0 + pad_y * 2.0;
    let x = ((ax + bx) / 2.0 - w / 2.0).clamp(6.0, (surface.css_width - w - 6.0).max(6.0));
    let y = ((ay + by) / 2.0 - h - 6.0).clamp(6.0, (surface.css_height - h - 6.0).max(6.0));

    ctx.set_fill_style_str(MEASURE_LABEL_FILL);
    ctx.set_stroke_style_str(MEASURE_LABEL_STROKE);
    ctx.set_line_width(1.0);
    ctx.fill_rect(x, y, w, h);
    ctx.stroke_rect(x, y, w, h);
    ctx.set_fill_style_str(MEASURE_HANDLE_COLOR);
    for (i, line) in lines.iter().enumerate() {
        _ = ctx.fill_text(line, x + pad_x, y + pad_y + i as f64 * MEASURE_LINE_HEIGHT_PX);
    }
}

fn draw_paper(surface: &Surface, px_per_mm: f64) {
    let ctx = &surface.ctx;
    let (w, h) = (surface.css_width, surface.css_height);
    ctx.set_fill_style_str(PAPER_COLOR);
    ctx.fill_rect(0.0, 0.0, w, h);
    if px_per_mm <= 0.0 {
        return;
    }
    for major in [false, true] {
        let step = if major { px_per_mm * GRID_MAJOR_EVERY as f64 } else { px_per_mm };
        ctx.begin_path();
        ctx.set_stroke_style_str(if major { GRID_MAJOR_COLOR } else { GRID_MINOR_COLOR });
        ctx.set_line_width(if major { 1.0 } else { 0.5 });
        let mut x = 0.0;
        while x <= w {
            ctx.move_to(x + 0.5, 0.0);
            ctx.line_to(x + 0.5, h);
            x += step;
        }
        let mut y = 0.0;
        while y <= h {
            ctx.move_to(0.0, y + 0.5);
            ctx.line_to(w, y + 0.5);
            y += step;
        }
        ctx.stroke();
    }
}

fn draw_brackets(surface: &Surface, brackets: &[IntervalBracket], band_top: f64) {
    let ctx = &surface.ctx;
    let usable = (BRACKET_BAND_PX - BRACKET_PAD_TOP_PX).max(56.0);
    let lane_gap = (usable / 4.0).floor();
    ctx.set_font(LABEL_FONT);
    for b in brackets {
        let lane = b.kind.lane();
        let (stroke, fill) = BRACKET_COLORS[lane];
        let y = band_top + BRACKET_PAD_TOP_PX + lane_gap * (lane as f64 + 0.3) + BRACKET_HEIGHT_PX;
        ctx.set_line_width(2.0);
        ctx.set_stroke_style_str(stroke);
        ctx.set_fill_style_str(fill);
        ctx.begin_path();
        ctx.rect(b.x_start, y - BRACKET_HEIGHT_PX, b.x_end - b.x_start, BRACKET_HEIGHT_PX);
        ctx.fill();
        ctx.stroke();
        ctx.set_fill_style_str(stroke);
        _ = ctx.fill_text(&b.text, b.x_start, y - BRACKET_HEIGHT_PX - 2.0);
    }
}

fn draw_readout(surface: &Surface, lines: &[String]) {
    let ctx = &surface.ctx;
    ctx.set_font(READOUT_FONT);
    ctx.set_text_baseline("top");
    let line_h = READOUT_FONT_PX + 2.0;
    let max_w = lines
        .iter()
        .filter_map(|l| ctx.measure_text(l).ok())
        .map(|m| m.width())
        .fold(0.0_f64, f64::max);
    let box_w = max_w + READOUT_PADDING_PX * 2.0;
    let box_h = lines.len() as f64 * line_h + READOUT_PADDING_PX * 1.5;
    let x = (surface.css_width - box_w - READOUT_MARGIN_PX).max(READOUT_MARGIN_PX);
    let y = (surface.css_height - box_h - 4.0).max(0.0);

    ctx.set_fill_style_str(READOUT_FILL);
    ctx.set_stroke_style_str(READOUT_STROKE);
    ctx.set_line_width(1.0);
    ctx.fill_rect(x, y, box_w, box_h);
    ctx.stroke_rect(x, y, box_w, box_h);
    ctx.set_fill_style_str(READOUT_TEXT);
    for (i, line) in lines.iter().enumerate() {
        _ = ctx.fill_text(line, x + READOUT_PADDING_PX, y + READOUT_PADDING_PX + i as f64 * line_h);
    }
    ctx.set_text_baseline("alphabetic");
}
