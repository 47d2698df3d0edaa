//! Headless host: runs one sweep of the engine with a fixed time step and
//! prints the selected lead as a text strip followed by the readouts.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::anyhow;
use clap::Parser;
use ecg_core::trace::{TRACE_P_COLOR, TRACE_QRS_COLOR, TRACE_T_COLOR};
use ecg_core::{
    draw_frame, EcgSimulator, EngineConfig, Highlights, IntervalHighlights, LeadId, LeadSet, RhythmId, TraceSink,
};
use glam::Vec2;
use instant::Instant;

const PX_PER_COL: f32 = 4.0;
const PX_PER_ROW: f32 = 8.0;
const ROWS: usize = 21;
const STEP_MS: f64 = 1000.0 / 60.0;

/// Sweep the ECG engine once and print the strip as text.
#[derive(Parser, Debug)]
#[command(name = "ecg-native")]
#[command(about = "Run one ECG sweep headlessly and print the trace, brackets and readouts")]
struct Options {
    /// Rhythm id (sinus, afib, stemi_inferior, avb3, mvtach, ...)
    #[arg(long, default_value = "sinus")]
    rhythm: RhythmId,

    /// Heart rate in bpm, clamped to the rhythm's range
    #[arg(long)]
    bpm: Option<f64>,

    /// Lead to trace (I, II, III, aVR, aVL, aVF, V1..V6)
    #[arg(long, default_value = "II")]
    lead: LeadId,

    /// Strip width in text columns
    #[arg(long, default_value_t = 120)]
    cols: usize,

    /// Paper speed in mm/s (25 or 50)
    #[arg(long, default_value_t = 25.0)]
    speed: f64,

    /// Seed base for the stochastic rhythms
    #[arg(long)]
    seed: Option<u64>,

    /// List the available rhythms and exit
    #[arg(long)]
    list: bool,
}

/// Character-cell drawing sink. One column per `PX_PER_COL` pixels.
struct TextSink {
    cells: Vec<Vec<char>>,
    glyph: char,
    last: Option<Vec2>,
}

impl TextSink {
    fn new(cols: usize) -> Self {
        let mut cells = vec![vec![' '; cols]; ROWS];
        if let Some(row) = cells.get_mut(ROWS / 2) {
            row.fill('.');
        }
        Self {
            cells,
            glyph: '*',
            last: None,
        }
    }

    fn plot(&mut self, p: Vec2) {
        let col = (p.x / PX_PER_COL).round();
        let row = (p.y / PX_PER_ROW).round();
        if col < 0.0 || row < 0.0 {
            return;
        }
        if let Some(cell) = self.cells.get_mut(row as usize).and_then(|r| r.get_mut(col as usize)) {
            *cell = self.glyph;
        }
    }

    fn render(&self) -> String {
        self.cells
            .iter()
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TraceSink for TextSink {
    fn begin_segment(&mut self, color: &str, at: Vec2) {
        self.glyph = match color {
            TRACE_P_COLOR => 'p',
            TRACE_QRS_COLOR => 'q',
            TRACE_T_COLOR => 't',
            _ => '*',
        };
        self.last = Some(at);
        self.plot(at);
    }

    fn line_to(&mut self, to: Vec2) {
        let from = self.last.unwrap_or(to);
        let steps = ((to.y - from.y).abs() / PX_PER_ROW).ceil().max(1.0) as usize;
        for i in 1..=steps {
            self.plot(from.lerp(to, i as f32 / steps as f32));
        }
        self.last = Some(to);
    }

    fn stroke(&mut self) {
        self.last = None;
    }

    fn cursor(&mut self, x: f32) {
        let col = (x / PX_PER_COL) as usize;
        for row in &mut self.cells {
            if let Some(cell) = row.get_mut(col) {
                if *cell == ' ' || *cell == '.' {
                    *cell = '|';
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder().filter_level(log::LevelFilter::Info).parse_default_env().init();

    let opts = Options::parse();
    if opts.list {
        for (id, label) in EcgSimulator::rhythm_list() {
            println!("{id:<10} {label}");
        }
        return Ok(());
    }

    let defaults = EngineConfig::single_lead();
    let config = EngineConfig {
        paper_speed_mm_s: opts.speed,
        seed_base: opts.seed.unwrap_or(defaults.seed_base),
        lead_set: LeadSet::Single(opts.lead),
        looping: false,
        ..defaults
    };
    let mut sim = EcgSimulator::new(config);
    sim.set_rhythm_id(opts.rhythm);
    if let Some(bpm) = opts.bpm {
        sim.set_heart_rate(bpm);
    }
    sim.set_highlights(Highlights {
        p: true,
        qrs: true,
        t: true,
    });
    sim.set_interval_highlights(IntervalHighlights {
        rr: true,
        pr: true,
        qrs: true,
        qt: true,
    });
    sim.resize(opts.cols as f64 * PX_PER_COL as f64);

    let done = Rc::new(Cell::new(false));
    let flag = done.clone();
    let target_ms = sim.render_once_and_freeze(Some(Box::new(move || flag.set(true))));

    let started = Instant::now();
    let mut now_ms = 0.0;
    while !done.get() && now_ms <= target_ms + 1000.0 {
        sim.tick(now_ms);
        now_ms += STEP_MS;
    }
    log::info!(
        "[native] swept {target_ms:.0} ms in {} steps ({:.1} ms wall)",
        (now_ms / STEP_MS).round(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let window = sim
        .update_sweep_window()
        .ok_or_else(|| anyhow!("zero-width strip; pass --cols > 0"))?;
    let frame = sim.trace(opts.lead, &window, None);
    let mut sink = TextSink::new(opts.cols + 1);
    draw_frame(&frame, &mut sink, &sim.highlights(), Vec2::new(0.0, (ROWS / 2) as f32 * PX_PER_ROW));

    println!("{} ({}) lead {}", sim.preset().label, sim.rhythm(), opts.lead);
    println!("{}", sink.render());
    for bracket in sim.interval_brackets(&window) {
        println!(
            "  {:<4} {:>7.0}..{:<7.0} ms  {}",
            bracket.kind.label(),
            bracket.start_ms,
            bracket.end_ms,
            bracket.text
        );
    }
    for line in sim.readout_summary().lines() {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_trace_sinus_in_lead_two() {
        let opts = Options::try_parse_from(["ecg-native"]).expect("defaults parse");
        assert_eq!(opts.rhythm, RhythmId::Sinus);
        assert_eq!(opts.lead, LeadId::II);
        assert_eq!(opts.cols, 120);
        assert!(!opts.list);
    }

    #[test]
    fn rhythm_and_lead_go_through_their_parsers() {
        let opts = Options::try_parse_from(["ecg-native", "--rhythm", "AVB3", "--lead", "avf", "--bpm", "40"])
            .expect("valid flags");
        assert_eq!(opts.rhythm, RhythmId::CompleteHeartBlock);
        assert_eq!(opts.lead, LeadId::AVF);
        assert_eq!(opts.bpm, Some(40.0));

        assert!(Options::try_parse_from(["ecg-native", "--rhythm", "vfib"]).is_err());
        assert!(Options::try_parse_from(["ecg-native", "--lead", "V9"]).is_err());
    }
}
