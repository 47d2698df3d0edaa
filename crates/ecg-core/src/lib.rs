//! ECG waveform synthesis and sweep engine.
//!
//! Builds seeded beat schedules for a set of teaching rhythms, projects them
//! onto the twelve standard leads and turns the result into colour-segmented
//! sweep traces for any [`TraceSink`].

pub mod axis;
pub mod clock;
pub mod conduction;
pub mod config;
pub mod constants;
pub mod error;
pub mod fibrillation;
pub mod intervals;
pub mod layout;
pub mod lead;
pub mod measure;
pub mod model;
pub mod rhythm;
pub mod sample;
pub mod schedule;
pub mod seed;
pub mod simulator;
pub mod stemi;
pub mod torsades;
pub mod trace;
pub mod waveform;

pub use axis::{AxisMode, AxisState};
pub use clock::{SimulationClock, SweepGeometry, SweepWindow, TickOutcome};
pub use conduction::ConductionLink;
pub use config::{EngineConfig, LeadSet};
pub use error::EngineError;
pub use intervals::{IntervalBracket, IntervalHighlights, IntervalKind, ReadoutSummary};
pub use lead::LeadId;
pub use measure::{CaliperPoint, CaliperScale, MeasureTool, Measurement};
pub use rhythm::{RhythmId, RhythmPreset};
pub use schedule::{build_schedule, Beat, BeatSchedule};
pub use simulator::EcgSimulator;
pub use trace::{draw_frame, Highlights, SweepFrame, TraceSegment, TraceSink};
pub use waveform::WaveType;
