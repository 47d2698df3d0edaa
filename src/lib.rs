#![cfg(target_arch = "wasm32")]
//! Browser front-end for the ECG sweep simulator: draws the 12-lead grid and
//! a zoomed rhythm strip to 2D canvases and wires the page controls.

use std::cell::RefCell;
use std::rc::Rc;

use ecg_core::{EcgSimulator, EngineConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod canvas;
mod conduction;
mod constants;
mod controls;
mod dom;
mod events;
mod frame;
mod overlay;

use canvas::EcgView;
use constants::{GRID_CANVAS_ID, ZOOM_CANVAS_ID};

thread_local! {
    static SIMULATOR: RefCell<Option<Rc<RefCell<EcgSimulator>>>> = const { RefCell::new(None) };
}

fn with_simulator<R>(f: impl FnOnce(&Rc<RefCell<EcgSimulator>>) -> R) -> Option<R> {
    SIMULATOR.with(|slot| slot.borrow().as_ref().map(f))
}

fn random_seed_base() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            log::warn!("[init] getrandom failed ({e}); using the default seed");
            EngineConfig::default().seed_base
        }
    }
}

fn wire_canvas_resize(sim: &Rc<RefCell<EcgSimulator>>, view: &Rc<RefCell<EcgView>>) {
    let sim = sim.clone();
    let view = view.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        let width = view.borrow_mut().resize();
        sim.borrow_mut().resize(width);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ecg-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window.document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let grid = dom::canvas_by_id(&document, GRID_CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{GRID_CANVAS_ID}"))?;
    let zoom = dom::canvas_by_id(&document, ZOOM_CANVAS_ID);
    if zoom.is_none() {
        log::info!("[init] no #{ZOOM_CANVAS_ID}; rhythm strip disabled");
    }
    let view = Rc::new(RefCell::new(EcgView::new(grid, zoom)?));

    let config = EngineConfig {
        seed_base: random_seed_base(),
        ..EngineConfig::default()
    };
    let sim = Rc::new(RefCell::new(EcgSimulator::new(config)));
    {
        let width = view.borrow_mut().resize();
        let mut s = sim.borrow_mut();
        s.resize(width);
        s.play();
    }
    SIMULATOR.with(|slot| *slot.borrow_mut() = Some(sim.clone()));

    wire_canvas_resize(&sim, &view);
    controls::wire_controls(&document, &sim);
    events::wire_global_keydown(sim.clone(), document.clone());
    events::wire_lead_selection(sim.clone(), view.clone());
    events::wire_calipers(sim.clone(), view.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(sim, view, document)));
    frame::start_loop(frame_ctx);
    Ok(())
}

/// Sweep once across the canvas and freeze. The promise resolves when the
/// sweep completes or is cancelled by a reset.
#[wasm_bindgen(js_name = ecgRenderOnce)]
pub fn ecg_render_once() -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, _reject| {
        let pending = resolve.clone();
        let started = with_simulator(move |sim| {
            let done: Box<dyn FnOnce()> = Box::new(move || {
                _ = pending.call0(&JsValue::NULL);
            });
            sim.borrow_mut().render_once_and_freeze(Some(done));
        });
        if started.is_none() {
            _ = resolve.call0(&JsValue::NULL);
        }
    })
}

/// Select a rhythm by id; unknown ids fall back to sinus. Returns the id applied.
#[wasm_bindgen(js_name = ecgSetRhythm)]
pub fn ecg_set_rhythm(id: &str) -> Option<String> {
    with_simulator(|sim| sim.borrow_mut().set_rhythm(id).as_str().to_string())
}

/// Returns the heart rate actually applied after clamping.
#[wasm_bindgen(js_name = ecgSetHeartRate)]
pub fn ecg_set_heart_rate(bpm: f64) -> Option<f64> {
    with_simulator(|sim| sim.borrow_mut().set_heart_rate(bpm))
}

#[wasm_bindgen(js_name = ecgSetConductionPhaseOffset)]
pub fn ecg_set_conduction_phase_offset(offset: f64) -> bool {
    with_simulator(|sim| sim.borrow_mut().set_conduction_phase_offset(offset)).unwrap_or(false)
}

/// Voltage of a lead in pixels at `time_ms`.
#[wasm_bindgen(js_name = ecgLeadVoltage)]
pub fn ecg_lead_voltage(time_ms: f64, lead: &str) -> Result<f64, JsValue> {
    with_simulator(|sim| sim.borrow_mut().lead_voltage_by_name(time_ms, lead))
        .ok_or_else(|| JsValue::from_str("simulator not initialised"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
