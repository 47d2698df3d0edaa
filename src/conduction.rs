//! Forwards heart rate and conduction phase to `window.conductionLab` when
//! the page hosts the 3D conduction view.

use ecg_core::ConductionLink;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const LAB_GLOBAL: &str = "conductionLab";

fn call_lab(method: &str, value: f64) -> bool {
    let Some(window) = web::window() else {
        return false;
    };
    let Ok(lab) = js_sys::Reflect::get(&window, &JsValue::from_str(LAB_GLOBAL)) else {
        return false;
    };
    if lab.is_undefined() || lab.is_null() {
        return false;
    }
    let Some(func) = js_sys::Reflect::get(&lab, &JsValue::from_str(method))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    else {
        return false;
    };
    match func.call1(&lab, &JsValue::from_f64(value)) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("[conduction] {method} failed: {:?}", e);
            false
        }
    }
}

/// Push `link` to the viewer. Returns false when no viewer is present.
pub fn push(link: &ConductionLink) -> bool {
    let rate = call_lab("setHeartRate", link.bpm());
    let phase = call_lab("setConductionPhaseOffset", link.phase_offset());
    rate || phase
}
