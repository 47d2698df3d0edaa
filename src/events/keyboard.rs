use std::cell::RefCell;
use std::rc::Rc;

use ecg_core::{EcgSimulator, RhythmId};
use wasm_bindgen::JsCast;
use web_sys as web;

use super::keymap::{action_for_key, KeyAction};
use crate::controls;
use crate::overlay;

/// Keys typed into a form control belong to that control.
fn from_form_control(ev: &web::KeyboardEvent) -> bool {
    ev.target().is_some_and(|t| {
        t.dyn_ref::<web::HtmlInputElement>().is_some() || t.dyn_ref::<web::HtmlSelectElement>().is_some()
    })
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, sim: &Rc<RefCell<EcgSimulator>>, document: &web::Document) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() || from_form_control(ev) {
        return;
    }
    let key = ev.key();
    let Some(action) = action_for_key(&key) else {
        return;
    };
    match action {
        KeyAction::TogglePlay => {
            let mut s = sim.borrow_mut();
            if s.is_playing() {
                s.pause();
            } else {
                s.set_looping(true);
                s.play();
            }
            log::info!("[keys] playing={}", s.is_playing());
            ev.prevent_default();
        }
        KeyAction::Reset => {
            sim.borrow_mut().reset();
            log::info!("[keys] reset");
        }
        KeyAction::AdjustHeartRate(step) => {
            let mut s = sim.borrow_mut();
            let target = s.heart_rate() + step;
            s.set_heart_rate(target);
            ev.prevent_default();
        }
        KeyAction::SelectRhythm(index) => {
            if let Some(id) = RhythmId::ALL.get(index) {
                sim.borrow_mut().set_rhythm_id(*id);
            }
        }
        KeyAction::CycleAxis => {
            let mut s = sim.borrow_mut();
            let next = s.axis().mode().next();
            s.set_axis_mode(next);
        }
        KeyAction::ToggleHint => {
            let visible = overlay::toggle_hint(document);
            log::debug!("[keys] hint visible={visible}");
            ev.prevent_default();
            return;
        }
        KeyAction::ToggleMeasure => {
            let mut s = sim.borrow_mut();
            let on = !s.measure_tool().is_enabled();
            s.set_measure_enabled(on);
            return;
        }
    }
    controls::sync_controls(document, &sim.borrow());
}

pub fn wire_global_keydown(sim: Rc<RefCell<EcgSimulator>>, document: web::Document) {
    if let Some(window) = web::window() {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &sim, &document);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
