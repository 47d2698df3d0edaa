//! DOM control wiring: every handler mutates the shared simulator, and the
//! frame loop redraws on the resulting dirty flag.

use std::cell::RefCell;
use std::rc::Rc;

use ecg_core::{AxisMode, EcgSimulator, Highlights, IntervalHighlights};
use web_sys as web;

use crate::constants::*;
use crate::dom;

type SharedSim = Rc<RefCell<EcgSimulator>>;

#[inline]
fn is_positive(value: &str) -> bool {
    !matches!(value.trim(), "-" | "negative" | "neg")
}

fn read_highlights(document: &web::Document) -> Highlights {
    let on = |key: &str| {
        WAVE_TOGGLE_IDS
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(id, _)| dom::checkbox_checked(document, id))
            .unwrap_or(false)
    };
    Highlights {
        p: on("p"),
        qrs: on("qrs"),
        t: on("t"),
    }
}

fn read_interval_highlights(document: &web::Document) -> IntervalHighlights {
    let on = |key: &str| {
        INTERVAL_TOGGLE_IDS
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(id, _)| dom::checkbox_checked(document, id))
            .unwrap_or(false)
    };
    IntervalHighlights {
        rr: on("rr"),
        pr: on("pr"),
        qrs: on("qrs"),
        qt: on("qt"),
    }
}

/// Fill the rhythm and axis selects when the page ships them empty.
fn populate_selects(document: &web::Document) {
    if let Some(select) = dom::select_by_id(document, RHYTHM_SELECT_ID) {
        if select.length() == 0 {
            for (id, label) in EcgSimulator::rhythm_list() {
                if let Ok(opt) = web::HtmlOptionElement::new_with_text_and_value(label, id) {
                    _ = select.add_with_html_option_element(&opt);
                }
            }
        }
    }
    if let Some(select) = dom::select_by_id(document, AXIS_SELECT_ID) {
        if select.length() == 0 {
            for mode in AxisMode::ALL {
                if let Ok(opt) = web::HtmlOptionElement::new_with_text_and_value(mode.label(), mode.as_str()) {
                    _ = select.add_with_html_option_element(&opt);
                }
            }
        }
    }
}

/// Write simulator state back into the controls.
pub fn sync_controls(document: &web::Document, sim: &EcgSimulator) {
    if let Some(select) = dom::select_by_id(document, RHYTHM_SELECT_ID) {
        select.set_value(sim.rhythm().as_str());
    }
    dom::set_input_value(document, HEART_RATE_INPUT_ID, sim.heart_rate());
    let mode = sim.axis().mode();
    if let Some(select) = dom::select_by_id(document, AXIS_SELECT_ID) {
        select.set_value(mode.as_str());
    }
    let (lead_i, avf) = mode.quadrant();
    for (id, positive) in [(LEAD_I_SIGN_ID, lead_i), (AVF_SIGN_ID, avf)] {
        if let Some(select) = dom::select_by_id(document, id) {
            select.set_value(if positive { "positive" } else { "negative" });
        }
    }
}

pub fn wire_controls(document: &web::Document, sim: &SharedSim) {
    populate_selects(document);

    let s = sim.clone();
    dom::add_change_listener(document, RHYTHM_SELECT_ID, move || {
        let Some(doc) = dom::window_document() else { return };
        if let Some(value) = dom::select_value(&doc, RHYTHM_SELECT_ID) {
            s.borrow_mut().set_rhythm(&value);
            sync_controls(&doc, &s.borrow());
        }
    });

    let s = sim.clone();
    dom::add_change_listener(document, HEART_RATE_INPUT_ID, move || {
        let Some(doc) = dom::window_document() else { return };
        let Some(input) = dom::input_by_id(&doc, HEART_RATE_INPUT_ID) else {
            return;
        };
        let requested = input.value_as_number();
        let applied = s.borrow_mut().set_heart_rate(requested);
        dom::set_input_value(&doc, HEART_RATE_INPUT_ID, applied);
    });

    let s = sim.clone();
    dom::add_change_listener(document, AXIS_SELECT_ID, move || {
        let Some(doc) = dom::window_document() else { return };
        if let Some(value) = dom::select_value(&doc, AXIS_SELECT_ID) {
            let mode = value.parse::<AxisMode>().unwrap_or_default();
            s.borrow_mut().set_axis_mode(mode);
            sync_controls(&doc, &s.borrow());
        }
    });

    for id in [LEAD_I_SIGN_ID, AVF_SIGN_ID] {
        let s = sim.clone();
        dom::add_change_listener(document, id, move || {
            let Some(doc) = dom::window_document() else { return };
            let lead_i = dom::select_value(&doc, LEAD_I_SIGN_ID).map(|v| is_positive(&v)).unwrap_or(true);
            let avf = dom::select_value(&doc, AVF_SIGN_ID).map(|v| is_positive(&v)).unwrap_or(true);
            s.borrow_mut().set_axis_quadrant(lead_i, avf);
            sync_controls(&doc, &s.borrow());
        });
    }

    let s = sim.clone();
    dom::add_change_listener(document, SPEED_SELECT_ID, move || {
        let Some(doc) = dom::window_document() else { return };
        if let Some(speed) = dom::select_value(&doc, SPEED_SELECT_ID).and_then(|v| v.parse::<f64>().ok()) {
            s.borrow_mut().set_paper_speed(speed);
        }
    });

    for (id, _) in WAVE_TOGGLE_IDS {
        let s = sim.clone();
        dom::add_change_listener(document, id, move || {
            if let Some(doc) = dom::window_document() {
                s.borrow_mut().set_highlights(read_highlights(&doc));
            }
        });
    }
    for (id, _) in INTERVAL_TOGGLE_IDS {
        let s = sim.clone();
        dom::add_change_listener(document, id, move || {
            if let Some(doc) = dom::window_document() {
                s.borrow_mut().set_interval_highlights(read_interval_highlights(&doc));
            }
        });
    }

    let s = sim.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        let mut s = s.borrow_mut();
        s.set_looping(true);
        s.play();
    });
    let s = sim.clone();
    dom::add_click_listener(document, PAUSE_BUTTON_ID, move || s.borrow_mut().pause());
    let s = sim.clone();
    dom::add_click_listener(document, RESET_BUTTON_ID, move || s.borrow_mut().reset());

    // Pick up whatever the page pre-checked.
    {
        let mut sim = sim.borrow_mut();
        sim.set_highlights(read_highlights(document));
        sim.set_interval_highlights(read_interval_highlights(document));
    }
    sync_controls(document, &sim.borrow());
}
