//! The hint panel (current rhythm plus shortcuts) and the guardrail
//! advisory banner.

use web_sys as web;

use crate::constants::{ADVISORY_ID, HINT_OVERLAY_ID};
use crate::dom;

/// Show or hide the hint panel. Returns whether it is now visible.
pub fn toggle_hint(document: &web::Document) -> bool {
    let Some(panel) = dom::html_element_by_id(document, HINT_OVERLAY_ID) else {
        return false;
    };
    let visible = panel.hidden();
    panel.set_hidden(!visible);
    visible
}

/// Current rhythm, rate, axis and transport state plus the shortcut legend.
pub fn update_hint(document: &web::Document, rhythm_label: &str, bpm: f64, axis_label: &str, playing: bool) {
    let Some(panel) = dom::html_element_by_id(document, HINT_OVERLAY_ID) else {
        return;
    };
    let state = if playing { "playing" } else { "paused" };
    panel.set_inner_html(&format!(
        "<div class='ecg-hint'>{rhythm_label} \u{2022} {bpm:.0} bpm \u{2022} {axis_label} \u{2022} {state}<br>\
         <small>space play/pause \u{b7} r reset \u{b7} \u{2191}/\u{2193} rate \u{b7} 1\u{2013}9, 0, - rhythm \u{b7} \
         a axis \u{b7} m calipers \u{b7} h hide</small></div>"
    ));
}

/// Show the guardrail advisory, or hide the banner when there is none.
pub fn set_advisory(document: &web::Document, advisory: Option<&str>) {
    let Some(banner) = dom::html_element_by_id(document, ADVISORY_ID) else {
        return;
    };
    match advisory {
        Some(text) => banner.set_text_content(Some(&format!("\u{26a0} {text}"))),
        None => banner.set_text_content(None),
    }
    banner.set_hidden(advisory.is_none());
}
