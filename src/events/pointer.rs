use std::cell::RefCell;
use std::rc::Rc;

use ecg_core::layout::lead_at_point;
use ecg_core::EcgSimulator;
use glam::Vec2;
use wasm_bindgen::JsCast;

use crate::canvas::EcgView;

/// Click position in CSS pixels relative to the canvas.
#[inline]
fn pointer_css_px(ev: &web_sys::MouseEvent, canvas: &web_sys::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

/// Clicking a tile of the 12-lead grid selects that lead for the zoom strip.
pub fn wire_lead_selection(sim: Rc<RefCell<EcgSimulator>>, view: Rc<RefCell<EcgView>>) {
    let canvas = view.borrow().grid_canvas().clone();
    let target = canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web_sys::MouseEvent| {
        let p = pointer_css_px(&ev, &canvas);
        let hit = lead_at_point(view.borrow().viewports(), p);
        if let Some(lead) = hit {
            log::info!("[pointer] selected lead {}", lead);
            sim.borrow_mut().set_selected_lead(lead);
        }
    }) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn add_mouse_listener(
    canvas: &web_sys::HtmlCanvasElement,
    event: &str,
    handler: impl FnMut(web_sys::MouseEvent) + 'static,
) {
    let boxed: Box<dyn FnMut(web_sys::MouseEvent)> = Box::new(handler);
    let closure = wasm_bindgen::closure::Closure::wrap(boxed);
    _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Calipers on the zoomed strip: click places points (shift keeps earlier
/// measurements), moving drags the live end, double click removes one.
pub fn wire_calipers(sim: Rc<RefCell<EcgSimulator>>, view: Rc<RefCell<EcgView>>) {
    let Some(canvas) = view.borrow().zoom_canvas().cloned() else {
        return;
    };

    let (s, v, c) = (sim.clone(), view.clone(), canvas.clone());
    add_mouse_listener(&canvas, "click", move |ev| {
        let baseline = v.borrow().zoom_baseline();
        s.borrow_mut().measure_click(pointer_css_px(&ev, &c), baseline, ev.shift_key());
    });

    let (s, v, c) = (sim.clone(), view.clone(), canvas.clone());
    add_mouse_listener(&canvas, "dblclick", move |ev| {
        let baseline = v.borrow().zoom_baseline();
        if s.borrow_mut().measure_double_click(pointer_css_px(&ev, &c), baseline) {
            log::debug!("[pointer] caliper removed");
            ev.prevent_default();
        }
    });

    let c = canvas.clone();
    add_mouse_listener(&canvas, "mousemove", move |ev| {
        let baseline = view.borrow().zoom_baseline();
        sim.borrow_mut().measure_track(pointer_css_px(&ev, &c), baseline);
    });
}
