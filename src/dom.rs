use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(document: &web::Document, element_id: &str, handler: impl FnMut() + 'static) {
    add_listener(document, element_id, "click", handler);
}

#[inline]
pub fn add_change_listener(document: &web::Document, element_id: &str, handler: impl FnMut() + 'static) {
    add_listener(document, element_id, "change", handler);
}

fn add_listener(document: &web::Document, element_id: &str, event: &str, mut handler: impl FnMut() + 'static) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::debug!("[dom] no #{element_id}; {event} listener skipped");
    }
}

pub fn html_element_by_id(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

pub fn input_by_id(document: &web::Document, id: &str) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
}

pub fn select_by_id(document: &web::Document, id: &str) -> Option<web::HtmlSelectElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlSelectElement>().ok())
}

pub fn select_value(document: &web::Document, id: &str) -> Option<String> {
    select_by_id(document, id).map(|s| s.value())
}

pub fn checkbox_checked(document: &web::Document, id: &str) -> bool {
    input_by_id(document, id).map(|i| i.checked()).unwrap_or(false)
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> Option<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("get_context failed: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("not a 2d context: {:?}", e))
}

/// Match the backing store to CSS size times devicePixelRatio. Returns the
/// CSS width, which is what the sweep is laid out in.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> f64 {
    let Some(w) = web::window() else {
        return 0.0;
    };
    let dpr = w.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    canvas.set_width(((rect.width() * dpr) as u32).max(1));
    canvas.set_height(((rect.height() * dpr) as u32).max(1));
    rect.width()
}

/// Write a value back into a number input.
pub fn set_input_value(document: &web::Document, id: &str, value: f64) {
    if let Some(input) = input_by_id(document, id) {
        input.set_value(&format!("{value:.0}"));
    }
}
