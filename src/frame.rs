use std::cell::RefCell;
use std::rc::Rc;

use ecg_core::{ConductionLink, EcgSimulator};
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::canvas::EcgView;
use crate::conduction;
use crate::overlay;

pub struct FrameContext {
    pub sim: Rc<RefCell<EcgSimulator>>,
    pub view: Rc<RefCell<EcgView>>,
    pub document: web::Document,
    pub epoch: Instant,
    pub last_link: Option<ConductionLink>,
    pub drawn_once: bool,
}

impl FrameContext {
    pub fn new(sim: Rc<RefCell<EcgSimulator>>, view: Rc<RefCell<EcgView>>, document: web::Document) -> Self {
        Self {
            sim,
            view,
            document,
            epoch: Instant::now(),
            last_link: None,
            drawn_once: false,
        }
    }

    pub fn frame(&mut self) {
        let now_ms = self.epoch.elapsed().as_secs_f64() * 1000.0;
        let mut sim = self.sim.borrow_mut();
        let outcome = sim.tick(now_ms);
        let dirty = sim.take_dirty();

        if dirty {
            let preset = sim.preset();
            overlay::update_hint(
                &self.document,
                preset.label,
                sim.heart_rate(),
                sim.axis().mode().label(),
                sim.is_playing(),
            );
            overlay::set_advisory(&self.document, sim.schedule().advisory.as_deref());
        }

        if outcome.advanced || dirty || !self.drawn_once {
            self.view.borrow().draw(&mut sim);
            self.drawn_once = true;
        }

        let link = sim.conduction();
        drop(sim);
        if self.last_link != Some(link) {
            if conduction::push(&link) {
                log::debug!("[conduction] {:.0} bpm, phase {:.3}", link.bpm(), link.phase_offset());
            }
            self.last_link = Some(link);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
