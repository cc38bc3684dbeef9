//! Scratch-card canvas wired to a [`RevealInteraction`].
//!
//! Pointer handlers only record input into a [`PointerInput`]; `tick` (once
//! per animation frame) replays it, so move events are coalesced to the paint
//! cadence.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::config::RevealConfig;
use crate::reveal::{PointerInput, RevealInteraction, RevealMask, RevealOutcome};

use super::dom::{listen, Listener};

const COVER_COLOR: &str = "#CCCCCC";

pub struct ScratchCard {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    interaction: RevealInteraction,
    input: Rc<RefCell<PointerInput>>,
    radius: f64,
    _listeners: Vec<Listener>,
}

/// Client coordinates to canvas pixels, accounting for CSS scaling.
fn to_canvas(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    ((client_x - rect.left()) * sx, (client_y - rect.top()) * sy)
}

fn event_point(canvas: &HtmlCanvasElement, evt: &Event) -> Option<(f64, f64)> {
    if let Some(touch_evt) = evt.dyn_ref::<TouchEvent>() {
        let t = touch_evt.touches().get(0)?;
        return Some(to_canvas(canvas, t.client_x() as f64, t.client_y() as f64));
    }
    let mouse = evt.dyn_ref::<MouseEvent>()?;
    Some(to_canvas(canvas, mouse.client_x() as f64, mouse.client_y() as f64))
}

impl ScratchCard {
    /// Takes over the canvas `#id`, paints the cover and wires mouse/touch input.
    pub fn attach(doc: &Document, id: &str, cfg: &RevealConfig) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = doc
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str("scratch canvas missing"))?
            .dyn_into()?;
        canvas.set_width(cfg.canvas_width);
        canvas.set_height(cfg.canvas_height);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        ctx.set_fill_style_str(COVER_COLOR);
        ctx.fill_rect(0.0, 0.0, cfg.canvas_width as f64, cfg.canvas_height as f64);
        ctx.set_global_composite_operation("destination-out")?;

        let input = Rc::new(RefCell::new(PointerInput::default()));
        let mut listeners = Vec::new();
        for ev in ["mousedown", "touchstart"] {
            let (input, c) = (input.clone(), canvas.clone());
            listeners.push(listen(&canvas, ev, move |evt| {
                input.borrow_mut().press(event_point(&c, &evt));
            })?);
        }
        for ev in ["mousemove", "touchmove"] {
            let (input, c) = (input.clone(), canvas.clone());
            listeners.push(listen(&canvas, ev, move |evt| {
                if evt.is_instance_of::<TouchEvent>() {
                    // keep the page from scrolling while scratching
                    evt.prevent_default();
                }
                input.borrow_mut().moved(event_point(&c, &evt));
            })?);
        }
        for ev in ["mouseup", "mouseleave", "touchend", "touchcancel"] {
            let input = input.clone();
            listeners.push(listen(&canvas, ev, move |_evt| {
                input.borrow_mut().release();
            })?);
        }

        let mask = RevealMask::new(cfg.canvas_width, cfg.canvas_height, cfg.cell_size);
        Ok(Self {
            canvas,
            ctx,
            interaction: RevealInteraction::with_threshold(mask, cfg.threshold),
            input,
            radius: cfg.brush_radius,
            _listeners: listeners,
        })
    }

    /// Applies input gathered since the last frame. Returns `JustRevealed` on
    /// the frame the threshold is crossed.
    pub fn tick(&mut self) -> RevealOutcome {
        let ctx = &self.ctx;
        let radius = self.radius;
        self.input.borrow_mut().drain(&mut self.interaction, radius, |x, y| {
            ctx.begin_path();
            let _ = ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
            ctx.fill();
        })
    }

    /// Wipes what is left of the cover and hides the canvas.
    pub fn clear(&self) {
        self.ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        let _ = self.canvas.set_attribute("hidden", "");
    }
}
