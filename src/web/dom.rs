//! Small DOM helpers shared by the views.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::Action;

pub type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Event handlers only enqueue; the frame loop applies actions. Handlers
/// therefore never mutate (or drop) the view that owns them.
pub type ActionQueue = Rc<RefCell<Vec<Action>>>;

pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

pub fn listen(target: &Element, event: &str, handler: impl FnMut(web_sys::Event) + 'static) -> Result<Listener, JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

/// Click on `#id` enqueues `action`. Missing elements are skipped.
pub fn on_click(doc: &Document, id: &str, queue: &ActionQueue, action: Action) -> Result<Option<Listener>, JsValue> {
    let Some(el) = doc.get_element_by_id(id) else {
        return Ok(None);
    };
    let q = queue.clone();
    listen(&el, "click", move |_evt| q.borrow_mut().push(action)).map(Some)
}
