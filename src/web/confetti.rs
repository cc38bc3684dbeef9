//! Celebration burst drawn on a full-screen overlay canvas. Purely visual:
//! the canvas ignores pointer events and removes itself when the last
//! particle leaves the screen.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

const PARTICLES: usize = 100;
const SPREAD_DEG: f64 = 70.0;
const ORIGIN_Y: f64 = 0.6;
const GRAVITY: f64 = 0.0009; // px per ms^2
const COLORS: [&str; 5] = ["#ff6b9d", "#ffd166", "#c77dff", "#4cc9f0", "#ffffff"];

struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    size: f64,
    spin: f64,
    color: &'static str,
}

pub struct Confetti {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    particles: Vec<Particle>,
    last_ms: f64,
}

// xorshift; quality is irrelevant for sparkles
fn next_rand(state: &mut u64) -> f64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    (*state >> 11) as f64 / (1u64 << 53) as f64
}

impl Confetti {
    pub fn burst(doc: &Document, now: f64) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        let win = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let w = win.inner_width()?.as_f64().unwrap_or(800.0);
        let h = win.inner_height()?.as_f64().unwrap_or(600.0);
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        canvas
            .set_attribute("style", "position:fixed; inset:0; pointer-events:none; z-index:90;")
            .ok();
        doc.body().ok_or_else(|| JsValue::from_str("no body"))?.append_child(&canvas)?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let mut seed = (now as u64) | 1;
        let particles = (0..PARTICLES)
            .map(|i| {
                let angle = (-90.0 + (next_rand(&mut seed) - 0.5) * SPREAD_DEG).to_radians();
                let speed = 0.45 + next_rand(&mut seed) * 0.5; // px per ms
                Particle {
                    x: w / 2.0,
                    y: h * ORIGIN_Y,
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    size: 5.0 + next_rand(&mut seed) * 5.0,
                    spin: next_rand(&mut seed) * std::f64::consts::TAU,
                    color: COLORS[i % COLORS.len()],
                }
            })
            .collect();
        Ok(Self { canvas, ctx, particles, last_ms: now })
    }

    /// Advances and draws one frame. Returns false once every particle is gone.
    pub fn tick(&mut self, now: f64) -> bool {
        let dt = (now - self.last_ms).clamp(0.0, 50.0);
        self.last_ms = now;
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.particles.retain_mut(|p| {
            p.vy += GRAVITY * dt;
            p.vx *= 0.995;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.spin += dt * 0.01;
            p.y < h + 20.0
        });
        for p in &self.particles {
            self.ctx.set_fill_style_str(p.color);
            let squash = p.spin.cos().abs().max(0.2);
            self.ctx.fill_rect(p.x, p.y, p.size, p.size * squash);
        }
        !self.particles.is_empty()
    }
}

impl Drop for Confetti {
    fn drop(&mut self) {
        self.canvas.remove();
    }
}
