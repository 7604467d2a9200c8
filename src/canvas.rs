use crate::error::SkyError;
use crate::sky::surface::{Paint, RadialGradient, Surface, TextAlign};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Surface`] backed by a browser 2d context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, SkyError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(SkyError::ContextUnavailable)?;
        Ok(Self::new(ctx))
    }

    fn style(&self, paint: &Paint) -> JsValue {
        match paint {
            Paint::Solid(color) => JsValue::from_str(&color.css()),
            Paint::Radial(gradient) => self.radial(gradient),
        }
    }

    fn radial(&self, g: &RadialGradient) -> JsValue {
        match self.ctx.create_radial_gradient(g.x0, g.y0, g.r0, g.x1, g.y1, g.r1) {
            Ok(grad) => {
                for stop in &g.stops {
                    let _ = grad.add_color_stop(stop.offset as f32, &stop.color.css());
                }
                grad.into()
            }
            // Degenerate radii; fall back to the outermost tone.
            Err(_) => g
                .stops
                .last()
                .map(|s| JsValue::from_str(&s.color.css()))
                .unwrap_or(JsValue::NULL),
        }
    }

    fn ellipse_path(&self, x: f64, y: f64, rx: f64, ry: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(x, y, rx, ry, 0.0, 0.0, TAU);
    }
}

pub fn find_canvas(canvas_id: &str) -> Result<HtmlCanvasElement, SkyError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(canvas_id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| SkyError::CanvasNotFound(canvas_id.to_string()))
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        self.ctx.set_fill_style(&self.style(paint));
        self.ctx.fill_rect(x, y, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint) {
        self.ctx.set_fill_style(&self.style(paint));
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, paint: &Paint) {
        self.ctx.set_fill_style(&self.style(paint));
        self.ellipse_path(x, y, rx, ry);
        self.ctx.fill();
    }

    fn stroke_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, line_width: f64, paint: &Paint) {
        self.ctx.set_stroke_style(&self.style(paint));
        self.ctx.set_line_width(line_width);
        self.ellipse_path(x, y, rx, ry);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, align: TextAlign, paint: &Paint) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align.css());
        self.ctx.set_fill_style(&self.style(paint));
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        let _ = self.ctx.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        let _ = self.ctx.rotate(angle);
    }
}
