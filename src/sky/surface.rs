//! Drawing-surface abstraction the renderer paints through.
//!
//! The renderer never touches a canvas directly. It issues primitives against
//! [`Surface`], which the browser backend forwards to a 2d context and
//! [`CommandBuffer`] records for tests and for hosts that rasterize elsewhere.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

pub const fn stop(offset: f64, color: Rgba) -> ColorStop {
    ColorStop { offset, color }
}

/// Two-circle radial gradient, same parameters as canvas `createRadialGradient`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RadialGradient {
    pub x0: f64,
    pub y0: f64,
    pub r0: f64,
    pub x1: f64,
    pub y1: f64,
    pub r1: f64,
    pub stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

impl From<RadialGradient> for Paint {
    fn from(gradient: RadialGradient) -> Self {
        Paint::Radial(gradient)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

pub trait Surface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint);
    fn fill_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, paint: &Paint);
    fn stroke_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, line_width: f64, paint: &Paint);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, align: TextAlign, paint: &Paint);
    fn set_global_alpha(&mut self, alpha: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        paint: Paint,
    },
    FillEllipse {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        paint: Paint,
    },
    StrokeEllipse {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        line_width: f64,
        paint: Paint,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: String,
        align: TextAlign,
        paint: Paint,
    },
    GlobalAlpha {
        alpha: f64,
    },
    Save,
    Restore,
    Translate {
        x: f64,
        y: f64,
    },
    Rotate {
        angle: f64,
    },
}

/// Surface that records every call instead of rasterizing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.commands).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Surface for CommandBuffer {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            x,
            y,
            radius,
            paint: paint.clone(),
        });
    }

    fn fill_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillEllipse {
            x,
            y,
            rx,
            ry,
            paint: paint.clone(),
        });
    }

    fn stroke_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, line_width: f64, paint: &Paint) {
        self.commands.push(DrawCommand::StrokeEllipse {
            x,
            y,
            rx,
            ry,
            line_width,
            paint: paint.clone(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, align: TextAlign, paint: &Paint) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: font.to_string(),
            align,
            paint: paint.clone(),
        });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha { alpha });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DrawCommand::Rotate { angle });
    }
}
