pub mod body;
pub mod moon;
pub mod planet;
pub mod starfield;
pub mod surface;

use crate::config::SkyConfig;
use crate::error::SkyError;
use body::Body;
use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starfield::Star;
use std::f64::consts::TAU;
use surface::{CommandBuffer, Paint, Rgba, Surface};

/// Everything derived from the viewport size. Rebuilt whole on resize.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyLayout {
    pub width: f64,
    pub height: f64,
    pub stars: Vec<Star>,
    pub moon: Body,
    pub planet: Body,
}

impl SkyLayout {
    /// Returns `None` for a viewport that cannot be drawn into yet.
    pub fn build(rng: &mut ChaCha8Rng, width: f64, height: f64, config: &SkyConfig) -> Option<Self> {
        if !viewport_ready(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            stars: starfield::generate_stars(rng, width, height, config),
            moon: Body::moon(width, height),
            planet: Body::planet(width, height),
        })
    }
}

fn viewport_ready(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// No usable viewport; nothing drawn and rotation left alone.
    Skipped,
}

/// Render state for the night sky: layout, rotation and the star RNG.
pub struct Sky {
    config: SkyConfig,
    rng: ChaCha8Rng,
    layout: Option<SkyLayout>,
    /// Frames rendered so far; the rotation accumulator is derived from this
    /// so it never accumulates float error.
    rotation_steps: u64,
    warned_not_ready: bool,
}

impl Sky {
    pub fn new(seed: u64) -> Self {
        Self::from_valid_config(seed, SkyConfig::default())
    }

    /// Fails if `config` does not pass [`SkyConfig::validate`].
    pub fn with_config(seed: u64, config: SkyConfig) -> Result<Self, SkyError> {
        config.validate()?;
        Ok(Self::from_valid_config(seed, config))
    }

    fn from_valid_config(seed: u64, config: SkyConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            layout: None,
            rotation_steps: 0,
            warned_not_ready: false,
        }
    }

    /// (Re)builds stars and body geometry for a `width` x `height` viewport.
    ///
    /// The previous layout is replaced in one step, so the next frame sees
    /// either the old geometry or the new one, never a mix. A zero or
    /// negative dimension leaves the sky uninitialized until a usable size
    /// arrives.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.layout = SkyLayout::build(&mut self.rng, width, height, &self.config);
        self.warned_not_ready = false;
        match &self.layout {
            Some(layout) => debug!(
                "sky layout {}x{}: {} stars, moon r={:.1}, planet r={:.1}",
                width,
                height,
                layout.stars.len(),
                layout.moon.radius,
                layout.planet.radius
            ),
            None => debug!("viewport {}x{} not ready, layout cleared", width, height),
        }
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    pub fn layout(&self) -> Option<&SkyLayout> {
        self.layout.as_ref()
    }

    /// Monotonic rotation accumulator in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation_steps as f64 * self.config.rotation_step
    }

    /// Rotation folded into `[0, TAU)`, as handed to the planet renderer.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation().rem_euclid(TAU)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.rotation_steps
    }

    /// Composites one frame onto `surface`.
    ///
    /// Order: fade, stars, moon, rotation step, planet, watermark. Scheduling
    /// the next frame is left to the caller.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> FrameOutcome {
        let Some(layout) = self.layout.as_ref() else {
            if !self.warned_not_ready {
                warn!("skipping frames until the sky has a non-empty viewport");
                self.warned_not_ready = true;
            }
            return FrameOutcome::Skipped;
        };

        let fade = Paint::Solid(Rgba::new(0, 0, 0, self.config.fade_alpha));
        surface.fill_rect(0.0, 0.0, layout.width, layout.height, &fade);

        for star in &layout.stars {
            starfield::render_star(surface, star, now_ms, &self.config);
        }

        moon::render_moon(surface, &layout.moon);

        self.rotation_steps += 1;
        let angle = self.rotation_angle();
        planet::render_planet(surface, &layout.planet, angle, self.config.ring_tilt);

        draw_watermark(surface, layout, &self.config);

        FrameOutcome::Rendered
    }

    /// Like [`tick`](Self::tick) but records the frame instead of drawing it.
    pub fn frame(&mut self, now_ms: f64) -> (FrameOutcome, CommandBuffer) {
        let mut buffer = CommandBuffer::new();
        let outcome = self.tick(now_ms, &mut buffer);
        (outcome, buffer)
    }
}

fn draw_watermark<S: Surface + ?Sized>(surface: &mut S, layout: &SkyLayout, config: &SkyConfig) {
    let mark = &config.watermark;
    if mark.text.is_empty() {
        return;
    }
    let [r, g, b, a] = mark.color;
    let color = Rgba::new(channel(r), channel(g), channel(b), a);
    let font = format!("bold {}px {}", layout.width * mark.font_scale, mark.font_family);
    surface.fill_text(
        &mark.text,
        layout.width * mark.x_ratio,
        layout.height * mark.y_ratio,
        &font,
        mark.align,
        &color.into(),
    );
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::surface::{DrawCommand, TextAlign};
    use super::*;
    use crate::config::WatermarkConfig;

    fn first_fill_rect(buffer: &CommandBuffer) -> (f64, f64) {
        match buffer.commands().first() {
            Some(DrawCommand::FillRect { width, height, .. }) => (*width, *height),
            other => panic!("frame should open with the fade, got {other:?}"),
        }
    }

    #[test]
    fn moon_geometry_follows_viewport() {
        let mut sky = Sky::new(1);
        sky.initialize(1000.0, 400.0);
        let moon = sky.layout().expect("layout").moon;
        assert!((moon.radius - 76.0).abs() < 1e-9);
        assert!((moon.x - 150.0).abs() < 1e-9);
        assert!((moon.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_steps_by_fixed_delta_regardless_of_clock() {
        let mut sky = Sky::new(2);
        sky.initialize(320.0, 240.0);
        let step = sky.config().rotation_step;

        let mut previous = sky.rotation();
        // Irregular, even backwards, wall-clock readings.
        for now in [0.0, 5.0, 5000.0, 4999.0, 1.0e9, 16.0] {
            let (outcome, _) = sky.frame(now);
            assert_eq!(outcome, FrameOutcome::Rendered);
            let current = sky.rotation();
            assert!(current >= previous);
            assert!((current - previous - step).abs() < 1e-12);
            previous = current;
        }
        assert_eq!(sky.frames_rendered(), 6);
    }

    #[test]
    fn rotation_angle_is_normalized() {
        let mut sky = Sky::with_config(
            3,
            SkyConfig {
                star_count: 0,
                rotation_step: 1.0,
                ..SkyConfig::default()
            },
        )
        .expect("valid config");
        sky.initialize(10.0, 10.0);
        for _ in 0..20 {
            sky.frame(0.0);
        }
        assert_eq!(sky.rotation(), 20.0);
        let angle = sky.rotation_angle();
        assert!((0.0..TAU).contains(&angle));
        assert!((angle - (20.0 - 3.0 * TAU)).abs() < 1e-9);
    }

    #[test]
    fn resize_replaces_stale_geometry() {
        let mut sky = Sky::new(4);
        sky.initialize(800.0, 600.0);
        let (_, before) = sky.frame(0.0);
        assert_eq!(first_fill_rect(&before), (800.0, 600.0));

        sky.initialize(1600.0, 300.0);
        let layout = sky.layout().expect("layout");
        assert!((layout.moon.radius - 57.0).abs() < 1e-9);
        for star in &layout.stars {
            assert!(star.y < 300.0);
        }

        let (_, after) = sky.frame(0.0);
        assert_eq!(first_fill_rect(&after), (1600.0, 300.0));
        let moon_base = after.commands().iter().find_map(|c| match c {
            DrawCommand::FillCircle {
                radius,
                paint: Paint::Radial(_),
                ..
            } => Some(*radius),
            _ => None,
        });
        assert!((moon_base.expect("moon drawn") - 57.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_viewport_skips_without_drawing() {
        let mut sky = Sky::new(5);
        let (outcome, buffer) = sky.frame(0.0);
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert!(buffer.is_empty());

        for (w, h) in [(0.0, 600.0), (800.0, -1.0), (f64::NAN, 10.0)] {
            sky.initialize(w, h);
            let (outcome, buffer) = sky.frame(0.0);
            assert_eq!(outcome, FrameOutcome::Skipped);
            assert!(buffer.is_empty());
        }
        assert_eq!(sky.rotation(), 0.0);
    }

    #[test]
    fn frame_order_is_fade_stars_moon_planet_watermark() {
        let config = SkyConfig {
            star_count: 3,
            ..SkyConfig::default()
        };
        let mut sky = Sky::with_config(6, config).expect("valid config");
        sky.initialize(500.0, 500.0);
        let (_, buffer) = sky.frame(100.0);
        let cmds = buffer.commands();

        assert!(matches!(cmds[0], DrawCommand::FillRect { .. }));
        for cmd in &cmds[1..4] {
            assert!(matches!(cmd, DrawCommand::FillCircle { paint: Paint::Solid(_), .. }));
        }
        // Moon base gradient comes right after the stars.
        assert!(matches!(cmds[4], DrawCommand::FillCircle { paint: Paint::Radial(_), .. }));
        let save = cmds.iter().position(|c| *c == DrawCommand::Save).expect("planet");
        assert_eq!(save, 4 + 14);
        assert_eq!(
            cmds[save + 2],
            DrawCommand::Rotate {
                angle: sky.rotation_angle()
            }
        );
        match cmds.last() {
            Some(DrawCommand::FillText {
                text, font, align, x, y, ..
            }) => {
                assert_eq!(text, "M");
                assert_eq!(*font, format!("bold {}px Georgia", 500.0 * 0.18));
                assert_eq!(*align, TextAlign::Center);
                assert_eq!((*x, *y), (250.0, 500.0 * 0.28));
            }
            other => panic!("expected watermark last, got {other:?}"),
        }
    }

    #[test]
    fn same_seed_same_frame() {
        let mut a = Sky::new(77);
        let mut b = Sky::new(77);
        a.initialize(640.0, 480.0);
        b.initialize(640.0, 480.0);
        assert_eq!(a.frame(42.0).1, b.frame(42.0).1);
    }

    #[test]
    fn rejects_config_with_empty_star_range() {
        let config = SkyConfig {
            star_radius: [1.0, 1.0],
            ..SkyConfig::default()
        };
        let err = Sky::with_config(1, config).err().expect("empty range rejected");
        assert!(matches!(err, SkyError::InvalidConfig(_)), "{err}");

        let config = SkyConfig {
            star_brightness: [0.9, 0.2],
            ..SkyConfig::default()
        };
        assert!(Sky::with_config(1, config).is_err());
    }

    #[test]
    fn not_ready_warning_fires_once_per_layout() {
        let mut sky = Sky::new(8);
        assert!(!sky.warned_not_ready);
        for _ in 0..3 {
            assert_eq!(sky.frame(0.0).0, FrameOutcome::Skipped);
            assert!(sky.warned_not_ready);
        }

        // A fresh degenerate layout re-arms the warning.
        sky.initialize(0.0, 0.0);
        assert!(!sky.warned_not_ready);
        sky.frame(0.0);
        assert!(sky.warned_not_ready);

        sky.initialize(200.0, 100.0);
        assert!(!sky.warned_not_ready);
        assert_eq!(sky.frame(0.0).0, FrameOutcome::Rendered);
        assert!(!sky.warned_not_ready);
    }

    #[test]
    fn watermark_placement_follows_config() {
        let config = SkyConfig {
            star_count: 0,
            watermark: WatermarkConfig {
                text: "S".to_string(),
                align: TextAlign::Right,
                x_ratio: 0.9,
                ..WatermarkConfig::default()
            },
            ..SkyConfig::default()
        };
        let mut sky = Sky::with_config(9, config).expect("valid config");
        sky.initialize(1000.0, 200.0);
        let (_, buffer) = sky.frame(0.0);
        match buffer.commands().last() {
            Some(DrawCommand::FillText { text, x, align, .. }) => {
                assert_eq!(text, "S");
                assert_eq!(*align, TextAlign::Right);
                assert!((x - 900.0).abs() < 1e-9);
            }
            other => panic!("expected watermark last, got {other:?}"),
        }

        let mut sky = Sky::with_config(
            9,
            SkyConfig {
                watermark: WatermarkConfig {
                    text: String::new(),
                    ..WatermarkConfig::default()
                },
                ..SkyConfig::default()
            },
        )
        .expect("valid config");
        sky.initialize(100.0, 100.0);
        let (_, buffer) = sky.frame(0.0);
        assert!(!buffer
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillText { .. })));
    }
}
