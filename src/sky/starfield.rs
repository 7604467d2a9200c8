use crate::config::SkyConfig;
use crate::sky::surface::{Paint, Rgba, Surface};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Base brightness before twinkle.
    pub brightness: f64,
}

/// Scatters `config.star_count` stars uniformly over a `width` x `height` viewport.
pub fn generate_stars<R: Rng + ?Sized>(
    rng: &mut R,
    width: f64,
    height: f64,
    config: &SkyConfig,
) -> Vec<Star> {
    let [r_min, r_max] = config.star_radius;
    let [b_min, b_max] = config.star_brightness;

    (0..config.star_count)
        .map(|_| Star {
            x: rng.gen_range(0.0..width),
            y: rng.gen_range(0.0..height),
            radius: rng.gen_range(r_min..r_max),
            brightness: rng.gen_range(b_min..b_max),
        })
        .collect()
}

/// Brightness multiplier in `[0.2, 1.0]`, phased by horizontal position.
pub fn twinkle(now_ms: f64, x: f64, config: &SkyConfig) -> f64 {
    (now_ms * config.twinkle_rate + x * config.twinkle_phase).sin() * 0.4 + 0.6
}

pub fn render_star<S: Surface + ?Sized>(surface: &mut S, star: &Star, now_ms: f64, config: &SkyConfig) {
    let alpha = star.brightness * twinkle(now_ms, star.x, config);
    let paint = Paint::Solid(Rgba::new(255, 255, 255, alpha));
    surface.fill_circle(star.x, star.y, star.radius, &paint);
}
