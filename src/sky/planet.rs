use crate::sky::body::Body;
use crate::sky::surface::{stop, ColorStop, Paint, RadialGradient, Rgba, Surface};

/// Concentric ellipse, sized relative to the planet radius.
#[derive(Clone, Copy, Debug)]
pub struct RingBand {
    pub major: f64,
    pub minor: f64,
    pub width: f64,
    pub color: Rgba,
}

/// Outer, middle and inner bands, drawn in that order.
pub const BANDS: [RingBand; 3] = [
    RingBand {
        major: 1.8,
        minor: 0.4,
        width: 0.15,
        color: Rgba::new(225, 200, 180, 0.6),
    },
    RingBand {
        major: 1.5,
        minor: 0.35,
        width: 0.1,
        color: Rgba::new(200, 170, 150, 0.7),
    },
    RingBand {
        major: 1.25,
        minor: 0.3,
        width: 0.08,
        color: Rgba::new(180, 155, 135, 0.5),
    },
];

/// Dark division between the outer and middle bands.
pub const GAP: RingBand = RingBand {
    major: 1.65,
    minor: 0.38,
    width: 0.03,
    color: Rgba::new(150, 130, 110, 0.5),
};

const SPHERE_STOPS: [ColorStop; 5] = [
    stop(0.0, Rgba::hex(0xf0e4c3)),
    stop(0.3, Rgba::hex(0xe6d8b0)),
    stop(0.6, Rgba::hex(0xd9c99e)),
    stop(0.8, Rgba::hex(0xd2bc94)),
    stop(1.0, Rgba::hex(0xc8ac81)),
];

const LIGHT_OFFSET: f64 = 0.3;
const SHADOW_ALPHA: f64 = 0.2;
const SHADOW_TONE: Rgba = Rgba::new(0, 0, 0, 0.3);
const HIGHLIGHT_OFFSET: f64 = 0.4;
const HIGHLIGHT_RADIUS: f64 = 0.15;
const HIGHLIGHT_TONE: Rgba = Rgba::new(255, 255, 255, 0.4);

impl RingBand {
    fn stroke<S: Surface + ?Sized>(&self, surface: &mut S, radius: f64) {
        surface.stroke_ellipse(
            0.0,
            0.0,
            radius * self.major,
            radius * self.minor,
            radius * self.width,
            &Paint::Solid(self.color),
        );
    }
}

/// Draws the planet spun by `angle` with its rings tilted a further `ring_tilt`.
///
/// The sphere gradient is radially symmetric, so spinning it changes nothing
/// visible; only the rings show the rotation. The highlight is painted after
/// the transform is popped and always sits upper-left of center.
pub fn render_planet<S: Surface + ?Sized>(surface: &mut S, body: &Body, angle: f64, ring_tilt: f64) {
    let Body { x, y, radius: r } = *body;

    surface.save();
    surface.translate(x, y);
    surface.rotate(angle);

    let sphere = RadialGradient {
        x0: -r * LIGHT_OFFSET,
        y0: -r * LIGHT_OFFSET,
        r0: 0.0,
        x1: 0.0,
        y1: 0.0,
        r1: r,
        stops: SPHERE_STOPS.to_vec(),
    };
    surface.fill_circle(0.0, 0.0, r, &sphere.into());

    surface.rotate(ring_tilt);
    for band in BANDS.iter() {
        band.stroke(surface, r);
    }
    GAP.stroke(surface, r);

    let outer = &BANDS[0];
    surface.set_global_alpha(SHADOW_ALPHA);
    surface.fill_ellipse(0.0, 0.0, r * outer.major, r * outer.minor, &SHADOW_TONE.into());
    surface.set_global_alpha(1.0);

    surface.restore();

    surface.fill_circle(
        x - r * HIGHLIGHT_OFFSET,
        y - r * HIGHLIGHT_OFFSET,
        r * HIGHLIGHT_RADIUS,
        &HIGHLIGHT_TONE.into(),
    );
}
