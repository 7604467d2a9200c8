use crate::sky::body::Body;
use crate::sky::surface::{stop, ColorStop, Paint, RadialGradient, Rgba, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    /// Large, low-contrast plain.
    Mare,
    Crater,
}

/// Surface patch in unit-disc coordinates: `(0.5, 0.5)` is the moon's center.
#[derive(Clone, Copy, Debug)]
pub struct MoonFeature {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub tone: Rgba,
    pub kind: FeatureKind,
}

const fn feature(x: f64, y: f64, radius: f64, level: u8, kind: FeatureKind) -> MoonFeature {
    MoonFeature {
        x,
        y,
        radius,
        tone: Rgba::gray(level),
        kind,
    }
}

// Laid out so no two patches overlap; draw order is irrelevant.
pub const FEATURES: [MoonFeature; 10] = [
    feature(0.30, 0.30, 0.20, 0xb8, FeatureKind::Mare),
    feature(0.60, 0.30, 0.13, 0xba, FeatureKind::Mare),
    feature(0.65, 0.45, 0.12, 0xbc, FeatureKind::Mare),
    feature(0.20, 0.60, 0.20, 0xb6, FeatureKind::Mare),
    feature(0.70, 0.70, 0.10, 0xbe, FeatureKind::Mare),
    feature(0.25, 0.25, 0.070, 0xd0, FeatureKind::Crater),
    feature(0.70, 0.85, 0.09, 0xce, FeatureKind::Crater),
    feature(0.15, 0.20, 0.055, 0xd2, FeatureKind::Crater),
    feature(0.45, 0.15, 0.050, 0xd1, FeatureKind::Crater),
    feature(0.35, 0.50, 0.075, 0xd0, FeatureKind::Crater),
];

const BASE_STOPS: [ColorStop; 4] = [
    stop(0.0, Rgba::gray(0xf2)),
    stop(0.4, Rgba::gray(0xe8)),
    stop(0.75, Rgba::gray(0xdd)),
    stop(1.0, Rgba::gray(0xd3)),
];

const LIGHT_OFFSET: f64 = 0.33;
/// Spread of feature offsets across the disc, slightly under the full diameter.
const FEATURE_SPREAD: f64 = 1.95;
const FEATURE_ALPHA: f64 = 0.85;
const HALO_INNER: f64 = 0.9;
const HALO_OUTER: f64 = 1.1;
const HALO_TONE: Rgba = Rgba::new(240, 240, 240, 0.08);

impl MoonFeature {
    /// Absolute center and radius of this feature on `body`.
    pub fn placement(&self, body: &Body) -> (f64, f64, f64) {
        (
            body.x + (self.x - 0.5) * body.radius * FEATURE_SPREAD,
            body.y + (self.y - 0.5) * body.radius * FEATURE_SPREAD,
            self.radius * body.radius,
        )
    }
}

pub fn render_moon<S: Surface + ?Sized>(surface: &mut S, body: &Body) {
    let Body { x, y, radius: r } = *body;

    let base = RadialGradient {
        x0: x - r * LIGHT_OFFSET,
        y0: y - r * LIGHT_OFFSET,
        r0: 0.0,
        x1: x,
        y1: y,
        r1: r,
        stops: BASE_STOPS.to_vec(),
    };
    surface.fill_circle(x, y, r, &base.into());

    surface.set_global_alpha(FEATURE_ALPHA);
    for feature in FEATURES.iter() {
        let (fx, fy, fr) = feature.placement(body);
        surface.fill_circle(fx, fy, fr, &Paint::Solid(feature.tone));
    }
    surface.set_global_alpha(1.0);

    let halo = RadialGradient {
        x0: x,
        y0: y,
        r0: r * HALO_INNER,
        x1: x,
        y1: y,
        r1: r * HALO_OUTER,
        stops: vec![stop(0.0, HALO_TONE), stop(1.0, HALO_TONE.with_alpha(0.0))],
    };
    surface.fill_circle(x, y, r * HALO_OUTER, &halo.into());
}
