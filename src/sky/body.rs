/// A rendered celestial sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Body {
    /// Moon sits upper-left.
    pub fn moon(width: f64, height: f64) -> Self {
        Self {
            x: width * 0.15,
            y: height * 0.20,
            radius: width.min(height) * 0.19,
        }
    }

    /// Planet sits right of center, a little below the midline.
    pub fn planet(width: f64, height: f64) -> Self {
        Self {
            x: width * 0.85,
            y: height * 0.55,
            radius: width.min(height) * 0.06,
        }
    }
}
