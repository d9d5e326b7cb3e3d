//! Math utilities and types
//!
//! Screen-space conventions: origin at the top-left corner, `x` grows to the
//! right and `y` grows downward. Angles are in degrees.

pub use nalgebra::Vector2;

/// 2D vector type (pixels, or pixels per second for velocities)
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle with half-open extents `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge (inclusive)
    pub left: f32,
    /// Top edge (inclusive)
    pub top: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Create a rectangle centred on `center`
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width * 0.5,
            top: center.y - height * 0.5,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// Overlap test with half-open interval semantics.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Whether `point` lies inside the rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
