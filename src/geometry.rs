//! Fundamental planar value types for truss bridge modelling.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Position in the plane of the truss, in length-units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the bridge axis.
    pub x: f64,
    /// Height above the bottom chord.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// Welded I/box section described by its four plate dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Overall section height.
    pub height: f64,
    /// Thickness of each flange.
    pub flange_thickness: f64,
    /// Thickness of the web.
    pub web_thickness: f64,
    /// Width of each flange.
    pub flange_width: f64,
}

impl Section {
    /// Create a [`Section`] from height, flange thickness, web thickness and flange width.
    #[must_use]
    pub const fn new(
        height: f64,
        flange_thickness: f64,
        web_thickness: f64,
        flange_width: f64,
    ) -> Self {
        Self {
            height,
            flange_thickness,
            web_thickness,
            flange_width,
        }
    }

    /// Cross-sectional area: two flanges plus the web between them.
    ///
    /// # Examples
    /// ```
    /// use trussline::section;
    ///
    /// let area = section(1.0, 0.02, 0.01, 0.3).area();
    /// assert!((area - 0.016).abs() < 1.0e-12);
    /// ```
    #[must_use]
    pub fn area(&self) -> f64 {
        2.0 * self.flange_width * self.flange_thickness
            + (self.height - 2.0 * self.flange_width) * self.web_thickness
    }
}

/// In-plane displacement of a node: horizontal `u` and vertical `v`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodalDisplacement {
    /// Displacement along the bridge axis.
    pub u: f64,
    /// Vertical displacement, positive upwards.
    pub v: f64,
}

impl NodalDisplacement {
    /// Create a [`NodalDisplacement`] with explicit components.
    #[must_use]
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use trussline::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Section`] instances.
#[must_use]
pub const fn section(
    height: f64,
    flange_thickness: f64,
    web_thickness: f64,
    flange_width: f64,
) -> Section {
    Section::new(height, flange_thickness, web_thickness, flange_width)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn point_to_vector() {
        let position = point(8.0, 11.0);
        assert_eq!(position, Point::new(8.0, 11.0));
        assert_eq!(position.to_vector(), Vector2::new(8.0, 11.0));
    }

    #[test]
    fn reference_section_area() {
        let section = Section::new(1.0, 0.02, 0.01, 0.3);
        assert_relative_eq!(section.area(), 0.016, epsilon = 1.0e-12);
    }

    #[test]
    fn degenerate_section_has_non_positive_area() {
        let section = Section::new(0.2, 0.0, 0.01, 0.3);
        assert!(section.area() <= 0.0);
    }

    #[test]
    fn displacement_defaults_to_zero() {
        assert_eq!(NodalDisplacement::default(), NodalDisplacement::new(0.0, 0.0));
    }
}
