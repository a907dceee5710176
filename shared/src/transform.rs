//! Screen transforms and pointer-to-angle conversion
//!
//! The rendering surface may be panned, zoomed or flipped relative to the
//! window. Pointer positions arrive in screen space and are mapped back into
//! surface space through the inverse of the surface's current transform before
//! any angle is measured.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_angle, Point};

/// A 2D affine transform in SVG matrix form `[a b c d e f]`:
///
/// ```text
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(dx: f64, dy: f64) -> Self {
        Self {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Transform that applies `self` first and `next` afterwards
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Affine {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }
}

/// Face angle under a pointer.
///
/// `ctm` maps surface coordinates to screen coordinates. A missing or singular
/// transform yields 0 rather than an error.
pub fn pointer_angle(screen: Point, ctm: Option<&Affine>, center: Point) -> f64 {
    let Some(inverse) = ctm.and_then(Affine::inverse) else {
        debug!("no usable surface transform, pointer angle defaults to 0");
        return 0.0;
    };
    let local = inverse.apply(screen);
    let dx = local.x - center.x;
    let dy = local.y - center.y;
    let mut angle = dy.atan2(dx).to_degrees() + 90.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    normalize_angle(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_inverse_round_trips() {
        let ctm = Affine::translate(-200.0, -200.0)
            .then(&Affine::scale(1.5, -1.5))
            .then(&Affine::translate(40.0, -12.0));
        let inverse = ctm.inverse().unwrap();
        let p = Point::new(13.0, 271.0);
        let back = inverse.apply(ctm.apply(p));
        assert!(close(back.x, p.x));
        assert!(close(back.y, p.y));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_pointer_angle_identity() {
        let center = Point::new(100.0, 100.0);
        let ctm = Affine::IDENTITY;
        assert!(close(pointer_angle(Point::new(100.0, 0.0), Some(&ctm), center), 0.0));
        assert!(close(pointer_angle(Point::new(200.0, 100.0), Some(&ctm), center), 90.0));
        assert!(close(pointer_angle(Point::new(100.0, 200.0), Some(&ctm), center), 180.0));
        assert!(close(pointer_angle(Point::new(0.0, 100.0), Some(&ctm), center), 270.0));
    }

    #[test]
    fn test_pointer_angle_through_pan_and_flip() {
        // Surface drawn zoomed 2x, y flipped and panned, as a y-up window would
        let center = Point::new(100.0, 100.0);
        let ctm = Affine::translate(-100.0, -100.0)
            .then(&Affine::scale(2.0, -2.0))
            .then(&Affine::translate(30.0, 10.0));
        // Screen point to the right of the projected center
        let screen = ctm.apply(Point::new(150.0, 100.0));
        assert!(close(pointer_angle(screen, Some(&ctm), center), 90.0));
        // Screen point above the projected center is the top of the face
        let screen = Point::new(30.0, 80.0);
        assert!(close(pointer_angle(screen, Some(&ctm), center), 0.0));
    }

    #[test]
    fn test_pointer_angle_fails_soft() {
        let center = Point::new(0.0, 0.0);
        assert_eq!(pointer_angle(Point::new(5.0, 5.0), None, center), 0.0);
        let singular = Affine::scale(0.0, 0.0);
        assert_eq!(pointer_angle(Point::new(5.0, 5.0), Some(&singular), center), 0.0);
    }
}
