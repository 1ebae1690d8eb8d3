//! Planar geometry helpers for the claw and its collision lines
//!
//! Screen coordinates: x grows to the right, y grows downward. Under that
//! convention a positive rotation angle turns points clockwise.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rotate `point` around `pivot` by `angle_degrees`
#[inline]
pub fn rotate_point(point: DVec2, pivot: DVec2, angle_degrees: f64) -> DVec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let rel = point - pivot;

    DVec2::new(
        rel.x * cos - rel.y * sin + pivot.x,
        rel.x * sin + rel.y * cos + pivot.y,
    )
}

/// Shortest distance from `point` to the finite segment `start..end`
///
/// The projection parameter is clamped to [0, 1] so an endpoint is reported
/// as nearest when the projection falls outside the segment. A zero-length
/// segment degrades to point-to-point distance.
pub fn distance_to_line_segment(point: DVec2, start: DVec2, end: DVec2) -> f64 {
    let line_vec = end - start;
    let len_sq = line_vec.length_squared();

    let closest = if len_sq == 0.0 {
        start
    } else {
        let t = (point - start).dot(line_vec) / len_sq;
        if t < 0.0 {
            start
        } else if t > 1.0 {
            end
        } else {
            start + line_vec * t
        }
    };

    (point - closest).length()
}

/// Clamp `value` into `[0, max_value]`
#[inline]
pub fn calculate_boundary(value: f64, max_value: f64) -> f64 {
    if value > max_value {
        max_value
    } else if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// A directed line segment
///
/// Direction matters for collision response: the push-out normal is the
/// direction vector rotated by +90 degrees, so reversing a segment flips the
/// side balls are pushed toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Same segment, opposite direction
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }

    #[inline]
    pub fn distance_to(&self, point: DVec2) -> f64 {
        distance_to_line_segment(point, self.start, self.end)
    }

    /// Unit normal `(-dy, dx) / len`, or `None` for a zero-length segment
    pub fn normal(&self) -> Option<DVec2> {
        let dir = self.end - self.start;
        let len = dir.length();
        if len == 0.0 {
            return None;
        }
        Some(DVec2::new(-dir.y / len, dir.x / len))
    }
}
