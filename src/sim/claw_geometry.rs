//! Collision lines derived from the claw pose
//!
//! Each arm is a three-segment polyline hanging from the claw pivot. Points
//! are laid out for a closed claw and then rotated about the pivot: right-side
//! points by `-angle`, left-side points by `+angle`, so the arms open
//! symmetrically. The outer guides start one `claw_width` above the pivot and
//! bulge out by the configured outer-arm offset.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, rotate_point};
use super::state::ClawPose;
use crate::config::MachineConfig;

/// Four points forming three consecutive segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPolyline {
    pub start: DVec2,
    pub mid1: DVec2,
    pub mid2: DVec2,
    pub end: DVec2,
}

impl ArmPolyline {
    /// Segments in start-to-end order
    pub fn segments(&self) -> [Segment; 3] {
        [
            Segment::new(self.start, self.mid1),
            Segment::new(self.mid1, self.mid2),
            Segment::new(self.mid2, self.end),
        ]
    }
}

/// The two vertical faces of the divider, each running from the opening
/// height down to the floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerWall {
    /// Play-field side
    pub left: Segment,
    /// Chute side
    pub right: Segment,
}

impl DividerWall {
    pub fn new(config: &MachineConfig) -> Self {
        let right_x = config.width - config.divider_width;
        let left_x = right_x - config.divider_thickness;
        let top = config.divider_height;
        let bottom = config.height;

        Self {
            left: Segment::new(DVec2::new(left_x, top), DVec2::new(left_x, bottom)),
            right: Segment::new(DVec2::new(right_x, top), DVec2::new(right_x, bottom)),
        }
    }

    /// x of the chute-side face; balls at or beyond it are past the gate
    #[inline]
    pub fn gate_x(&self) -> f64 {
        self.right.end.x
    }
}

/// All collision lines for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionGeometry {
    pub left_inner: ArmPolyline,
    pub right_inner: ArmPolyline,
    pub left_outer: ArmPolyline,
    pub right_outer: ArmPolyline,
    pub divider: DividerWall,
}

impl CollisionGeometry {
    /// Build the claw polylines for `pose` plus the static divider
    pub fn build(pose: ClawPose, config: &MachineConfig) -> Self {
        let size = config.claw_size;
        let width = config.claw_width;
        let flare = config.outer_arm_offset();

        let pivot = DVec2::new(pose.x, pose.y);
        let outer_start = DVec2::new(pose.x, pose.y - width);

        // Closed-claw layout relative to the pivot, right side (+x)
        let inner_mid1 = DVec2::new(size, size);
        let inner_mid2 = DVec2::new(size, 2.0 * size);
        let inner_end = DVec2::new(0.0, 3.0 * size);
        let outer_mid1 = DVec2::new(size + width, size - flare);
        let outer_mid2 = DVec2::new(size + width, 2.0 * size + flare);
        let outer_end = DVec2::new(0.0, 3.0 * size + width);

        let right = |offset: DVec2| rotate_point(pivot + offset, pivot, -pose.angle);
        let left = |offset: DVec2| {
            rotate_point(pivot + DVec2::new(-offset.x, offset.y), pivot, pose.angle)
        };

        Self {
            right_inner: ArmPolyline {
                start: pivot,
                mid1: right(inner_mid1),
                mid2: right(inner_mid2),
                end: right(inner_end),
            },
            left_inner: ArmPolyline {
                start: pivot,
                mid1: left(inner_mid1),
                mid2: left(inner_mid2),
                end: left(inner_end),
            },
            right_outer: ArmPolyline {
                start: outer_start,
                mid1: right(outer_mid1),
                mid2: right(outer_mid2),
                end: right(outer_end),
            },
            left_outer: ArmPolyline {
                start: outer_start,
                mid1: left(outer_mid1),
                mid2: left(outer_mid2),
                end: left(outer_end),
            },
            divider: DividerWall::new(config),
        }
    }

    /// The 18 distinct points: shared inner pivot, right inner, left inner,
    /// shared outer start, right outer, left outer, divider (4)
    pub fn points(&self) -> [DVec2; 18] {
        [
            self.right_inner.start,
            self.right_inner.mid1,
            self.right_inner.mid2,
            self.right_inner.end,
            self.left_inner.mid1,
            self.left_inner.mid2,
            self.left_inner.end,
            self.right_outer.start,
            self.right_outer.mid1,
            self.right_outer.mid2,
            self.right_outer.end,
            self.left_outer.mid1,
            self.left_outer.mid2,
            self.left_outer.end,
            self.divider.left.start,
            self.divider.left.end,
            self.divider.right.start,
            self.divider.right.end,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_point(p: DVec2, x: f64, y: f64) -> bool {
        (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9
    }

    fn small_config() -> MachineConfig {
        MachineConfig {
            width: 500.0,
            height: 500.0,
            claw_size: 2.0,
            claw_width: 3.0,
            outer_arm_flare: Some(2.0),
            divider_width: 20.0,
            divider_thickness: 5.0,
            divider_height: 200.0,
            ..MachineConfig::default()
        }
    }

    #[test]
    fn test_closed_claw_points() {
        let pose = ClawPose {
            x: 100.0,
            y: 100.0,
            angle: 0.0,
        };
        let g = CollisionGeometry::build(pose, &small_config());

        assert!(approx_point(g.right_inner.start, 100.0, 100.0));
        assert!(approx_point(g.right_inner.mid1, 102.0, 102.0));
        assert!(approx_point(g.right_inner.mid2, 102.0, 104.0));
        assert!(approx_point(g.right_inner.end, 100.0, 106.0));
        assert!(approx_point(g.left_inner.mid1, 98.0, 102.0));
        assert!(approx_point(g.left_inner.mid2, 98.0, 104.0));
        assert!(approx_point(g.left_inner.end, 100.0, 106.0));

        assert!(approx_point(g.right_outer.start, 100.0, 97.0));
        assert!(approx_point(g.right_outer.mid1, 105.0, 100.0));
        assert!(approx_point(g.right_outer.mid2, 105.0, 106.0));
        assert!(approx_point(g.right_outer.end, 100.0, 109.0));
        assert!(approx_point(g.left_outer.mid1, 95.0, 100.0));
        assert!(approx_point(g.left_outer.mid2, 95.0, 106.0));
        assert!(approx_point(g.left_outer.end, 100.0, 109.0));

        assert!(approx_point(g.divider.left.start, 475.0, 200.0));
        assert!(approx_point(g.divider.left.end, 475.0, 500.0));
        assert!(approx_point(g.divider.right.start, 480.0, 200.0));
        assert!(approx_point(g.divider.right.end, 480.0, 500.0));
        assert_eq!(g.divider.gate_x(), 480.0);
    }

    #[test]
    fn test_open_claw_is_mirror_symmetric() {
        let pose = ClawPose {
            x: 300.0,
            y: 80.0,
            angle: 35.0,
        };
        let g = CollisionGeometry::build(pose, &MachineConfig::default());

        let pairs = [
            (g.right_inner.mid1, g.left_inner.mid1),
            (g.right_inner.end, g.left_inner.end),
            (g.right_outer.mid2, g.left_outer.mid2),
            (g.right_outer.end, g.left_outer.end),
        ];
        for (r, l) in pairs {
            assert!(((r.x - 300.0) + (l.x - 300.0)).abs() < 1e-9);
            assert!((r.y - l.y).abs() < 1e-9);
        }
        // Opening swings the arm tips outward
        assert!(g.right_inner.end.x > 300.0);
        assert!(g.left_inner.end.x < 300.0);
    }

    #[test]
    fn test_divider_ignores_claw_pose() {
        let config = MachineConfig::default();
        let a = CollisionGeometry::build(
            ClawPose {
                x: 100.0,
                y: 40.0,
                angle: 0.0,
            },
            &config,
        );
        let b = CollisionGeometry::build(
            ClawPose {
                x: 400.0,
                y: 300.0,
                angle: 40.0,
            },
            &config,
        );
        assert_eq!(a.divider, b.divider);
    }

    #[test]
    fn test_eighteen_points() {
        let g = CollisionGeometry::build(
            ClawPose {
                x: 200.0,
                y: 40.0,
                angle: 0.0,
            },
            &MachineConfig::default(),
        );
        let points = g.points();
        assert_eq!(points.len(), 18);
        assert!(points.iter().all(|p| p.is_finite()));
    }
}
