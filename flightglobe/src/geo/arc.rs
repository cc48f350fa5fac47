//! Geodesic flight arcs.
//!
//! An arc is made of two parts joined end to end:
//!
//! 1. A **lift-off curve** leaving the departure point. It is a circular arc
//!    through the source and the first cruise point whose center lies in
//!    the plane that bisects them, found by intersecting that plane with
//!    the line from the source through a point far beyond the globe center.
//!    The curve therefore rises smoothly from the surface.
//! 2. A **cruise arc**: the straight chord from source to target, sampled at
//!    evenly spaced steps and pushed out to the sphere through the target.
//!    Cruise points within [`LIFTOFF_TRIM_ANGLE`] of the source are
//!    discarded, since the lift-off curve covers that stretch.
//!
//! The lift-off curve ends exactly on the first retained cruise point; the
//! shared point is emitted once.

use std::f64::consts::PI;

use super::projection::Point3;

/// Cruise points closer than this angle to the source (seen from the globe
/// center) are replaced by the lift-off curve.
pub const LIFTOFF_TRIM_ANGLE: f64 = PI / 30.0;

/// Scale applied to the source direction to place the far point that fixes
/// the lift-off circle's center line. Negative puts it behind the globe.
pub const ANTIPODAL_SCALE: f64 = -10.0;

/// Default number of samples per arc part.
pub const DEFAULT_ARC_SEGMENTS: usize = 200;

const EPSILON: f64 = 1e-9;

/// Relative distance under which the two parts are considered joined.
const JOINT_TOLERANCE: f64 = 1e-6;

/// One straight piece of an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub start: Point3,
    pub end: Point3,
}

impl ArcSegment {
    /// `[[x, y, z], [x, y, z]]`, the layout line renderers take.
    pub fn to_arrays(&self) -> [[f64; 3]; 2] {
        [
            [self.start.x, self.start.y, self.start.z],
            [self.end.x, self.end.y, self.end.z],
        ]
    }
}

/// Ordered arc points from departure to aircraft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcPath {
    points: Vec<Point3>,
}

impl ArcPath {
    fn single(point: Point3) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Consecutive point pairs. A path of `n` points has `n - 1` segments.
    pub fn segments(&self) -> Vec<ArcSegment> {
        self.points
            .windows(2)
            .map(|pair| ArcSegment {
                start: pair[0],
                end: pair[1],
            })
            .collect()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the arc from `source` to `target` around a globe centered at `center`.
///
/// `segment_count` is the number of samples for each of the two parts; zero
/// is treated as one. A target equal to the source yields a single point and
/// no segments.
pub fn build_arc(source: Point3, target: Point3, center: Point3, segment_count: usize) -> ArcPath {
    let n = segment_count.max(1);

    if (target - source).norm() < EPSILON {
        return ArcPath::single(source);
    }

    let cruise = cruise_points(source, target, center, n);
    let Some(&first_cruise) = cruise.first() else {
        return ArcPath::single(source);
    };

    let chord = first_cruise - source;
    if chord.norm() < EPSILON {
        return ArcPath::single(first_cruise);
    }

    let mut points = liftoff_points(source, chord, center, n);

    let tolerance = JOINT_TOLERANCE * (target - center).norm().max(1.0);
    let shares_joint = points
        .last()
        .is_some_and(|last| (last - first_cruise).norm() <= tolerance);
    points.extend(cruise.into_iter().skip(usize::from(shares_joint)));

    ArcPath { points }
}

/// Cruise arc points with the lift-off stretch trimmed away.
///
/// Never empty unless every sample coincides with the center.
fn cruise_points(source: Point3, target: Point3, center: Point3, n: usize) -> Vec<Point3> {
    let radius = (target - center).norm();
    let source_dir = source - center;

    let sampled: Vec<Point3> = (1..=n)
        .filter_map(|i| {
            let along = source + (target - source) * (i as f64 / n as f64);
            (along - center)
                .try_normalize(EPSILON)
                .map(|dir| center + dir * radius)
        })
        .collect();

    let Some(&last) = sampled.last() else {
        return sampled;
    };

    let angle_from_source = |p: &Point3| angle_between(&(p - center), &source_dir);

    if angle_from_source(&last) < LIFTOFF_TRIM_ANGLE {
        return vec![last];
    }

    let start = sampled
        .iter()
        .position(|p| angle_from_source(p) >= LIFTOFF_TRIM_ANGLE)
        .unwrap_or(0);
    sampled[start..].to_vec()
}

/// Lift-off curve from `source` to `source + chord`, excluding the source.
fn liftoff_points(source: Point3, chord: Point3, center: Point3, n: usize) -> Vec<Point3> {
    let step = |i: usize| source + chord * (i as f64 / n as f64);

    let midpoint = source + chord * 0.5;
    let far_point = center + (source - center) * ANTIPODAL_SCALE;
    let axis = far_point - source;

    let denominator = chord.dot(&axis);
    if denominator.abs() <= EPSILON * chord.norm() * axis.norm() {
        tracing::trace!("Lift-off plane parallel to axis, using straight chord");
        return (1..=n).map(step).collect();
    }

    let on_axis = source + axis * (chord.dot(&(midpoint - source)) / denominator);
    let circle_center = midpoint + (midpoint - on_axis);
    let circle_radius = (circle_center - source).norm();

    (1..=n)
        .filter_map(|i| {
            (step(i) - circle_center)
                .try_normalize(EPSILON)
                .map(|dir| circle_center + dir * circle_radius)
        })
        .collect()
}

/// Angle between two directions; zero if either has no length.
fn angle_between(a: &Point3, b: &Point3) -> f64 {
    let norms = a.norm() * b.norm();
    if norms < EPSILON {
        return 0.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0).acos()
}
