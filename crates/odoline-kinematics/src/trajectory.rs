//! Append-only history of visited positions.

use core::slice;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::Point2;

/// Ordered positions the robot has occupied, oldest first.
///
/// A trajectory always holds its starting position and only grows: the engine
/// appends one point per accepted step and never removes or reorders points.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: Vec<Point2>,
}

impl Trajectory {
    pub(crate) fn new(start: Point2) -> Self {
        Trajectory { points: vec![start] }
    }

    pub(crate) fn push(&mut self, point: Point2) {
        self.points.push(point);
    }

    /// Number of recorded points, at least one.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All recorded points.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Starting position.
    pub fn first(&self) -> Point2 {
        self.points[0]
    }

    /// Most recent position.
    pub fn last(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Consecutive point pairs, one per drawn trail segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Total length of the polyline through all points.
    pub fn path_length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance_to(b)).sum()
    }

    /// Iterate over the recorded points.
    pub fn iter(&self) -> slice::Iter<'_, Point2> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Point2;
    type IntoIter = slice::Iter<'a, Point2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_starts_with_one_point() {
        let trajectory = Trajectory::new(Point2::new(200.0, 200.0));
        assert_eq!(trajectory.len(), 1);
        assert!(!trajectory.is_empty());
        assert_eq!(trajectory.first(), trajectory.last());
        assert_eq!(trajectory.segments().count(), 0);
        assert_eq!(trajectory.path_length(), 0.0);
    }

    #[test]
    fn test_segments_follow_insertion_order() {
        let mut trajectory = Trajectory::new(Point2::new(0.0, 0.0));
        trajectory.push(Point2::new(3.0, 4.0));
        trajectory.push(Point2::new(3.0, 10.0));

        let segments: Vec<_> = trajectory.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], (Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)));
        assert_eq!(segments[1], (Point2::new(3.0, 4.0), Point2::new(3.0, 10.0)));
        assert_eq!(trajectory.last(), Point2::new(3.0, 10.0));
        assert!((trajectory.path_length() - 11.0).abs() < EPSILON);
    }

    #[test]
    fn test_repeated_points_are_kept() {
        let mut trajectory = Trajectory::new(Point2::new(1.0, 1.0));
        trajectory.push(Point2::new(1.0, 1.0));
        assert_eq!(trajectory.len(), 2);
        assert_eq!((&trajectory).into_iter().count(), 2);
    }
}
