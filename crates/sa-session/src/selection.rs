//! Ordered set of up to three selected points
//!
//! Index 0 is A, index 1 is the vertex B and index 2 is C.

use glam::Vec3;
use sa_core::{Frame, SurfaceId};
use uuid::Uuid;

/// Maximum number of points in one measurement
pub const CAPACITY: usize = 3;

/// Opaque handle of the marker drawn for a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub Uuid);

impl MarkerHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface a point was placed on, with the frame it was last seen at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub surface: SurfaceId,
    pub frame: Frame,
}

/// A user-selected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedPoint {
    /// World-space position
    pub position: Vec3,
    pub anchor: Option<Anchor>,
    pub marker: MarkerHandle,
}

impl SelectedPoint {
    /// Create a point with a fresh marker handle
    pub fn new(position: Vec3, anchor: Option<Anchor>) -> Self {
        Self {
            position,
            anchor,
            marker: MarkerHandle::new(),
        }
    }
}

/// Completion transitions of the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The third point was added
    Completed,
    /// The set dropped below three points
    Incomplete,
}

/// Selection errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Selection already holds three points")]
    CapacityExceeded,
    #[error("No selected point at index {0}")]
    IndexOutOfRange(usize),
}

#[derive(Debug, Clone, Default)]
pub struct PointSelectionSet {
    points: Vec<SelectedPoint>,
    changes: Vec<SelectionChange>,
}

impl PointSelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point, returning its index.
    pub fn add(&mut self, point: SelectedPoint) -> Result<usize, SelectionError> {
        if self.points.len() >= CAPACITY {
            return Err(SelectionError::CapacityExceeded);
        }
        self.points.push(point);
        if self.points.len() == CAPACITY {
            self.changes.push(SelectionChange::Completed);
        }
        Ok(self.points.len() - 1)
    }

    /// Remove the most recent point. No-op on an empty set.
    pub fn undo_last(&mut self) -> Option<SelectedPoint> {
        let was_complete = self.is_complete();
        let removed = self.points.pop();
        if was_complete {
            self.changes.push(SelectionChange::Incomplete);
        }
        removed
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        if self.is_complete() {
            self.changes.push(SelectionChange::Incomplete);
        }
        self.points.clear();
    }

    /// Move the point at `index`.
    pub fn replace_at(&mut self, index: usize, position: Vec3) -> Result<(), SelectionError> {
        let point = self
            .points
            .get_mut(index)
            .ok_or(SelectionError::IndexOutOfRange(index))?;
        point.position = position;
        Ok(())
    }

    /// Swap the final point for `point`, returning the one it replaced.
    ///
    /// On an empty set this simply adds `point`. Replacing the third point
    /// records `Incomplete` followed by `Completed`.
    pub fn replace_last(&mut self, point: SelectedPoint) -> Option<SelectedPoint> {
        let removed = self.undo_last();
        self.points.push(point);
        if self.points.len() == CAPACITY {
            self.changes.push(SelectionChange::Completed);
        }
        removed
    }

    /// Drain the transitions recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<SelectionChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == CAPACITY
    }

    pub fn get(&self, index: usize) -> Option<&SelectedPoint> {
        self.points.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut SelectedPoint> {
        self.points.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedPoint> {
        self.points.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SelectedPoint> {
        self.points.iter_mut()
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// `[A, B, C]` once all three points are placed
    pub fn measurement(&self) -> Option<[Vec3; 3]> {
        match self.points.as_slice() {
            [a, b, c] => Some([a.position, b.position, c.position]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32) -> SelectedPoint {
        SelectedPoint::new(Vec3::new(x, 0.0, 0.0), None)
    }

    fn full_set() -> PointSelectionSet {
        let mut set = PointSelectionSet::new();
        for i in 0..3 {
            set.add(point(i as f32)).unwrap();
        }
        set
    }

    #[test]
    fn test_add_returns_index() {
        let mut set = PointSelectionSet::new();
        assert_eq!(set.add(point(0.0)), Ok(0));
        assert_eq!(set.add(point(1.0)), Ok(1));
        assert!(set.measurement().is_none());
    }

    #[test]
    fn test_fourth_point_is_rejected() {
        let mut set = full_set();
        assert_eq!(set.add(point(9.0)), Err(SelectionError::CapacityExceeded));
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(2).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_completion_changes() {
        let mut set = full_set();
        assert_eq!(set.take_changes(), vec![SelectionChange::Completed]);
        assert!(set.take_changes().is_empty());

        set.undo_last();
        assert_eq!(set.take_changes(), vec![SelectionChange::Incomplete]);

        // Dropping from two to one is not a transition
        set.undo_last();
        assert!(set.take_changes().is_empty());
    }

    #[test]
    fn test_undo_and_clear_are_idempotent() {
        let mut set = full_set();
        assert!(set.undo_last().is_some());
        assert!(set.undo_last().is_some());
        assert!(set.undo_last().is_some());
        assert!(set.undo_last().is_none());
        assert!(set.is_empty());

        set.clear();
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_clear_complete_set_reports_incomplete() {
        let mut set = full_set();
        set.take_changes();
        set.clear();
        assert_eq!(set.take_changes(), vec![SelectionChange::Incomplete]);
    }

    #[test]
    fn test_replace_at() {
        let mut set = full_set();
        set.replace_at(1, Vec3::ONE).unwrap();
        assert_eq!(set.measurement().unwrap()[1], Vec3::ONE);
        assert_eq!(
            set.replace_at(3, Vec3::ONE),
            Err(SelectionError::IndexOutOfRange(3))
        );
    }

    #[test]
    fn test_replace_last() {
        let mut set = full_set();
        set.take_changes();

        let replacement = point(7.0);
        let old = set.replace_last(replacement).unwrap();
        assert_eq!(old.position.x, 2.0);
        assert_eq!(set.get(2).unwrap().marker, replacement.marker);
        assert_eq!(
            set.take_changes(),
            vec![SelectionChange::Incomplete, SelectionChange::Completed]
        );

        let mut empty = PointSelectionSet::new();
        assert!(empty.replace_last(point(1.0)).is_none());
        assert_eq!(empty.len(), 1);
    }
}
