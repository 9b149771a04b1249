//! Occupancy Grid
//!
//! The logical record of locked cells. Cells are integer grid positions, so
//! lookups never hash floats. Cells are only ever added; there is no line
//! clearing.

use std::collections::HashSet;

use glam::IVec3;

#[derive(Clone, Debug, Default)]
pub struct OccupancyGrid {
    cells: HashSet<IVec3>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns `true` if the cell was not already filled.
    pub fn insert(&mut self, cell: IVec3) -> bool {
        self.cells.insert(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether a block could occupy `cells`: all above the floor and all free.
    pub fn accepts(&self, cells: &[IVec3]) -> bool {
        cells.iter().all(|&c| c.y >= 0 && !self.contains(c))
    }

    /// Whether a block at `cells` can descend no further: a cell sits on the
    /// floor or directly on a filled cell.
    pub fn resting(&self, cells: &[IVec3]) -> bool {
        cells
            .iter()
            .any(|&c| c.y <= 0 || self.contains(c + IVec3::NEG_Y))
    }

    /// Fill all `cells`.
    pub fn lock(&mut self, cells: &[IVec3]) {
        self.cells.extend(cells.iter().copied());
    }

    /// Largest z among filled cells, or 0 when that is larger (or the grid is empty).
    pub fn deepest_z(&self) -> i32 {
        self.cells.iter().map(|c| c.z).max().unwrap_or(0).max(0)
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.cells.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_cell_is_contained() {
        let mut grid = OccupancyGrid::new();
        assert!(grid.insert(IVec3::new(1, 2, 3)));
        assert!(grid.contains(IVec3::new(1, 2, 3)));
        assert!(!grid.contains(IVec3::new(1, 2, 4)));
        assert!(!grid.insert(IVec3::new(1, 2, 3)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_accepts_rejects_floor_and_overlap() {
        let mut grid = OccupancyGrid::new();
        grid.insert(IVec3::new(0, 0, 0));
        assert!(grid.accepts(&[IVec3::new(1, 0, 0), IVec3::new(1, 1, 0)]));
        assert!(!grid.accepts(&[IVec3::new(0, 0, 0)]));
        assert!(!grid.accepts(&[IVec3::new(2, -1, 0)]));
    }

    #[test]
    fn test_resting_on_floor_or_stack() {
        let mut grid = OccupancyGrid::new();
        assert!(grid.resting(&[IVec3::new(5, 0, 0)]));
        assert!(!grid.resting(&[IVec3::new(5, 1, 0)]));
        grid.insert(IVec3::new(5, 0, 0));
        assert!(grid.resting(&[IVec3::new(4, 2, 0), IVec3::new(5, 1, 0)]));
    }

    #[test]
    fn test_deepest_z_includes_origin() {
        let mut grid = OccupancyGrid::new();
        assert_eq!(grid.deepest_z(), 0);
        grid.lock(&[IVec3::new(0, 0, -3)]);
        assert_eq!(grid.deepest_z(), 0);
        grid.lock(&[IVec3::new(0, 0, 4), IVec3::new(1, 0, 2)]);
        assert_eq!(grid.deepest_z(), 4);
    }
}
