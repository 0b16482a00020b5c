//! Dense bounded grid of cells.

use crate::cell::{Cell, CellCategory};
use crate::error::GridError;
use crate::rules::{self, RuleVariant};
use serde::{Deserialize, Serialize};

/// Integer grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `None` when the result does not fit in `i32`.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// World-space point. The grid is centered on the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, o: Vec2) -> f32 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Changes committed by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates every cell dead and [`CellCategory::Ordinary`].
    pub fn new(width: u32, height: u32, cell_size: f32) -> Result<Self, GridError> {
        let dims = GridError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(dims);
        }
        let w = i32::try_from(width).map_err(|_| dims.clone())?;
        let h = i32::try_from(height).map_err(|_| dims.clone())?;
        w.checked_mul(h).ok_or(dims)?;
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }

        let mut cells = Vec::with_capacity((w as usize) * (h as usize));
        for y in 0..h {
            for x in 0..w {
                cells.push(Cell::new(x, y));
            }
        }
        Ok(Self {
            width: w,
            height: h,
            cell_size,
            cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y as usize) * (self.width as usize) + x as usize)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.idx(x, y).map(|i| &self.cells[i])
    }

    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Cell::alive)
    }

    /// No-op outside the grid.
    pub fn set_alive(&mut self, x: i32, y: i32, alive: bool, category: CellCategory) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i].set(alive, category);
        }
    }

    /// Live cells in the Moore neighborhood. The edge is open: cells past it
    /// count as dead.
    pub fn count_live_neighbors(&self, x: i32, y: i32) -> u8 {
        let mut n = 0u8;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                if self.is_alive(nx, ny) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Center of cell (x, y) in world space.
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec2 {
        let s = self.cell_size;
        let ox = -(self.width as f32 * s) / 2.0 + s / 2.0;
        let oy = -(self.height as f32 * s) / 2.0 + s / 2.0;
        Vec2::new(x as f32 * s + ox, y as f32 * s + oy)
    }

    /// Cell containing a world point. May be out of bounds.
    pub fn world_to_grid(&self, p: Vec2) -> GridPos {
        let s = self.cell_size;
        let ox = (self.width as f32 * s) / 2.0;
        let oy = (self.height as f32 * s) / 2.0;
        GridPos::new(
            ((p.x + ox) / s).floor() as i32,
            ((p.y + oy) / s).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.set(false, CellCategory::Ordinary);
        }
    }

    /// Row-major iteration, y outer.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.alive()).count()
    }

    pub fn count_category(&self, category: CellCategory) -> usize {
        self.cells
            .iter()
            .filter(|c| c.alive() && c.category() == category)
            .count()
    }

    /// Compute phase: stage every cell's next state from the current one.
    /// Reads `alive` only, writes only the pending fields.
    pub(crate) fn stage_next(&mut self, variant: RuleVariant) {
        for i in 0..self.cells.len() {
            let (x, y) = (self.cells[i].x(), self.cells[i].y());
            let n = self.count_live_neighbors(x, y);
            let cell = &mut self.cells[i];
            let t = rules::evaluate(variant, cell.category, cell.alive, n);
            cell.pending_alive = t.next_alive;
            cell.pending_category = t.born;
        }
    }

    /// Commit phase: `alive := pending_alive` everywhere.
    pub(crate) fn commit(&mut self) -> CommitStats {
        let mut stats = CommitStats::default();
        for cell in &mut self.cells {
            match (cell.alive, cell.pending_alive) {
                (false, true) => stats.births += 1,
                (true, false) => stats.deaths += 1,
                _ => {}
            }
            cell.apply_pending();
            if cell.alive {
                stats.population += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_geometry() {
        assert_eq!(
            Grid::new(0, 4, 1.0).unwrap_err(),
            GridError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
        assert!(Grid::new(u32::MAX, 2, 1.0).is_err());
        assert_eq!(
            Grid::new(4, 4, 0.0).unwrap_err(),
            GridError::InvalidCellSize(0.0)
        );
        assert!(Grid::new(4, 4, f32::NAN).is_err());
    }

    #[test]
    fn cells_know_their_coordinates() {
        let grid = Grid::new(7, 3, 1.0).unwrap();
        for y in 0..3 {
            for x in 0..7 {
                let cell = grid.get(x, y).unwrap();
                assert_eq!((cell.x(), cell.y()), (x, y));
                assert!(!cell.alive());
                assert_eq!(cell.category(), CellCategory::Ordinary);
            }
        }
        assert_eq!(grid.cells().count(), 21);
    }

    #[test]
    fn out_of_bounds_is_absent_and_ignored() {
        let mut grid = Grid::new(5, 5, 1.0).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 5), (i32::MIN, i32::MAX)] {
            assert!(!grid.in_bounds(x, y));
            assert!(grid.get(x, y).is_none());
            grid.set_alive(x, y, true, CellCategory::Wall);
        }
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn neighbor_count_excludes_self_and_edges() {
        let mut grid = Grid::new(3, 3, 1.0).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                grid.set_alive(x, y, true, CellCategory::Ordinary);
            }
        }
        assert_eq!(grid.count_live_neighbors(1, 1), 8);
        assert_eq!(grid.count_live_neighbors(0, 0), 3);
        assert_eq!(grid.count_live_neighbors(1, 0), 5);
        assert_eq!(grid.count_live_neighbors(-1, -1), 1);
        assert_eq!(grid.count_live_neighbors(0, 0), 3);
    }

    #[test]
    fn neighbor_count_at_i32_limits_is_zero() {
        let mut grid = Grid::new(4, 4, 1.0).unwrap();
        grid.set_alive(0, 0, true, CellCategory::Ordinary);
        assert_eq!(grid.count_live_neighbors(i32::MAX, 0), 0);
        assert_eq!(grid.count_live_neighbors(0, i32::MIN), 0);
        assert_eq!(grid.count_live_neighbors(i32::MIN, i32::MAX), 0);
    }

    #[test]
    fn offset_overflow_is_none() {
        assert_eq!(GridPos::new(i32::MAX, 0).offset(1, 0), None);
        assert_eq!(GridPos::new(0, i32::MIN).offset(0, -1), None);
        assert_eq!(GridPos::new(1, 2).offset(-1, 3), Some(GridPos::new(0, 5)));
    }

    #[test]
    fn world_transform_is_centered() {
        let grid = Grid::new(4, 2, 2.0).unwrap();
        assert_eq!(grid.grid_to_world(0, 0), Vec2::new(-3.0, -1.0));
        assert_eq!(grid.grid_to_world(3, 1), Vec2::new(3.0, 1.0));
        for y in 0..2 {
            for x in 0..4 {
                let p = grid.grid_to_world(x, y);
                assert_eq!(grid.world_to_grid(p), GridPos::new(x, y));
            }
        }
        assert_eq!(grid.world_to_grid(Vec2::new(-4.5, 0.0)), GridPos::new(-1, 1));
        assert_eq!(grid.world_to_grid(Vec2::new(-0.01, -0.01)), GridPos::new(1, 0));
    }

    #[test]
    fn clear_resets_category() {
        let mut grid = Grid::new(4, 4, 1.0).unwrap();
        grid.set_alive(1, 1, true, CellCategory::Wall);
        grid.set_alive(2, 2, true, CellCategory::Core);
        grid.clear();
        assert!(grid.cells().all(|c| !c.alive() && c.category() == CellCategory::Ordinary));
    }

    #[test]
    fn staging_leaves_current_state_untouched() {
        let mut grid = Grid::new(5, 5, 1.0).unwrap();
        for x in 1..=3 {
            grid.set_alive(x, 2, true, CellCategory::Ordinary);
        }
        grid.stage_next(RuleVariant::ConwayLife);
        assert_eq!(grid.population(), 3);
        assert!(grid.get(2, 1).unwrap().pending_alive());
        assert!(!grid.get(1, 2).unwrap().pending_alive());

        let stats = grid.commit();
        assert_eq!(stats, CommitStats { births: 2, deaths: 2, population: 3 });
        assert!(grid.is_alive(2, 1) && grid.is_alive(2, 2) && grid.is_alive(2, 3));
    }
}
