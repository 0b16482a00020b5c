//! Named seed patterns, stamped relative to an origin.

use crate::cell::CellCategory;
use crate::grid::{Grid, GridPos};
use serde::{Deserialize, Serialize};

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i32, i32)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    // Moves (+1, +1) every 4 generations.
    Pattern {
        name: "glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
];

pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Pattern {
    /// Cell positions when placed at `origin`. Positions past the `i32`
    /// range are dropped.
    pub fn at(&self, origin: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        self.cells
            .iter()
            .filter_map(move |&(dx, dy)| origin.offset(dx, dy))
    }

    /// Sets the pattern's cells alive as Ordinary, clipping at the edge.
    pub fn stamp(&self, grid: &mut Grid, origin: GridPos) {
        for p in self.at(origin) {
            grid.set_alive(p.x, p.y, true, CellCategory::Ordinary);
        }
    }
}

/// A pattern reference inside a stage descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternPlacement {
    pub name: String,
    pub origin: GridPos,
}
