//! Stage descriptors and the loader that turns one into grid state.

use crate::cell::CellCategory;
use crate::cluster::{self, ClusterSpec};
use crate::error::StageError;
use crate::grid::{Grid, GridPos, Vec2};
use crate::pattern::{self, PatternPlacement};
use crate::rules::RuleVariant;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{info, warn};

/// Static level geometry. All cells become [`CellCategory::Wall`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WallPrimitive {
    Cell {
        at: GridPos,
    },
    /// Horizontal run starting at `origin`.
    Platform {
        origin: GridPos,
        length: u32,
    },
    /// Hollow rectangle with `origin` as its lowest corner.
    #[serde(rename = "box")]
    Rect {
        origin: GridPos,
        width: u32,
        height: u32,
    },
    /// `steps` treads of `run` cells, each one row above the last
    /// (below, if `descending`).
    Stair {
        origin: GridPos,
        steps: u32,
        run: u32,
        #[serde(default)]
        descending: bool,
    },
}

/// `[lo, lo + len)` intersected with `[0, limit)`.
fn clip(lo: i64, len: i64, limit: i32) -> Range<i32> {
    let start = lo.clamp(0, i64::from(limit));
    let end = lo.saturating_add(len).clamp(start, i64::from(limit));
    // Both ends are within [0, limit] here.
    start as i32..end as i32
}

impl WallPrimitive {
    /// Cells of the primitive that fall inside `grid`. Work is bounded by
    /// the grid size, whatever the primitive's extent.
    pub fn cells(&self, grid: &Grid) -> Vec<GridPos> {
        let (w, h) = (grid.width(), grid.height());
        match *self {
            WallPrimitive::Cell { at } => {
                if grid.in_bounds(at.x, at.y) {
                    vec![at]
                } else {
                    Vec::new()
                }
            }
            WallPrimitive::Platform { origin, length } => {
                if !(0..h).contains(&origin.y) {
                    return Vec::new();
                }
                clip(origin.x.into(), length.into(), w)
                    .map(|x| GridPos::new(x, origin.y))
                    .collect()
            }
            WallPrimitive::Rect {
                origin,
                width,
                height,
            } => {
                let (ox, oy) = (i64::from(origin.x), i64::from(origin.y));
                let (right, top) = (ox + i64::from(width) - 1, oy + i64::from(height) - 1);
                let mut out = Vec::new();
                for y in clip(oy, height.into(), h) {
                    for x in clip(ox, width.into(), w) {
                        let (x64, y64) = (i64::from(x), i64::from(y));
                        if x64 == ox || y64 == oy || x64 == right || y64 == top {
                            out.push(GridPos::new(x, y));
                        }
                    }
                }
                out
            }
            WallPrimitive::Stair {
                origin,
                steps,
                run,
                descending,
            } => {
                let (ox, oy) = (i64::from(origin.x), i64::from(origin.y));
                // Treads whose row lands inside the grid.
                let rows = if descending {
                    oy - i64::from(h) + 1..oy + 1
                } else {
                    -oy..i64::from(h) - oy
                };
                let first = rows.start.max(0);
                let last = rows.end.min(i64::from(steps));
                let mut out = Vec::new();
                for step in first..last {
                    let y = if descending { oy - step } else { oy + step };
                    let x0 = ox.saturating_add(step.saturating_mul(run.into()));
                    for x in clip(x0, run.into(), w) {
                        out.push(GridPos::new(x, y as i32));
                    }
                }
                out
            }
        }
    }
}

/// Everything needed to build one stage. Pure data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rule: RuleVariant,
    pub player_start: GridPos,
    pub goal: GridPos,
    #[serde(default)]
    pub clusters: Vec<ClusterSpec>,
    #[serde(default)]
    pub walls: Vec<WallPrimitive>,
    #[serde(default)]
    pub patterns: Vec<PatternPlacement>,
}

impl StageDescriptor {
    /// Checks the descriptor fits `grid`. Wall primitives are clipped, not
    /// rejected.
    pub fn validate(&self, grid: &Grid) -> Result<(), StageError> {
        for (what, p) in [("player start", self.player_start), ("goal", self.goal)] {
            if !grid.in_bounds(p.x, p.y) {
                return Err(StageError::OutOfBounds { what, x: p.x, y: p.y });
            }
        }
        for (index, c) in self.clusters.iter().enumerate() {
            if c.halo_radius == 0 {
                return Err(StageError::InvalidCluster {
                    index,
                    reason: "halo radius must be positive",
                });
            }
            if !grid.in_bounds(c.core.x, c.core.y) {
                return Err(StageError::InvalidCluster {
                    index,
                    reason: "core is outside the grid",
                });
            }
        }
        Ok(())
    }
}

/// What [`load_stage`] built.
#[derive(Clone, Debug, PartialEq)]
pub struct StageReport {
    pub walls: usize,
    /// Halo cells placed, per cluster, in descriptor order.
    pub halos: Vec<u32>,
    pub rule: RuleVariant,
    pub goal: GridPos,
    pub goal_world: Vec2,
    pub player_world: Vec2,
}

/// Clears `grid` and rebuilds it from `stage`: walls, clusters in order,
/// seed patterns, then the goal coordinate.
///
/// The descriptor is validated first; on error the grid is untouched.
pub fn load_stage<R: Rng + ?Sized>(
    grid: &mut Grid,
    stage: &StageDescriptor,
    rng: &mut R,
) -> Result<StageReport, StageError> {
    stage.validate(grid)?;
    grid.clear();

    let mut walls = 0;
    for prim in &stage.walls {
        for p in prim.cells(grid) {
            grid.set_alive(p.x, p.y, true, CellCategory::Wall);
            walls += 1;
        }
    }

    let halos = stage
        .clusters
        .iter()
        .map(|spec| cluster::place_cluster(grid, spec, rng))
        .collect::<Vec<_>>();

    for placement in &stage.patterns {
        match pattern::find(&placement.name) {
            Some(p) => p.stamp(grid, placement.origin),
            None => warn!(pattern = %placement.name, "unknown pattern skipped"),
        }
    }

    let report = StageReport {
        walls,
        halos,
        rule: stage.rule,
        goal: stage.goal,
        goal_world: grid.grid_to_world(stage.goal.x, stage.goal.y),
        player_world: grid.grid_to_world(stage.player_start.x, stage.player_start.y),
    };
    info!(
        stage = %stage.name,
        rule = %stage.rule,
        walls = report.walls,
        clusters = report.halos.len(),
        population = grid.population(),
        "stage loaded"
    );
    Ok(report)
}
