//! Core clusters: one destructible core plus a random halo of ordinary cells.

use crate::cell::CellCategory;
use crate::grid::{Grid, GridPos};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attempts allowed per requested halo cell.
pub const ATTEMPTS_PER_CELL: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub core: GridPos,
    pub halo_radius: u32,
    pub halo_count: u32,
}

/// Marks `spec.core` alive as [`CellCategory::Core`] and scatters up to
/// `halo_count` ordinary cells in the square of side `2 * halo_radius + 1`
/// around it.
///
/// Sampling stops after `3 * halo_count` attempts, so the halo may come up
/// short. Returns the number of halo cells actually placed; a core outside
/// the grid places nothing.
pub fn place_cluster<R: Rng + ?Sized>(grid: &mut Grid, spec: &ClusterSpec, rng: &mut R) -> u32 {
    let core = spec.core;
    if !grid.in_bounds(core.x, core.y) {
        debug!(core_x = core.x, core_y = core.y, "cluster core off grid");
        return 0;
    }
    grid.set_alive(core.x, core.y, true, CellCategory::Core);

    let r = i32::try_from(spec.halo_radius).unwrap_or(i32::MAX / 2);
    let budget = spec.halo_count.saturating_mul(ATTEMPTS_PER_CELL);
    let mut placed = 0;
    let mut attempts = 0;

    while placed < spec.halo_count && attempts < budget {
        attempts += 1;
        let dx = rng.gen_range(-r..=r);
        let dy = rng.gen_range(-r..=r);
        if dx == 0 && dy == 0 {
            continue;
        }
        let (x, y) = (core.x.saturating_add(dx), core.y.saturating_add(dy));
        if !grid.in_bounds(x, y) || grid.is_alive(x, y) {
            continue;
        }
        grid.set_alive(x, y, true, CellCategory::Ordinary);
        placed += 1;
    }

    if placed < spec.halo_count {
        debug!(
            core_x = core.x,
            core_y = core.y,
            requested = spec.halo_count,
            placed,
            attempts,
            "cluster halo under-filled"
        );
    }
    placed
}

/// Kills the core at (x, y) and every ordinary cell within Euclidean
/// `radius` of it. Walls, other cores and player cells survive.
///
/// Returns how many ordinary cells were cleared. Does nothing unless (x, y)
/// holds a live core.
pub fn destroy_core(grid: &mut Grid, x: i32, y: i32, radius: u32) -> usize {
    let is_core = grid
        .get(x, y)
        .is_some_and(|c| c.alive() && c.category() == CellCategory::Core);
    if !is_core {
        return 0;
    }
    grid.set_alive(x, y, false, CellCategory::Ordinary);

    let r = i32::try_from(radius).unwrap_or(i32::MAX / 2);
    let r2 = i64::from(radius) * i64::from(radius);
    let mut cleared = 0;
    for cy in y.saturating_sub(r).max(0)..=y.saturating_add(r).min(grid.height() - 1) {
        for cx in x.saturating_sub(r).max(0)..=x.saturating_add(r).min(grid.width() - 1) {
            let (dx, dy) = (i64::from(cx - x), i64::from(cy - y));
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let hit = grid
                .get(cx, cy)
                .is_some_and(|c| c.alive() && c.category() == CellCategory::Ordinary);
            if hit {
                grid.set_alive(cx, cy, false, CellCategory::Ordinary);
                cleared += 1;
            }
        }
    }
    cleared
}
