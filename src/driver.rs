//! Tick driver: owns the grid, the campaign and the stage lifecycle.

use crate::cell::CellCategory;
use crate::cluster;
use crate::error::{GridError, StageError};
use crate::grid::{Grid, GridPos, Vec2};
use crate::rules::RuleVariant;
use crate::stage::{self, StageDescriptor, StageReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub cell_size: f32,
    pub tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    /// Interval multiplier applied after every tick. 1.0 keeps it fixed.
    pub tick_acceleration: f32,
    pub seed: u64,
    /// Radius cleared around a core hit by [`TickDriver::strike`].
    pub chain_radius: u32,
    pub damage_radius: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            cell_size: 1.0,
            tick_interval_ms: 1000,
            min_tick_interval_ms: 500,
            tick_acceleration: 0.95,
            seed: 0xC0FFEE_u64,
            chain_radius: 10,
            damage_radius: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// No stage loaded; the grid is not exposed.
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Ticks since the stage was loaded, including this one.
    pub tick: u64,
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    Miss,
    /// A single non-core cell was erased.
    Cell(GridPos),
    /// A core fell and took `cleared` ordinary cells with it.
    Core { at: GridPos, cleared: usize },
}

struct ActiveStage {
    index: Option<usize>,
    descriptor: StageDescriptor,
    report: StageReport,
    variant: RuleVariant,
}

pub struct TickDriver<R = StdRng> {
    config: EngineConfig,
    grid: Grid,
    stages: Vec<StageDescriptor>,
    active: Option<ActiveStage>,
    paused: bool,
    interval: Duration,
    accum: Duration,
    ticks: u64,
    rng: R,
}

impl TickDriver<StdRng> {
    /// Driver seeded from `config.seed`.
    pub fn new(config: EngineConfig) -> Result<Self, GridError> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> TickDriver<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, GridError> {
        let grid = Grid::new(config.width, config.height, config.cell_size)?;
        let interval = Duration::from_millis(config.tick_interval_ms);
        Ok(Self {
            config,
            grid,
            stages: Vec::new(),
            active: None,
            paused: false,
            interval,
            accum: Duration::ZERO,
            ticks: 0,
            rng,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        match (&self.active, self.paused) {
            (None, _) => DriverState::Idle,
            (Some(_), false) => DriverState::Running,
            (Some(_), true) => DriverState::Paused,
        }
    }

    /// `None` until a stage has been loaded.
    pub fn grid(&self) -> Option<&Grid> {
        self.active.as_ref().map(|_| &self.grid)
    }

    pub fn set_stages(&mut self, stages: Vec<StageDescriptor>) {
        self.stages = stages;
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Campaign index of the active stage. `None` when idle or when the
    /// stage was loaded directly.
    pub fn stage_index(&self) -> Option<usize> {
        self.active.as_ref().and_then(|a| a.index)
    }

    pub fn stage(&self) -> Option<&StageDescriptor> {
        self.active.as_ref().map(|a| &a.descriptor)
    }

    pub fn report(&self) -> Option<&StageReport> {
        self.active.as_ref().map(|a| &a.report)
    }

    pub fn variant(&self) -> Option<RuleVariant> {
        self.active.as_ref().map(|a| a.variant)
    }

    /// Current tick interval, after any acceleration.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Loads campaign stage `index`. An unknown index is logged and the
    /// active stage is kept.
    pub fn select_stage(&mut self, index: usize) -> Result<&StageReport, StageError> {
        let Some(descriptor) = self.stages.get(index).cloned() else {
            let err = StageError::UnknownStage {
                index,
                count: self.stages.len(),
            };
            warn!(%err, "stage request dropped");
            return Err(err);
        };
        self.install(Some(index), descriptor)
    }

    /// Loads a descriptor that is not part of the campaign.
    pub fn load(&mut self, descriptor: StageDescriptor) -> Result<&StageReport, StageError> {
        self.install(None, descriptor)
    }

    /// Advances to the following campaign stage, wrapping at the end.
    pub fn next_stage(&mut self) -> Result<&StageReport, StageError> {
        let next = self.stage_index().map_or(0, |i| i + 1);
        let count = self.stages.len().max(1);
        self.select_stage(next % count)
    }

    pub fn prev_stage(&mut self) -> Result<&StageReport, StageError> {
        let count = self.stages.len().max(1);
        let prev = self.stage_index().map_or(0, |i| (i + count - 1) % count);
        self.select_stage(prev)
    }

    /// Rebuilds the active stage from its descriptor.
    pub fn reload(&mut self) -> Result<&StageReport, StageError> {
        let Some(active) = self.active.as_ref() else {
            warn!("reload requested with no active stage");
            return Err(StageError::NoActiveStage);
        };
        let (index, descriptor) = (active.index, active.descriptor.clone());
        self.install(index, descriptor)
    }

    fn install(
        &mut self,
        index: Option<usize>,
        descriptor: StageDescriptor,
    ) -> Result<&StageReport, StageError> {
        let report = match stage::load_stage(&mut self.grid, &descriptor, &mut self.rng) {
            Ok(report) => report,
            Err(err) => {
                warn!(%err, stage = %descriptor.name, "stage request dropped");
                return Err(err);
            }
        };
        self.interval = Duration::from_millis(self.config.tick_interval_ms);
        self.accum = Duration::ZERO;
        self.ticks = 0;
        self.paused = false;
        let active = self.active.insert(ActiveStage {
            index,
            variant: descriptor.rule,
            descriptor,
            report,
        });
        Ok(&active.report)
    }

    pub fn set_variant(&mut self, variant: RuleVariant) -> Result<(), StageError> {
        let Some(active) = self.active.as_mut() else {
            warn!(rule = %variant, "rule change dropped: no active stage");
            return Err(StageError::NoActiveStage);
        };
        active.variant = variant;
        Ok(())
    }

    /// Like [`Self::set_variant`], from a name or rulestring.
    pub fn set_variant_named(&mut self, name: &str) -> Result<(), StageError> {
        match name.parse::<RuleVariant>() {
            Ok(v) => self.set_variant(v),
            Err(err) => {
                warn!(%err, "rule change dropped");
                Err(err)
            }
        }
    }

    pub fn pause(&mut self) {
        if self.active.is_some() {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Feeds host time. Fires at most one tick, once the accumulated time
    /// reaches the interval; the accumulator then restarts from zero.
    pub fn advance(&mut self, dt: Duration) -> Option<TickReport> {
        if self.state() != DriverState::Running {
            return None;
        }
        self.accum = self.accum.saturating_add(dt);
        if self.accum < self.interval {
            return None;
        }
        self.accum = Duration::ZERO;
        let report = self.tick();
        self.accelerate();
        Some(report)
    }

    /// Forces one tick now, even while paused.
    pub fn step(&mut self) -> Option<TickReport> {
        if self.active.is_none() {
            return None;
        }
        Some(self.tick())
    }

    fn tick(&mut self) -> TickReport {
        let variant = self.variant().unwrap_or_default();
        self.grid.stage_next(variant);
        let stats = self.grid.commit();
        self.ticks += 1;
        TickReport {
            tick: self.ticks,
            births: stats.births,
            deaths: stats.deaths,
            population: stats.population,
        }
    }

    fn accelerate(&mut self) {
        let min = Duration::from_millis(self.config.min_tick_interval_ms);
        if self.interval > min {
            let a = self.config.tick_acceleration;
            let factor = if a.is_finite() { a.clamp(0.0, 1.0) } else { 1.0 };
            self.interval = self.interval.mul_f32(factor).max(min);
        }
    }

    /// Player places a cell. Only dead, in-bounds, non-exempt cells take it.
    pub fn place_cell(&mut self, x: i32, y: i32) -> bool {
        if self.active.is_none() {
            return false;
        }
        let free = self
            .grid
            .get(x, y)
            .is_some_and(|c| !c.alive() && c.category().evolves());
        if free {
            self.grid.set_alive(x, y, true, CellCategory::PlayerPlaced);
        }
        free
    }

    /// Kills a live ordinary or player cell.
    pub fn erase_cell(&mut self, x: i32, y: i32) -> bool {
        if self.active.is_none() {
            return false;
        }
        let hit = self
            .grid
            .get(x, y)
            .is_some_and(|c| c.alive() && c.category().evolves());
        if hit {
            self.grid.set_alive(x, y, false, CellCategory::Ordinary);
        }
        hit
    }

    pub fn destroy_core(&mut self, x: i32, y: i32, radius: u32) -> Option<usize> {
        self.active.as_ref()?;
        let cleared = cluster::destroy_core(&mut self.grid, x, y, radius);
        debug!(x, y, radius, cleared, "core destroyed");
        Some(cleared)
    }

    /// Projectile hit test at a world point. Checks the 3x3 block of cells
    /// around it and hits the first live non-wall cell whose center is
    /// within `damage_radius`.
    pub fn strike(&mut self, at: Vec2) -> StrikeOutcome {
        if self.active.is_none() {
            return StrikeOutcome::Miss;
        }
        let center = self.grid.world_to_grid(at);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(p) = center.offset(dx, dy) else {
                    continue;
                };
                let Some(cell) = self.grid.get(p.x, p.y) else {
                    continue;
                };
                if !cell.alive() || cell.category() == CellCategory::Wall {
                    continue;
                }
                let d = self.grid.grid_to_world(p.x, p.y).distance(at);
                if d.is_nan() || d > self.config.damage_radius {
                    continue;
                }
                if cell.category() == CellCategory::Core {
                    let radius = self.config.chain_radius;
                    let cleared = cluster::destroy_core(&mut self.grid, p.x, p.y, radius);
                    debug!(x = p.x, y = p.y, cleared, "core destroyed by strike");
                    return StrikeOutcome::Core { at: p, cleared };
                }
                self.grid.set_alive(p.x, p.y, false, CellCategory::Ordinary);
                return StrikeOutcome::Cell(p);
            }
        }
        StrikeOutcome::Miss
    }

    /// True when the cell under `at` is a live ordinary cell.
    pub fn hostile_at(&self, at: Vec2) -> bool {
        let Some(grid) = self.grid() else {
            return false;
        };
        let p = grid.world_to_grid(at);
        grid.get(p.x, p.y)
            .is_some_and(|c| c.alive() && c.category() == CellCategory::Ordinary)
    }
}
