//! Life-family automaton used as a game's core mechanic.
//!
//! A bounded [`Grid`] evolves under one of five [`RuleVariant`]s. Wall and
//! core cells are exempt from evolution; cores sit inside random halos of
//! ordinary cells and can be destroyed to clear the area around them.
//!
//! ```
//! use lifekernel::{EngineConfig, GridPos, RuleVariant, StageDescriptor, TickDriver};
//!
//! let mut driver = TickDriver::new(EngineConfig::default()).unwrap();
//! driver
//!     .load(StageDescriptor {
//!         name: "demo".into(),
//!         rule: RuleVariant::HighLife,
//!         player_start: GridPos::new(1, 1),
//!         goal: GridPos::new(40, 40),
//!         clusters: vec![],
//!         walls: vec![],
//!         patterns: vec![],
//!     })
//!     .unwrap();
//! assert!(driver.step().is_some());
//! ```

pub mod cell;
pub mod cluster;
pub mod driver;
pub mod error;
pub mod grid;
pub mod pattern;
pub mod rules;
pub mod stage;
pub mod storage;

pub use cell::{Cell, CellCategory};
pub use cluster::{destroy_core, place_cluster, ClusterSpec};
pub use driver::{DriverState, EngineConfig, StrikeOutcome, TickDriver, TickReport};
pub use error::{GridError, StageError, StorageError};
pub use grid::{Grid, GridPos, Vec2};
pub use rules::{evaluate, RuleVariant, Transition};
pub use stage::{load_stage, StageDescriptor, StageReport, WallPrimitive};
