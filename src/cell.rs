use serde::{Deserialize, Serialize};

/// What a cell is for, independent of whether it is alive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellCategory {
    /// Hostile automaton cell.
    #[default]
    Ordinary,
    /// Static level geometry.
    Wall,
    /// Destructible cluster target.
    Core,
    /// Placed by the player.
    PlayerPlaced,
}

impl CellCategory {
    /// Whether cells of this category follow the automaton rule.
    ///
    /// Walls and cores keep their alive state across ticks.
    pub fn evolves(self) -> bool {
        match self {
            CellCategory::Ordinary | CellCategory::PlayerPlaced => true,
            CellCategory::Wall | CellCategory::Core => false,
        }
    }
}

/// One grid cell. Owned by [`crate::grid::Grid`] and updated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    x: i32,
    y: i32,
    pub(crate) alive: bool,
    pub(crate) pending_alive: bool,
    pub(crate) pending_category: Option<CellCategory>,
    pub(crate) category: CellCategory,
}

impl Cell {
    pub(crate) fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            alive: false,
            pending_alive: false,
            pending_category: None,
            category: CellCategory::Ordinary,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    /// State staged by the last compute phase.
    pub fn pending_alive(&self) -> bool {
        self.pending_alive
    }

    pub fn category(&self) -> CellCategory {
        self.category
    }

    pub(crate) fn set(&mut self, alive: bool, category: CellCategory) {
        self.alive = alive;
        self.pending_alive = alive;
        self.pending_category = None;
        self.category = category;
    }

    pub(crate) fn apply_pending(&mut self) {
        self.alive = self.pending_alive;
        if let Some(category) = self.pending_category.take() {
            self.category = category;
        }
    }
}
