//! Birth/survival rules for the Life family.

use crate::cell::CellCategory;
use crate::error::StageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Set of neighbor counts 0..=8, one bit per count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborSet(u16);

impl NeighborSet {
    const fn of(counts: &[u8]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < counts.len() {
            bits |= 1 << counts[i];
            i += 1;
        }
        Self(bits)
    }

    pub fn contains(self, count: u8) -> bool {
        count <= 8 && self.0 & (1 << count) != 0
    }

    fn digits(self) -> String {
        (0u8..=8)
            .filter(|&n| self.contains(n))
            .map(|n| char::from(b'0' + n))
            .collect()
    }
}

/// Supported automaton rules.
///
/// Stage files accept anything [`FromStr`] does and are written with
/// [`RuleVariant::name`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleVariant {
    /// B3/S23
    #[default]
    ConwayLife,
    /// B36/S23
    HighLife,
    /// B3/S12345
    Maze,
    /// B3678/S34678
    DayAndNight,
    /// B2/S
    Seeds,
}

impl RuleVariant {
    pub const ALL: [RuleVariant; 5] = [
        RuleVariant::ConwayLife,
        RuleVariant::HighLife,
        RuleVariant::Maze,
        RuleVariant::DayAndNight,
        RuleVariant::Seeds,
    ];

    pub fn birth(self) -> NeighborSet {
        match self {
            RuleVariant::ConwayLife | RuleVariant::Maze => NeighborSet::of(&[3]),
            RuleVariant::HighLife => NeighborSet::of(&[3, 6]),
            RuleVariant::DayAndNight => NeighborSet::of(&[3, 6, 7, 8]),
            RuleVariant::Seeds => NeighborSet::of(&[2]),
        }
    }

    pub fn survival(self) -> NeighborSet {
        match self {
            RuleVariant::ConwayLife | RuleVariant::HighLife => NeighborSet::of(&[2, 3]),
            RuleVariant::Maze => NeighborSet::of(&[1, 2, 3, 4, 5]),
            RuleVariant::DayAndNight => NeighborSet::of(&[3, 4, 6, 7, 8]),
            RuleVariant::Seeds => NeighborSet::of(&[]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RuleVariant::ConwayLife => "conway",
            RuleVariant::HighLife => "highlife",
            RuleVariant::Maze => "maze",
            RuleVariant::DayAndNight => "day_and_night",
            RuleVariant::Seeds => "seeds",
        }
    }

    /// B/S notation, e.g. `B36/S23`.
    pub fn rulestring(self) -> String {
        format!("B{}/S{}", self.birth().digits(), self.survival().digits())
    }

    /// Next state of an evolving cell, ignoring category.
    pub fn next_state(self, alive: bool, neighbors: u8) -> Transition {
        if alive {
            Transition {
                next_alive: self.survival().contains(neighbors),
                born: None,
            }
        } else if self.birth().contains(neighbors) {
            Transition {
                next_alive: true,
                born: Some(BORN_CATEGORY),
            }
        } else {
            Transition {
                next_alive: false,
                born: None,
            }
        }
    }
}

/// Category given to every cell born during a tick.
pub const BORN_CATEGORY: CellCategory = CellCategory::Ordinary;

/// Outcome of evaluating one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next_alive: bool,
    /// Set only when a dead cell comes alive.
    pub born: Option<CellCategory>,
}

/// Full per-cell evaluation: exempt categories hold their state, the rest
/// follow `variant`.
pub fn evaluate(
    variant: RuleVariant,
    category: CellCategory,
    alive: bool,
    neighbors: u8,
) -> Transition {
    if !category.evolves() {
        return Transition {
            next_alive: alive,
            born: None,
        };
    }
    variant.next_state(alive, neighbors)
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rulestring())
    }
}

impl FromStr for RuleVariant {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let lowered = text.to_ascii_lowercase().replace(['-', ' '], "_");
        let by_name = match lowered.as_str() {
            "conway" | "conway_life" | "life" => Some(RuleVariant::ConwayLife),
            "highlife" | "high_life" => Some(RuleVariant::HighLife),
            "maze" => Some(RuleVariant::Maze),
            "day_and_night" | "dayandnight" => Some(RuleVariant::DayAndNight),
            "seeds" => Some(RuleVariant::Seeds),
            _ => None,
        };
        by_name
            .or_else(|| {
                let upper = text.to_ascii_uppercase();
                RuleVariant::ALL
                    .into_iter()
                    .find(|v| v.rulestring() == upper)
            })
            .ok_or_else(|| StageError::UnknownRule(text.to_string()))
    }
}

impl TryFrom<String> for RuleVariant {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RuleVariant> for String {
    fn from(v: RuleVariant) -> Self {
        v.name().to_string()
    }
}
