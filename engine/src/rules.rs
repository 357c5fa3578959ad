use serde::{Deserialize, Serialize};

use crate::combat::Side;

const DEFAULT_DIE_SIDES: i32 = 8;

/// Who acts first when both initiative totals are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    Character,
    Enemy,
}

impl TieBreak {
    pub fn favored(self) -> Side {
        match self {
            TieBreak::Character => Side::Character,
            TieBreak::Enemy => Side::Enemy,
        }
    }
}

/// How `margin * multiplier` becomes whole life points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageRounding {
    /// Nearest integer, halves away from zero.
    #[default]
    Round,
    Floor,
    Ceil,
}

impl DamageRounding {
    /// Out-of-range values saturate to the `i32` bounds.
    pub fn apply(self, value: f64) -> i32 {
        let rounded = match self {
            DamageRounding::Round => value.round(),
            DamageRounding::Floor => value.floor(),
            DamageRounding::Ceil => value.ceil(),
        };
        rounded as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CombatRules {
    #[serde(default)]
    pub initiative_ties: TieBreak,
    #[serde(default)]
    pub damage_rounding: DamageRounding,
    #[serde(default = "default_die_sides")]
    pub die_sides: i32,
}

fn default_die_sides() -> i32 {
    DEFAULT_DIE_SIDES
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            initiative_ties: TieBreak::default(),
            damage_rounding: DamageRounding::default(),
            die_sides: DEFAULT_DIE_SIDES,
        }
    }
}
