use crate::combat::Side;
use crate::rules::{DamageRounding, TieBreak};

/// Result of comparing two roll totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestOutcome {
    AttackerWins,
    DefenderWins,
    Tie,
}

pub fn contest(attacker_total: i32, defender_total: i32) -> ContestOutcome {
    if attacker_total > defender_total {
        ContestOutcome::AttackerWins
    } else if attacker_total == defender_total {
        ContestOutcome::Tie
    } else {
        ContestOutcome::DefenderWins
    }
}

/// Side that acts first this round. Strictly higher total wins; ties go to `ties`.
pub fn initiative_order(character_roll: i32, enemy_roll: i32, ties: TieBreak) -> Side {
    match contest(character_roll, enemy_roll) {
        ContestOutcome::AttackerWins => Side::Character,
        ContestOutcome::DefenderWins => Side::Enemy,
        ContestOutcome::Tie => ties.favored(),
    }
}

/// Life points an attack removes: `margin * multiplier` rounded, or 0 when the
/// defender's roll matches or beats the attacker's. Saturates at `i32::MAX`.
pub fn attack_damage(
    attacker_roll: i32,
    defender_roll: i32,
    damage_multiplier: f64,
    rounding: DamageRounding,
) -> i32 {
    let margin = i64::from(attacker_roll) - i64::from(defender_roll);
    if margin <= 0 {
        return 0;
    }
    rounding.apply(margin as f64 * damage_multiplier).max(0)
}
