use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Character,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Character => Side::Enemy,
            Side::Enemy => Side::Character,
        }
    }
}

/// Whose attack is being resolved.
pub type Turn = Side;
/// Who won a finished combat. A successful flee has no winner.
pub type CombatWinner = Side;

/// Position within a round once initiative is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    FirstTurn,
    SecondTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunAwayState {
    /// The enemy's free attack on the fleeing character is being rolled.
    OpportunityAttack,
    /// The character survived the free attack and got away.
    AfterAttackRunAway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatState {
    NotStarted,
    RollingInitiative,
    Fighting(RoundState),
    RoundEnd,
    RunAway(RunAwayState),
    Finished,
}

/// Terminal result as the narrative router sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    CharacterWon,
    EnemyWon,
    RanAway,
}
