use serde::{Deserialize, Serialize};

use crate::combat::{Combat, CombatOutcome};
use crate::combatant::{Character, Enemy};

/// Opaque identifier of a narrative place; forwarded, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub String);

impl From<&str> for PlaceId {
    fn from(id: &str) -> Self {
        PlaceId(id.to_string())
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fight in the narrative graph and where each ending leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatPlace {
    pub enemy: Enemy,
    #[serde(default)]
    pub can_run_away: bool,
    pub win: PlaceId,
    pub lose: PlaceId,
    pub ran_away: PlaceId,
}

impl CombatPlace {
    /// Reset `combat` for this place's encounter and bind the combatants.
    /// The enemy is a fresh copy, so re-entering the place starts at full strength.
    pub fn enter(&self, combat: &mut Combat, character: Character) {
        combat.reset_combat();
        combat.set_character(character);
        combat.set_enemy(self.enemy.clone());
        combat.set_can_run_away(self.can_run_away);
    }

    /// Where the story continues, once the combat has a terminal outcome.
    pub fn destination(&self, combat: &Combat) -> Option<&PlaceId> {
        let place = match combat.outcome()? {
            CombatOutcome::CharacterWon => &self.win,
            CombatOutcome::EnemyWon => &self.lose,
            CombatOutcome::RanAway => &self.ran_away,
        };
        Some(place)
    }
}
