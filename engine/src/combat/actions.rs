use tracing::{debug, warn};

use super::{Combat, CombatEvent, CombatState, RunAwayState, Side};
use crate::combatant::{Combatant, Spell};
use crate::rendezvous::RollCheck;

/// What the player does with the Character's turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackChoice {
    Physical,
    Spell(Spell),
}

impl AttackChoice {
    fn profile(&self) -> (f64, bool, i32) {
        match self {
            AttackChoice::Physical => (1.0, true, 0),
            AttackChoice::Spell(spell) => (spell.damage_multiplier, false, spell.power_cost),
        }
    }
}

impl Combat {
    /// Start the Character's attack for this turn and request both rolls.
    /// A spell the Character cannot pay for is refused.
    pub fn character_attack(&mut self, choice: AttackChoice) -> Vec<CombatEvent> {
        if !self.is_open_turn_for(Side::Character) {
            debug!(state = ?self.state, turn = ?self.current_turn, "character attack ignored");
            return Vec::new();
        }
        let (multiplier, is_physical, cost) = choice.profile();
        let power = self.character.as_ref().map_or(0, |c| c.current_power_points());
        if cost > power {
            warn!(cost, power, "not enough power points for the spell");
            return Vec::new();
        }
        self.launch_attack(Side::Character, multiplier, is_physical, cost)
    }

    /// Start the Enemy's attack for this turn; the enemy's tactics pick the action.
    pub fn enemy_attack(&mut self) -> Vec<CombatEvent> {
        if !self.is_open_turn_for(Side::Enemy) {
            debug!(state = ?self.state, turn = ?self.current_turn, "enemy attack ignored");
            return Vec::new();
        }
        let Some(action) = self.enemy.as_ref().map(|e| e.next_action()) else {
            return Vec::new();
        };
        self.launch_attack(
            Side::Enemy,
            action.damage_multiplier(),
            action.is_physical(),
            action.power_cost(),
        )
    }

    /// Flee on the Character's turn. The enemy first gets one free attack;
    /// surviving it ends the combat without a winner.
    pub fn try_to_run_away(&mut self) -> Vec<CombatEvent> {
        if !self.can_run_away {
            debug!("running away is not allowed in this combat");
            return Vec::new();
        }
        if !self.is_open_turn_for(Side::Character) {
            debug!(state = ?self.state, turn = ?self.current_turn, "run away ignored");
            return Vec::new();
        }
        let Some(action) = self.enemy.as_ref().map(|e| e.next_action()) else {
            return Vec::new();
        };
        self.state = CombatState::RunAway(RunAwayState::OpportunityAttack);
        debug!(round = self.round, "character tries to run away");
        self.launch_attack(
            Side::Enemy,
            action.damage_multiplier(),
            action.is_physical(),
            action.power_cost(),
        )
    }

    /// True while `side` owns the current turn and has not launched its attack yet.
    fn is_open_turn_for(&self, side: Side) -> bool {
        matches!(self.state, CombatState::Fighting(_))
            && self.current_turn == side
            && !self.join.is_waiting()
    }

    fn launch_attack(
        &mut self,
        attacker: Side,
        damage_multiplier: f64,
        is_physical: bool,
        power_cost: i32,
    ) -> Vec<CombatEvent> {
        if power_cost > 0 {
            if let Some(caster) = self.combatant_mut(attacker) {
                caster.power_mut().drain(power_cost);
            }
        }
        let check = RollCheck::Attack {
            attacker,
            damage_multiplier,
            is_physical,
        };
        self.arm(check)
            .map(CombatEvent::AttackRollsRequested)
            .into_iter()
            .collect()
    }
}
