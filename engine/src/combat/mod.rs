//! The combat state machine.
//!
//! A [`Combat`] is created once per combat place and reset for every
//! encounter. It owns the bound [`Character`] and [`Enemy`] while the fight
//! lasts, asks the roll source for totals through [`CombatEvent`]s, and only
//! resolves a check once both totals for the armed ticket have arrived.
//!
//! Misuse never panics: a command issued in the wrong state, a duplicate roll
//! or a roll for an old ticket is logged and ignored, returning no events.

pub mod actions;
pub mod events;
pub mod state;

use tracing::{debug, trace, warn};

pub use actions::AttackChoice;
pub use events::CombatEvent;
pub use state::{CombatOutcome, CombatState, CombatWinner, RoundState, RunAwayState, Side, Turn};

use crate::combatant::{Character, Combatant, Enemy};
use crate::rendezvous::{Arrival, RollCheck, RollJoin, RollRequest, RollTicket};
use crate::resolution::{attack_damage, initiative_order};
use crate::rules::CombatRules;

#[derive(Debug)]
pub struct Combat {
    rules: CombatRules,
    state: CombatState,
    round: u32,
    current_turn: Turn,
    winner: Option<CombatWinner>,
    character: Option<Character>,
    enemy: Option<Enemy>,
    can_run_away: bool,
    flee_on_first_turn: bool,
    pending: Option<RollCheck>,
    join: RollJoin,
    encounter: u64,
    sequence: u64,
}

impl Default for Combat {
    fn default() -> Self {
        Self::new(CombatRules::default())
    }
}

impl Combat {
    pub fn new(rules: CombatRules) -> Self {
        Self {
            rules,
            state: CombatState::NotStarted,
            round: 1,
            current_turn: Side::Character,
            winner: None,
            character: None,
            enemy: None,
            can_run_away: false,
            flee_on_first_turn: false,
            pending: None,
            join: RollJoin::new(),
            encounter: 0,
            sequence: 0,
        }
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_turn(&self) -> Turn {
        self.current_turn
    }

    pub fn winner(&self) -> Option<CombatWinner> {
        self.winner
    }

    pub fn can_run_away(&self) -> bool {
        self.can_run_away
    }

    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    /// Ticket of the check currently waiting for rolls, if any.
    pub fn awaiting_rolls(&self) -> Option<RollTicket> {
        self.join.armed()
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match (self.state, self.winner) {
            (CombatState::Finished, Some(Side::Character)) => Some(CombatOutcome::CharacterWon),
            (CombatState::Finished, Some(Side::Enemy)) => Some(CombatOutcome::EnemyWon),
            (CombatState::RunAway(RunAwayState::AfterAttackRunAway), None) => {
                Some(CombatOutcome::RanAway)
            }
            _ => None,
        }
    }

    pub fn set_character(&mut self, character: Character) {
        if self.state != CombatState::NotStarted {
            warn!(state = ?self.state, "character can only be bound before combat starts");
            return;
        }
        self.character = Some(character);
    }

    pub fn set_enemy(&mut self, enemy: Enemy) {
        if self.state != CombatState::NotStarted {
            warn!(state = ?self.state, "enemy can only be bound before combat starts");
            return;
        }
        self.enemy = Some(enemy);
    }

    pub fn set_can_run_away(&mut self, allowed: bool) {
        if self.state != CombatState::NotStarted {
            warn!(state = ?self.state, "flee permission can only change before combat starts");
            return;
        }
        self.can_run_away = allowed;
    }

    /// Back to `NotStarted`. Pending rolls are cancelled; the bound combatants
    /// stay bound with whatever points they have left.
    pub fn reset_combat(&mut self) {
        self.state = CombatState::NotStarted;
        self.round = 1;
        self.current_turn = Side::Character;
        self.winner = None;
        self.flee_on_first_turn = false;
        self.pending = None;
        self.join.disarm();
        self.encounter += 1;
        self.sequence = 0;
        debug!(encounter = self.encounter, "combat reset");
    }

    /// Reset and hand the combatants back to their owner.
    pub fn release(&mut self) -> Option<(Character, Enemy)> {
        self.reset_combat();
        match (self.character.take(), self.enemy.take()) {
            (Some(character), Some(enemy)) => Some((character, enemy)),
            (character, enemy) => {
                self.character = character;
                self.enemy = enemy;
                None
            }
        }
    }

    pub fn start_combat(&mut self, attempting_to_flee_immediately: bool) -> Vec<CombatEvent> {
        if self.state != CombatState::NotStarted {
            debug!(state = ?self.state, "start_combat ignored");
            return Vec::new();
        }
        if self.character.is_none() || self.enemy.is_none() {
            warn!("start_combat needs both a character and an enemy");
            return Vec::new();
        }
        self.round = 1;
        self.winner = None;
        self.join.disarm();
        self.pending = None;
        self.flee_on_first_turn = attempting_to_flee_immediately && self.can_run_away;
        debug!(
            encounter = self.encounter,
            flee = self.flee_on_first_turn,
            "combat starts"
        );

        let mut events = Vec::new();
        self.request_initiative(&mut events);
        events
    }

    /// Roll callback for one side. Resolves the armed check once both sides
    /// have delivered for `ticket`.
    pub fn deliver_roll(&mut self, side: Side, ticket: RollTicket, value: i32) -> Vec<CombatEvent> {
        match self.join.offer(ticket, side, value) {
            Arrival::Stale => {
                debug!(?side, ?ticket, value, "stale roll ignored");
                Vec::new()
            }
            Arrival::Duplicate => {
                debug!(?side, ?ticket, value, "duplicate roll ignored");
                Vec::new()
            }
            Arrival::Waiting => {
                trace!(?side, ?ticket, value, "roll stored, waiting for the other side");
                Vec::new()
            }
            Arrival::Joined { character, enemy } => match self.pending.take() {
                Some(RollCheck::Initiative) => self.apply_initiative_roll(character, enemy),
                Some(RollCheck::Attack {
                    attacker,
                    damage_multiplier,
                    is_physical,
                }) => {
                    let (attacker_roll, defender_roll) = match attacker {
                        Side::Character => (character, enemy),
                        Side::Enemy => (enemy, character),
                    };
                    self.apply_attack_roll(attacker_roll, defender_roll, damage_multiplier, is_physical)
                }
                None => Vec::new(),
            },
        }
    }

    pub fn apply_initiative_roll(&mut self, character_roll: i32, enemy_roll: i32) -> Vec<CombatEvent> {
        if self.state != CombatState::RollingInitiative {
            debug!(state = ?self.state, "initiative roll ignored");
            return Vec::new();
        }
        self.clear_pending();
        self.current_turn =
            initiative_order(character_roll, enemy_roll, self.rules.initiative_ties);
        self.state = CombatState::Fighting(RoundState::FirstTurn);
        debug!(
            round = self.round,
            character_roll,
            enemy_roll,
            first = ?self.current_turn,
            "initiative settled"
        );

        let mut events = Vec::new();
        self.begin_turn(&mut events);
        events
    }

    /// Resolve the attack of the current turn (or the enemy's free attack
    /// while fleeing). `is_physical` only tells which ratings produced the
    /// rolls; it is not re-checked here.
    pub fn apply_attack_roll(
        &mut self,
        attacker_roll: i32,
        defender_roll: i32,
        damage_multiplier: f64,
        is_physical: bool,
    ) -> Vec<CombatEvent> {
        let (attacker, slot) = match self.state {
            CombatState::Fighting(slot) => (self.current_turn, Some(slot)),
            CombatState::RunAway(RunAwayState::OpportunityAttack) => (Side::Enemy, None),
            state => {
                debug!(?state, "attack roll ignored");
                return Vec::new();
            }
        };
        self.clear_pending();
        let defender = attacker.opponent();
        let damage = attack_damage(
            attacker_roll,
            defender_roll,
            damage_multiplier,
            self.rules.damage_rounding,
        );
        debug!(
            round = self.round,
            ?attacker,
            attacker_roll,
            defender_roll,
            damage_multiplier,
            is_physical,
            damage,
            "attack resolved"
        );

        let mut events = Vec::new();
        let mut defeated = false;
        if let Some(target) = self.combatant_mut(defender) {
            if damage > 0 {
                target.life_mut().drain(damage);
                events.push(CombatEvent::DefenderSuffersDamage {
                    defender,
                    amount: damage,
                });
            }
            defeated = target.is_defeated();
        }

        if defeated {
            self.winner = Some(attacker);
            self.end_round(&mut events);
            return events;
        }

        match slot {
            Some(RoundState::FirstTurn) => {
                self.state = CombatState::Fighting(RoundState::SecondTurn);
                self.current_turn = self.current_turn.opponent();
                self.begin_turn(&mut events);
            }
            Some(RoundState::SecondTurn) => self.end_round(&mut events),
            None => {
                self.state = CombatState::RunAway(RunAwayState::AfterAttackRunAway);
                debug!(round = self.round, "character got away");
                events.push(CombatEvent::SuccessfulRunAway);
            }
        }
        events
    }

    /// Advance out of `RoundEnd`: next round's initiative, or `Finished` when
    /// a winner is already known.
    pub fn next_turn_or_round(&mut self) -> Vec<CombatEvent> {
        if self.state != CombatState::RoundEnd {
            debug!(state = ?self.state, "next_turn_or_round ignored");
            return Vec::new();
        }
        let mut events = Vec::new();
        match self.winner {
            Some(winner) => {
                self.state = CombatState::Finished;
                debug!(round = self.round, ?winner, "combat finished");
                events.push(CombatEvent::CombatFinished { winner });
            }
            None => {
                self.round += 1;
                self.request_initiative(&mut events);
            }
        }
        events
    }

    fn request_initiative(&mut self, events: &mut Vec<CombatEvent>) {
        self.state = CombatState::RollingInitiative;
        if let Some(request) = self.arm(RollCheck::Initiative) {
            events.push(CombatEvent::RollingInitiative(request));
        }
    }

    fn begin_turn(&mut self, events: &mut Vec<CombatEvent>) {
        debug!(round = self.round, turn = ?self.current_turn, "turn begins");
        match self.current_turn {
            Side::Character => {
                events.push(CombatEvent::CharacterTurn);
                if self.flee_on_first_turn {
                    self.flee_on_first_turn = false;
                    events.extend(self.try_to_run_away());
                }
            }
            Side::Enemy => events.push(CombatEvent::EnemyTurn),
        }
    }

    fn end_round(&mut self, events: &mut Vec<CombatEvent>) {
        self.state = CombatState::RoundEnd;
        debug!(round = self.round, winner = ?self.winner, "round ends");
        events.push(CombatEvent::EndRound { round: self.round });
    }

    /// Open a new pending resolution and describe it for the roll source.
    fn arm(&mut self, check: RollCheck) -> Option<RollRequest> {
        let (character, enemy) = (self.character.as_ref()?, self.enemy.as_ref()?);
        let (character_base, enemy_base) = match check {
            RollCheck::Initiative => (
                character
                    .initiative_value()
                    .saturating_add(character.luck_modifier()),
                enemy.initiative_value().saturating_add(enemy.luck_modifier()),
            ),
            RollCheck::Attack {
                attacker,
                is_physical,
                ..
            } => {
                let (offense, defense) = match attacker {
                    Side::Character => (character as &dyn Combatant, enemy as &dyn Combatant),
                    Side::Enemy => (enemy as &dyn Combatant, character as &dyn Combatant),
                };
                let attacker_base = offense
                    .offense_for(is_physical)
                    .saturating_add(offense.luck_modifier());
                let defender_base = defense
                    .defense_for(is_physical)
                    .saturating_add(defense.luck_modifier());
                match attacker {
                    Side::Character => (attacker_base, defender_base),
                    Side::Enemy => (defender_base, attacker_base),
                }
            }
        };

        self.sequence += 1;
        let ticket = RollTicket {
            encounter: self.encounter,
            sequence: self.sequence,
        };
        self.join.arm(ticket);
        self.pending = Some(check);
        trace!(?ticket, ?check, "rolls requested");
        Some(RollRequest {
            ticket,
            check,
            character_base,
            enemy_base,
        })
    }

    fn clear_pending(&mut self) {
        self.pending = None;
        self.join.disarm();
    }

    fn combatant_mut(&mut self, side: Side) -> Option<&mut dyn Combatant> {
        match side {
            Side::Character => self.character.as_mut().map(|c| c as &mut dyn Combatant),
            Side::Enemy => self.enemy.as_mut().map(|e| e as &mut dyn Combatant),
        }
    }
}
