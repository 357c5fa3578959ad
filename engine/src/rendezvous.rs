//! Two-party join for the per-side roll results.
//!
//! Each initiative or attack check needs one total from the Character's roll
//! animation and one from the Enemy's. They finish on independent timers, so
//! either can arrive first. [`RollJoin`] keeps one slot per side and reports
//! [`Arrival::Joined`] exactly once, when the second value for the currently
//! armed [`RollTicket`] lands. Anything addressed to another ticket is stale.
//!
//! The join itself is not synchronized; callers that deliver from several
//! threads wrap the owning [`Combat`](crate::Combat) in a mutex so that
//! store, check, resolve and clear happen as one critical section.

use serde::{Deserialize, Serialize};

use crate::combat::Side;
use crate::dice::RollSource;

/// Identity of one pending resolution.
///
/// `encounter` changes on every combat reset, `sequence` on every new check
/// within an encounter, so a late roll from an earlier check never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollTicket {
    pub encounter: u64,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RollCheck {
    Initiative,
    Attack {
        attacker: Side,
        damage_multiplier: f64,
        is_physical: bool,
    },
}

/// What the roll source must produce for one check.
///
/// The bases already include the rating in play and the luck modifier; the
/// roll source only adds its die.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollRequest {
    pub ticket: RollTicket,
    pub check: RollCheck,
    pub character_base: i32,
    pub enemy_base: i32,
}

impl RollRequest {
    pub fn base_for(&self, side: Side) -> i32 {
        match side {
            Side::Character => self.character_base,
            Side::Enemy => self.enemy_base,
        }
    }

    /// Roll both sides from one source. Returns `(character_total, enemy_total)`.
    pub fn roll_both(&self, source: &mut impl RollSource, sides: i32) -> (i32, i32) {
        let character = source.roll(self.character_base, sides);
        let enemy = source.roll(self.enemy_base, sides);
        (character, enemy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Not addressed to the armed ticket (or nothing is armed).
    Stale,
    /// This side already delivered for the armed ticket.
    Duplicate,
    /// Stored; still waiting for the other side.
    Waiting,
    /// Both values present. The join is now disarmed and empty.
    Joined { character: i32, enemy: i32 },
}

#[derive(Debug, Default)]
pub struct RollJoin {
    armed: Option<RollTicket>,
    character: Option<i32>,
    enemy: Option<i32>,
}

impl RollJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for `ticket`, discarding anything stored for a previous one.
    pub fn arm(&mut self, ticket: RollTicket) {
        self.armed = Some(ticket);
        self.character = None;
        self.enemy = None;
    }

    pub fn disarm(&mut self) {
        self.armed = None;
        self.character = None;
        self.enemy = None;
    }

    pub fn armed(&self) -> Option<RollTicket> {
        self.armed
    }

    pub fn is_waiting(&self) -> bool {
        self.armed.is_some()
    }

    pub fn offer(&mut self, ticket: RollTicket, side: Side, value: i32) -> Arrival {
        if self.armed != Some(ticket) {
            return Arrival::Stale;
        }
        let slot = match side {
            Side::Character => &mut self.character,
            Side::Enemy => &mut self.enemy,
        };
        if slot.is_some() {
            return Arrival::Duplicate;
        }
        *slot = Some(value);

        match (self.character, self.enemy) {
            (Some(character), Some(enemy)) => {
                self.disarm();
                Arrival::Joined { character, enemy }
            }
            _ => Arrival::Waiting,
        }
    }
}
