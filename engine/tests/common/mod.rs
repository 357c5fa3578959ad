#![allow(dead_code)]

use combat_engine::{
    Character, Combat, CombatEvent, CombatRules, Enemy, Ratings, RollRequest, Side, Spell, Tactics,
};

pub fn hero(life: i32) -> Character {
    Character::new(
        "Hero",
        Ratings {
            attack: 6,
            defense: 5,
            magic: 4,
            initiative: 5,
        },
        life,
        10,
    )
}

pub fn brute(life: i32) -> Enemy {
    Enemy::new(
        "Ogre",
        Ratings {
            attack: 7,
            defense: 4,
            magic: 1,
            initiative: 3,
        },
        life,
    )
}

pub fn witch(life: i32) -> Enemy {
    Enemy::new(
        "Witch",
        Ratings {
            attack: 2,
            defense: 3,
            magic: 8,
            initiative: 4,
        },
        life,
    )
    .with_spells(6, vec![Spell::new("Hex", 2.0, 4)], Tactics::Caster)
}

/// A combat with both sides bound, not started yet.
pub fn bound(character: Character, enemy: Enemy, can_run_away: bool) -> Combat {
    let mut combat = Combat::new(CombatRules::default());
    combat.set_character(character);
    combat.set_enemy(enemy);
    combat.set_can_run_away(can_run_away);
    combat
}

pub fn request_in(events: &[CombatEvent]) -> RollRequest {
    *events
        .iter()
        .find_map(CombatEvent::roll_request)
        .expect("events should carry a roll request")
}

/// Deliver both totals, character first, and collect everything emitted.
pub fn deliver(combat: &mut Combat, request: &RollRequest, character: i32, enemy: i32) -> Vec<CombatEvent> {
    let mut events = combat.deliver_roll(Side::Character, request.ticket, character);
    events.extend(combat.deliver_roll(Side::Enemy, request.ticket, enemy));
    events
}

/// Start the combat and settle initiative with the given totals.
pub fn started(combat: &mut Combat, character_init: i32, enemy_init: i32) -> Vec<CombatEvent> {
    let events = combat.start_combat(false);
    let request = request_in(&events);
    deliver(combat, &request, character_init, enemy_init)
}

pub fn enemy_life(combat: &Combat) -> i32 {
    combat.enemy().expect("enemy bound").life.current()
}

pub fn character_life(combat: &Combat) -> i32 {
    combat.character().expect("character bound").life.current()
}
