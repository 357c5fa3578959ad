pub mod api;
pub mod combat;
pub mod combatant;
pub mod content;
pub mod dice;
pub mod place;
pub mod rendezvous;
pub mod resolution;
pub mod rules;
pub mod shared;

pub use combat::{
    AttackChoice, Combat, CombatEvent, CombatOutcome, CombatState, CombatWinner, RoundState,
    RunAwayState, Side, Turn,
};
pub use combatant::{
    Bonus, Character, Combatant, Enemy, EnemyAction, Pool, Ratings, Spell, Tactics,
};
pub use dice::{Dice, RollSource};
pub use place::{CombatPlace, PlaceId};
pub use rendezvous::{Arrival, RollCheck, RollJoin, RollRequest, RollTicket};
pub use rules::{CombatRules, DamageRounding, TieBreak};
pub use shared::{spawn_roll_animations, SharedCombat};
