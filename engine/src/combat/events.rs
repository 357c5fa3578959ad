use serde::Serialize;

use super::Side;
use crate::rendezvous::RollRequest;

/// Everything the engine tells its observers, in emission order.
///
/// Every command on [`Combat`](super::Combat) returns the events it produced;
/// the shared handle also forwards them through a channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CombatEvent {
    /// Both sides must roll initiative for the request's ticket.
    RollingInitiative(RollRequest),
    CharacterTurn,
    EnemyTurn,
    /// Both sides must roll for the attack described by the request.
    AttackRollsRequested(RollRequest),
    DefenderSuffersDamage { defender: Side, amount: i32 },
    EndRound { round: u32 },
    CombatFinished { winner: Side },
    SuccessfulRunAway,
}

impl CombatEvent {
    /// The roll request carried by this event, if it asks for rolls.
    pub fn roll_request(&self) -> Option<&RollRequest> {
        match self {
            CombatEvent::RollingInitiative(request)
            | CombatEvent::AttackRollsRequested(request) => Some(request),
            _ => None,
        }
    }
}
