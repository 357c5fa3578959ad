//! Thread-safe handle around a [`Combat`] for roll sources that deliver from
//! their own timers or worker threads.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::trace;

use crate::combat::{AttackChoice, Combat, CombatEvent, Side};
use crate::dice::{Dice, RollSource};
use crate::rendezvous::{RollRequest, RollTicket};

/// Cloneable handle; every clone drives the same combat.
///
/// Each command runs under one lock and publishes its events before the lock
/// is released, so observers see events in the order the engine produced them.
#[derive(Clone)]
pub struct SharedCombat {
    inner: Arc<Mutex<Combat>>,
    events: Sender<CombatEvent>,
}

impl SharedCombat {
    pub fn new(combat: Combat) -> (Self, Receiver<CombatEvent>) {
        let (tx, rx) = mpsc::channel();
        let handle = Self {
            inner: Arc::new(Mutex::new(combat)),
            events: tx,
        };
        (handle, rx)
    }

    // A panic elsewhere must not take the game loop down with it.
    fn lock(&self) -> MutexGuard<'_, Combat> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `command` on the combat and publish whatever it emitted.
    /// Returns the number of events published.
    pub fn command(&self, command: impl FnOnce(&mut Combat) -> Vec<CombatEvent>) -> usize {
        let mut combat = self.lock();
        let events = command(&mut combat);
        let count = events.len();
        for event in events {
            if self.events.send(event).is_err() {
                trace!("no event receiver");
            }
        }
        count
    }

    /// Read-only access, e.g. for rendering life bars.
    pub fn inspect<R>(&self, f: impl FnOnce(&Combat) -> R) -> R {
        f(&self.lock())
    }

    pub fn deliver_roll(&self, side: Side, ticket: RollTicket, value: i32) -> usize {
        self.command(|combat| combat.deliver_roll(side, ticket, value))
    }

    pub fn start_combat(&self, attempting_to_flee_immediately: bool) -> usize {
        self.command(|combat| combat.start_combat(attempting_to_flee_immediately))
    }

    pub fn character_attack(&self, choice: AttackChoice) -> usize {
        self.command(|combat| combat.character_attack(choice))
    }

    pub fn enemy_attack(&self) -> usize {
        self.command(Combat::enemy_attack)
    }

    pub fn try_to_run_away(&self) -> usize {
        self.command(Combat::try_to_run_away)
    }

    pub fn next_turn_or_round(&self) -> usize {
        self.command(Combat::next_turn_or_round)
    }

    pub fn reset_combat(&self) {
        self.lock().reset_combat();
    }
}

/// Play both roll animations for `request`, one thread per side, each
/// finishing after its own random delay of at most `max_delay`.
pub fn spawn_roll_animations(
    handle: &SharedCombat,
    request: RollRequest,
    die_sides: i32,
    seed: u64,
    max_delay: Duration,
) -> [JoinHandle<()>; 2] {
    let max_millis = i32::try_from(max_delay.as_millis()).unwrap_or(i32::MAX);
    [Side::Character, Side::Enemy].map(|side| {
        let handle = handle.clone();
        let salt = match side {
            Side::Character => 0x5eed_0001,
            Side::Enemy => 0x5eed_0002,
        };
        thread::spawn(move || {
            let mut dice = Dice::from_seed(seed ^ salt);
            thread::sleep(animation_delay(&mut dice, max_millis));
            let total = dice.roll(request.base_for(side), die_sides);
            handle.deliver_roll(side, request.ticket, total);
        })
    })
}

fn animation_delay(dice: &mut impl RollSource, max_millis: i32) -> Duration {
    if max_millis <= 0 {
        return Duration::ZERO;
    }
    let millis = dice.die(max_millis.saturating_add(1)) - 1;
    Duration::from_millis(millis as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_delay_does_not_overflow() {
        let mut dice = Dice::from_scripted(vec![5]);
        assert_eq!(animation_delay(&mut dice, i32::MAX), Duration::from_millis(4));
        assert_eq!(animation_delay(&mut dice, 0), Duration::ZERO);
    }
}
