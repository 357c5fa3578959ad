mod common;

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use combat_engine::{
    spawn_roll_animations, AttackChoice, CombatEvent, CombatState, RollRequest, SharedCombat, Side,
};
use common::{bound, brute, hero};

fn drain(rx: &Receiver<CombatEvent>) -> Vec<CombatEvent> {
    rx.try_iter().collect()
}

fn first_request(events: &[CombatEvent]) -> RollRequest {
    *events
        .iter()
        .find_map(CombatEvent::roll_request)
        .expect("a roll request")
}

#[test]
fn simultaneous_deliveries_resolve_once() {
    for _ in 0..50 {
        let (handle, rx) = SharedCombat::new(bound(hero(20), brute(10), false));
        handle.start_combat(false);
        let request = first_request(&drain(&rx));

        let barrier = Arc::new(Barrier::new(2));
        let workers: Vec<_> = [(Side::Character, 10), (Side::Enemy, 5)]
            .into_iter()
            .map(|(side, value)| {
                let handle = handle.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    handle.deliver_roll(side, request.ticket, value);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(drain(&rx), vec![CombatEvent::CharacterTurn]);
        assert_eq!(handle.inspect(|c| c.current_turn()), Side::Character);
    }
}

#[test]
fn duplicate_storm_applies_damage_once() {
    let (handle, rx) = SharedCombat::new(bound(hero(20), brute(10), false));
    handle.start_combat(false);
    let request = first_request(&drain(&rx));
    handle.deliver_roll(Side::Character, request.ticket, 10);
    handle.deliver_roll(Side::Enemy, request.ticket, 5);
    handle.character_attack(AttackChoice::Physical);
    let attack = first_request(&drain(&rx));

    let barrier = Arc::new(Barrier::new(8));
    let workers: Vec<_> = (0..8)
        .map(|i| {
            let handle = handle.clone();
            let barrier = Arc::clone(&barrier);
            let side = if i % 2 == 0 { Side::Character } else { Side::Enemy };
            let value = if side == Side::Character { 14 } else { 10 };
            thread::spawn(move || {
                barrier.wait();
                handle.deliver_roll(side, attack.ticket, value);
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let events = drain(&rx);
    assert_eq!(
        events,
        vec![
            CombatEvent::DefenderSuffersDamage {
                defender: Side::Enemy,
                amount: 4,
            },
            CombatEvent::EnemyTurn,
        ]
    );
    assert_eq!(handle.inspect(|c| c.enemy().unwrap().life.current()), 6);
}

#[test]
fn late_roll_after_reset_changes_nothing() {
    let (handle, rx) = SharedCombat::new(bound(hero(20), brute(10), false));
    handle.start_combat(false);
    let request = first_request(&drain(&rx));
    handle.deliver_roll(Side::Character, request.ticket, 10);
    handle.reset_combat();

    assert_eq!(handle.deliver_roll(Side::Enemy, request.ticket, 5), 0);
    assert!(drain(&rx).is_empty());
    assert_eq!(handle.inspect(|c| c.state()), CombatState::NotStarted);
}

#[test]
fn animated_rolls_drive_a_whole_combat() {
    let (handle, rx) = SharedCombat::new(bound(hero(20), brute(6), true));
    let sides = handle.inspect(|c| c.rules().die_sides);
    handle.start_combat(false);

    let mut seed = 1u64;
    let mut animations = Vec::new();
    loop {
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("combat stalled");
        match event {
            CombatEvent::RollingInitiative(request) | CombatEvent::AttackRollsRequested(request) => {
                seed += 1;
                animations.extend(spawn_roll_animations(
                    &handle,
                    request,
                    sides,
                    seed,
                    Duration::from_millis(3),
                ));
            }
            CombatEvent::CharacterTurn => {
                handle.character_attack(AttackChoice::Physical);
            }
            CombatEvent::EnemyTurn => {
                handle.enemy_attack();
            }
            CombatEvent::EndRound { round } => {
                assert!(round < 200, "combat did not converge");
                handle.next_turn_or_round();
            }
            CombatEvent::CombatFinished { .. } | CombatEvent::SuccessfulRunAway => break,
            CombatEvent::DefenderSuffersDamage { .. } => {}
        }
    }
    for animation in animations {
        animation.join().unwrap();
    }

    let (state, winner) = handle.inspect(|c| (c.state(), c.winner()));
    assert_eq!(state, CombatState::Finished);
    assert!(winner.is_some());
}
