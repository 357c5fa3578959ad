use combat_engine::{Arrival, RollJoin, RollTicket, Side};
use proptest::prelude::*;

fn ticket(sequence: u64) -> RollTicket {
    RollTicket {
        encounter: 0,
        sequence,
    }
}

#[test]
fn single_arrival_waits() {
    let mut join = RollJoin::new();
    join.arm(ticket(1));
    assert_eq!(join.offer(ticket(1), Side::Enemy, 9), Arrival::Waiting);
    assert!(join.is_waiting());
}

#[test]
fn second_arrival_joins_once() {
    let mut join = RollJoin::new();
    join.arm(ticket(1));
    join.offer(ticket(1), Side::Character, 12);
    assert_eq!(
        join.offer(ticket(1), Side::Enemy, 9),
        Arrival::Joined {
            character: 12,
            enemy: 9
        }
    );
    assert!(!join.is_waiting());
    assert_eq!(join.offer(ticket(1), Side::Enemy, 9), Arrival::Stale);
    assert_eq!(join.offer(ticket(1), Side::Character, 12), Arrival::Stale);
}

#[test]
fn same_side_twice_is_a_duplicate() {
    let mut join = RollJoin::new();
    join.arm(ticket(1));
    join.offer(ticket(1), Side::Character, 12);
    assert_eq!(join.offer(ticket(1), Side::Character, 3), Arrival::Duplicate);
    assert_eq!(
        join.offer(ticket(1), Side::Enemy, 9),
        Arrival::Joined {
            character: 12,
            enemy: 9
        }
    );
}

#[test]
fn other_tickets_are_stale() {
    let mut join = RollJoin::new();
    assert_eq!(join.offer(ticket(1), Side::Character, 5), Arrival::Stale);

    join.arm(ticket(2));
    assert_eq!(join.offer(ticket(1), Side::Character, 5), Arrival::Stale);
    let other_encounter = RollTicket {
        encounter: 1,
        sequence: 2,
    };
    assert_eq!(join.offer(other_encounter, Side::Character, 5), Arrival::Stale);
}

#[test]
fn rearming_discards_half_filled_pair() {
    let mut join = RollJoin::new();
    join.arm(ticket(1));
    join.offer(ticket(1), Side::Character, 12);
    join.arm(ticket(2));
    assert_eq!(join.offer(ticket(2), Side::Enemy, 4), Arrival::Waiting);
}

proptest! {
    #[test]
    fn join_result_ignores_arrival_order(a in -50i32..50, b in -50i32..50) {
        let mut first = RollJoin::new();
        first.arm(ticket(7));
        first.offer(ticket(7), Side::Character, a);
        let x = first.offer(ticket(7), Side::Enemy, b);

        let mut second = RollJoin::new();
        second.arm(ticket(7));
        second.offer(ticket(7), Side::Enemy, b);
        let y = second.offer(ticket(7), Side::Character, a);

        prop_assert_eq!(x, Arrival::Joined { character: a, enemy: b });
        prop_assert_eq!(x, y);
    }
}
