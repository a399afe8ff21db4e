//! Integration tests for the waiting queue: ordering, idempotence, shuffles.

use rand::rngs::StdRng;
use rand::SeedableRng;
use volley_rotation_web::{Queue, RotationError};

fn queue_of(ids: &[&str]) -> Queue {
    let mut q = Queue::new();
    for id in ids {
        q.enqueue(id.to_string());
    }
    q
}

fn sorted(ids: &[String]) -> Vec<String> {
    let mut v = ids.to_vec();
    v.sort();
    v
}

#[test]
fn enqueue_is_idempotent() {
    let mut q = Queue::new();
    assert!(q.enqueue("p1".to_string()));
    assert!(!q.enqueue("p1".to_string()));
    assert_eq!(q.len(), 1);
    assert_eq!(q.ids(), ["p1".to_string()]);
}

#[test]
fn enqueue_keeps_arrival_order() {
    let q = queue_of(&["p1", "p2", "p3"]);
    assert_eq!(q.ids(), ["p1", "p2", "p3"]);
}

#[test]
fn dequeue_absent_is_a_noop() {
    let mut q = queue_of(&["p1", "p2"]);
    let before = q.clone();
    assert!(!q.dequeue("ghost"));
    assert_eq!(q, before);
}

#[test]
fn requeue_absent_is_a_noop() {
    let mut q = queue_of(&["p1", "p2"]);
    let before = q.clone();
    assert!(!q.requeue_to_tail("ghost"));
    assert_eq!(q, before);
}

#[test]
fn requeue_moves_player_to_tail() {
    let mut q = queue_of(&["p1", "p2", "p3"]);
    assert!(q.requeue_to_tail("p1"));
    assert_eq!(q.ids(), ["p2", "p3", "p1"]);
}

#[test]
fn take_front_returns_players_in_queue_order() {
    let mut q = queue_of(&["p1", "p2", "p3", "p4"]);
    let taken = q.take_front(3).unwrap();
    assert_eq!(taken, ["p1", "p2", "p3"]);
    assert_eq!(q.ids(), ["p4"]);
}

#[test]
fn take_front_fails_without_touching_the_queue() {
    let mut q = queue_of(&["p1", "p2"]);
    let before = q.clone();
    let err = q.take_front(3).unwrap_err();
    assert_eq!(
        err,
        RotationError::InsufficientQueue {
            required: 3,
            available: 2
        }
    );
    assert_eq!(q, before);
}

#[test]
fn shuffle_preserves_the_multiset_of_contents() {
    let mut q = queue_of(&["p1", "p2", "p3", "p4", "p5", "p6", "p7"]);
    let before = sorted(q.ids());
    let mut rng = StdRng::seed_from_u64(7);
    q.shuffle(&mut rng);
    assert_eq!(sorted(q.ids()), before);
}

#[test]
fn extend_shuffled_appends_after_existing_entries() {
    let mut q = queue_of(&["p1", "p2"]);
    let returning: Vec<String> = ["x1", "x2", "x3"].iter().map(|s| s.to_string()).collect();
    let mut rng = StdRng::seed_from_u64(7);
    q.extend_shuffled(returning.clone(), &mut rng);

    assert_eq!(q.len(), 5);
    // The front of the queue is untouched; the group lands behind it.
    assert_eq!(&q.ids()[..2], &["p1".to_string(), "p2".to_string()]);
    assert_eq!(sorted(&q.ids()[2..]), sorted(&returning));
}
