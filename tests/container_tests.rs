//! Obligation container integration tests.
//!
//! These tests verify the stack and queue orders, the anytime pool, and the
//! all-or-nothing contract every container method keeps.

use proptest::prelude::*;

use tabletop_turns::core::{ActionType, ObligationError, WireError};
use tabletop_turns::obligation::Obligation;
use tabletop_turns::stack::{ObligationContainer, ObligationQueue, ObligationStack, QueueSlot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Step {
    Move,
    Draw,
    Discard,
    Bonus,
}

const STEPS: [Step; 4] = [Step::Move, Step::Draw, Step::Discard, Step::Bonus];

impl ActionType for Step {
    fn name(self) -> &'static str {
        match self {
            Step::Move => "Move",
            Step::Draw => "Draw",
            Step::Discard => "Discard",
            Step::Bonus => "Bonus",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        STEPS.iter().copied().find(|step| step.name() == name)
    }
}

fn location_follow_ups() -> Vec<Obligation<Step>> {
    vec![
        Obligation::repeat_action(0, 2, Step::Draw),
        Obligation::mandatory(Step::Discard),
    ]
}

// =============================================================================
// Stack Tests
// =============================================================================

/// Follow-ups pushed together resolve first to last, ahead of older work.
#[test]
fn test_stack_batch_order() {
    let mut stack = ObligationStack::new();
    stack.push_one(Obligation::mandatory(Step::Move));
    stack.push(location_follow_ups());

    assert_eq!(stack.len(), 3);
    assert!(stack.can_perform(Step::Draw));
    assert!(!stack.can_perform(Step::Discard));

    stack.skip().unwrap();
    assert!(stack.can_perform(Step::Discard));
    stack.perform(Step::Discard).unwrap();
    assert!(stack.can_perform(Step::Move));
}

/// A stack only ever exposes the top obligation's action types.
#[test]
fn test_stack_possible_actions_from_top_only() {
    let mut stack = ObligationStack::new();
    stack.push_one(Obligation::optional(Step::Bonus));
    stack.push_one(Obligation::any_of_actions([Step::Draw, Step::Discard]));

    let mut possible: Vec<_> = stack.possible_action_types().into_iter().map(Step::name).collect();
    possible.sort_unstable();
    assert_eq!(possible, vec!["Discard", "Draw"]);
}

/// Nothing pending is its own error, distinct from a refused move.
#[test]
fn test_stack_empty_errors() {
    let mut stack = ObligationStack::<Step>::new();
    assert_eq!(stack.perform(Step::Move), Err(ObligationError::NoActionAvailable));
    assert_eq!(stack.skip(), Err(ObligationError::NoActionAvailable));
    assert!(!stack.can_skip());
    assert!(stack.skip_all().is_ok());
}

/// A persisted stack with a corrupt tree is refused.
#[test]
fn test_stack_rejects_corrupt_json() {
    let json = r#"{"obligations":[{"repeat":{"atLeast":3,"atMost":1,
        "template":{"single":{"action":"Draw","mandatory":true,"completed":false}},
        "current":null,"count":0}}]}"#;
    let err = ObligationStack::<Step>::from_json(json).unwrap_err();
    assert!(matches!(err, WireError::Corrupt { .. }));
}

// =============================================================================
// Queue Tests
// =============================================================================

/// Follow-ups join the front of the queue, ahead of older work.
#[test]
fn test_queue_follow_ups_first() {
    let mut queue = ObligationQueue::new();
    queue.push_one(Obligation::mandatory(Step::Move));
    queue.perform(Step::Move).unwrap();
    queue.push(location_follow_ups());
    queue.push_one(Obligation::optional(Step::Bonus));

    assert!(queue.can_perform(Step::Bonus));
    assert!(!queue.can_perform(Step::Draw));
    queue.skip().unwrap();
    assert!(queue.can_perform(Step::Draw));
}

/// Anytime bonus plays interleave between queued obligations.
#[test]
fn test_queue_any_time_between_obligations() {
    let mut queue = ObligationQueue::new();
    queue.push(location_follow_ups());
    queue.push_any_time(Obligation::repeat_action(0, 2, Step::Bonus));

    queue.perform(Step::Bonus).unwrap();
    assert_eq!(queue.current_slot(), Some(QueueSlot::AnyTime(0)));
    assert!(!queue.can_perform(Step::Draw));

    queue.release_current();
    queue.perform(Step::Draw).unwrap();
    queue.perform(Step::Draw).unwrap();
    assert_eq!(queue.queue_len(), 1);

    queue.perform(Step::Bonus).unwrap();
    assert_eq!(queue.any_time_len(), 0);
    queue.perform(Step::Discard).unwrap();
    assert!(queue.is_empty());
}

/// Once the queue runs dry, unused anytime obligations lapse on skip.
#[test]
fn test_queue_any_time_lapses() {
    let mut queue = ObligationQueue::new();
    queue.push_one(Obligation::optional(Step::Move));
    queue.push_any_time(Obligation::optional(Step::Bonus));
    assert_eq!(queue.len(), 2);

    queue.skip_all().unwrap();
    assert!(queue.is_empty());
}

/// A refused skip_all leaves the queue untouched, current slot included.
#[test]
fn test_queue_skip_all_is_atomic() {
    let mut queue = ObligationQueue::new();
    queue.push(location_follow_ups());
    queue.perform(Step::Draw).unwrap();
    let before = queue.clone();

    assert_eq!(queue.skip_all(), Err(ObligationError::CannotSkipAction));
    assert_eq!(queue, before);
}

/// Queue state survives persistence with its current slot.
#[test]
fn test_queue_json_round_trip() {
    let mut queue = ObligationQueue::new();
    queue.push(location_follow_ups());
    queue.push_any_time(Obligation::repeat_action(0, 2, Step::Bonus));
    queue.perform(Step::Bonus).unwrap();

    let back = ObligationQueue::<Step>::from_json(&queue.to_json().unwrap()).unwrap();
    assert_eq!(back, queue);
    assert_eq!(back.current_slot(), Some(QueueSlot::AnyTime(0)));
}

// =============================================================================
// Shared Tests
// =============================================================================

fn half_done_any() -> Obligation<Step> {
    Obligation::any([
        Obligation::repeat_action(1, 3, Step::Draw),
        Obligation::mandatory(Step::Move),
    ])
}

/// Skipping a started Any drops only its branch; the rest stays pending.
#[test]
fn test_half_done_any_survives_skip_in_both_containers() {
    let mut stack = ObligationStack::new();
    stack.push_one(half_done_any());
    stack.perform(Step::Draw).unwrap();
    stack.skip().unwrap();
    assert_eq!(stack.len(), 1);
    assert!(stack.can_perform(Step::Move));

    let mut queue = ObligationQueue::new();
    queue.push_one(half_done_any());
    queue.perform(Step::Draw).unwrap();
    queue.skip().unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.current_slot(), None);
    assert!(queue.can_perform(Step::Move));

    queue.perform(Step::Move).unwrap();
    assert!(queue.is_empty());
}

// =============================================================================
// Container Laws
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Perform(Step),
    Skip,
    SkipAll,
    Push,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => proptest::sample::select(STEPS.to_vec()).prop_map(Op::Perform),
        2 => Just(Op::Skip),
        1 => Just(Op::SkipAll),
        1 => Just(Op::Push),
    ]
}

/// Apply `op`, checking that a refused call changes nothing.
fn apply<C>(container: &mut C, op: &Op) -> Result<(), TestCaseError>
where
    C: ObligationContainer<Step> + Clone + PartialEq + std::fmt::Debug,
{
    let before = container.clone();
    let result = match op {
        Op::Perform(step) => {
            let allowed = container.can_perform(*step);
            let result = container.perform(*step);
            prop_assert_eq!(allowed, result.is_ok());
            result
        }
        Op::Skip => {
            let allowed = container.can_skip();
            let result = container.skip();
            prop_assert_eq!(allowed, result.is_ok());
            result
        }
        Op::SkipAll => {
            let result = container.skip_all();
            if result.is_ok() {
                prop_assert!(container.is_empty());
            }
            result
        }
        Op::Push => {
            container.push(location_follow_ups());
            Ok(())
        }
    };
    if result.is_err() {
        prop_assert_eq!(&*container, &before);
    }
    Ok(())
}

proptest! {
    /// Stack calls are all-or-nothing and `can_*` predicts their outcome.
    #[test]
    fn prop_stack_all_or_nothing(ops in prop::collection::vec(op(), 0..24)) {
        let mut stack = ObligationStack::new();
        stack.push_one(Obligation::mandatory(Step::Move));
        for op in &ops {
            apply(&mut stack, op)?;
        }
        let back = ObligationStack::<Step>::from_json(&stack.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, stack);
    }

    /// Queue calls are all-or-nothing and `can_*` predicts their outcome.
    #[test]
    fn prop_queue_all_or_nothing(ops in prop::collection::vec(op(), 0..24)) {
        let mut queue = ObligationQueue::new();
        queue.push_one(Obligation::mandatory(Step::Move));
        queue.push_any_time(Obligation::repeat_action(0, 3, Step::Bonus));
        for op in &ops {
            apply(&mut queue, op)?;
        }
        let back = ObligationQueue::<Step>::from_json(&queue.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, queue);
    }
}
