// tests/engine_actions_tests.rs

mod common;

use common::{act, active_id, raise_to, seated_table, settings, stack_of, started_table, ScriptedRng};

use poker_table::domain::{Chips, Phase};
use poker_table::engine::{ActionType, EngineError, HandEndReason, IllegalAction};

fn three_handed() -> poker_table::GameEngine<ScriptedRng> {
    started_table(3, settings(10, 20, 1000), ScriptedRng::new())
}

//
// turn order
//

#[test]
fn acting_out_of_turn_is_rejected_without_side_effects() {
    let mut engine = three_handed();
    let before = engine.get_state().clone();

    let err = act(&mut engine, "p1", ActionType::Call).unwrap_err();
    assert_eq!(
        err,
        EngineError::NotYourTurn {
            player: "p1".to_string(),
            expected: Some("p0".to_string()),
        }
    );
    assert_eq!(err.code(), "NotYourTurnError");
    assert_eq!(engine.get_state(), &before);
}

#[test]
fn unknown_player_is_not_on_turn() {
    let mut engine = three_handed();
    let err = act(&mut engine, "ghost", ActionType::Fold).unwrap_err();
    assert!(matches!(err, EngineError::NotYourTurn { .. }));
}

#[test]
fn actions_need_a_running_hand() {
    let mut engine = seated_table(2, settings(10, 20, 1000), ScriptedRng::new());
    assert_eq!(
        act(&mut engine, "p0", ActionType::Check).unwrap_err(),
        EngineError::NoActiveHand
    );
}

//
// illegal actions
//

#[test]
fn cannot_check_facing_the_big_blind() {
    let mut engine = three_handed();
    let err = act(&mut engine, "p0", ActionType::Check).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAction(IllegalAction::CannotCheck { to_call: Chips(20) })
    );
}

#[test]
fn call_with_nothing_owed_is_rejected() {
    let mut engine = three_handed();
    act(&mut engine, "p0", ActionType::Call).unwrap();
    act(&mut engine, "p1", ActionType::Call).unwrap();

    let err = act(&mut engine, "p2", ActionType::Call).unwrap_err();
    assert_eq!(err, EngineError::InvalidAction(IllegalAction::NothingToCall));
}

#[test]
fn raise_needs_an_amount() {
    let mut engine = three_handed();
    let err = act(&mut engine, "p0", ActionType::Raise).unwrap_err();
    assert_eq!(err, EngineError::InvalidAction(IllegalAction::MissingAmount));
}

#[test]
fn raise_must_exceed_the_current_bet() {
    let mut engine = three_handed();
    let err = raise_to(&mut engine, "p0", 20).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAction(IllegalAction::RaiseNotAboveBet {
            amount: Chips(20),
            current_bet: Chips(20),
        })
    );
}

#[test]
fn raise_below_minimum_increment_is_rejected() {
    let mut engine = three_handed();
    let err = raise_to(&mut engine, "p0", 30).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAction(IllegalAction::RaiseTooSmall {
            amount: Chips(30),
            minimum: Chips(40),
        })
    );
    assert_eq!(err.code(), "InvalidActionError");
}

#[test]
fn minimum_reraise_tracks_the_last_full_raise() {
    let mut engine = three_handed();

    let state = raise_to(&mut engine, "p0", 60).unwrap();
    assert_eq!(state.current_bet, Chips(60));
    assert_eq!(state.min_raise, Chips(40));
    assert_eq!(engine.min_raise_to(), Some(Chips(100)));

    let err = raise_to(&mut engine, "p1", 90).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidAction(IllegalAction::RaiseTooSmall { minimum: Chips(100), .. })
    ));

    let state = raise_to(&mut engine, "p1", 100).unwrap();
    assert_eq!(state.current_bet, Chips(100));
    assert_eq!(stack_of(&state, "p1"), 900);
    assert_eq!(active_id(&state), Some("p2"));
}

#[test]
fn opening_bet_after_the_flop_is_a_raise_from_zero() {
    let mut engine = three_handed();
    act(&mut engine, "p0", ActionType::Call).unwrap();
    act(&mut engine, "p1", ActionType::Call).unwrap();
    act(&mut engine, "p2", ActionType::Check).unwrap();

    let err = raise_to(&mut engine, "p1", 10).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidAction(IllegalAction::RaiseTooSmall { minimum: Chips(20), .. })
    ));

    let state = raise_to(&mut engine, "p1", 20).unwrap();
    assert_eq!(state.current_bet, Chips(20));
    assert_eq!(state.pot, Chips(80));
}

//
// chip movement and history
//

#[test]
fn call_is_recorded_with_chips_moved() {
    let mut engine = three_handed();
    let state = act(&mut engine, "p0", ActionType::Call).unwrap();

    let last = state.history.last().unwrap();
    assert_eq!(last.player_id, "p0");
    assert_eq!(last.action, ActionType::Call);
    assert_eq!(last.amount, Some(Chips(20)));
    assert_eq!(last.bet_to, Chips(20));
    assert_eq!(last.current_bet_after, Chips(20));
    assert_eq!(last.phase, Phase::PreFlop);
    assert_eq!(last.hand_number, 1);
    assert_eq!(state.pot, Chips(50));
}

#[test]
fn oversized_raise_becomes_all_in() {
    let mut engine = three_handed();
    let state = raise_to(&mut engine, "p0", 5_000).unwrap();

    let p0 = state.player("p0").unwrap();
    assert!(p0.is_all_in);
    assert_eq!(p0.stack, Chips::ZERO);
    assert_eq!(state.current_bet, Chips(1000));
    assert_eq!(state.min_raise, Chips(980));

    let last = state.history.last().unwrap();
    assert_eq!(last.action, ActionType::AllIn);
    assert_eq!(last.amount, Some(Chips(1000)));
}

#[test]
fn fold_and_check_move_no_chips() {
    let mut engine = three_handed();
    let state = act(&mut engine, "p0", ActionType::Fold).unwrap();
    let last = state.history.last().unwrap();
    assert_eq!(last.action, ActionType::Fold);
    assert_eq!(last.amount, None);
    assert!(state.player("p0").unwrap().has_folded);
}

//
// hand ends on folds
//

#[test]
fn last_player_standing_takes_the_pot() {
    let mut engine = three_handed();
    act(&mut engine, "p0", ActionType::Fold).unwrap();
    let state = act(&mut engine, "p1", ActionType::Fold).unwrap();

    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.active_player_index, None);
    assert_eq!(state.pot, Chips::ZERO);
    assert_eq!(stack_of(&state, "p0"), 1000);
    assert_eq!(stack_of(&state, "p1"), 990);
    assert_eq!(stack_of(&state, "p2"), 1010);

    let result = state.last_hand_result.as_ref().unwrap();
    assert_eq!(result.reason, HandEndReason::Fold);
    assert_eq!(result.pot, Chips(30));
    assert_eq!(result.amount_won("p2"), Chips(30));
    assert!(result.showdown.is_empty());
    assert_eq!(result.actions.len(), 2);
    assert_eq!(result.net_by_player()["p1"], -10);

    assert_eq!(
        act(&mut engine, "p2", ActionType::Check).unwrap_err(),
        EngineError::NoActiveHand
    );
}

#[test]
fn fold_win_keeps_hole_cards_private() {
    let mut engine = three_handed();
    act(&mut engine, "p0", ActionType::Fold).unwrap();
    act(&mut engine, "p1", ActionType::Fold).unwrap();

    let view = engine.get_state_for_player("p0");
    assert_eq!(view.player("p0").unwrap().cards.len(), 2);
    assert!(view.player("p1").unwrap().cards.is_empty());
    assert!(view.player("p2").unwrap().cards.is_empty());
}

#[test]
fn mid_hand_view_hides_other_hole_cards() {
    let engine = three_handed();
    let view = engine.get_state_for_player("p1");

    assert_eq!(view.player("p1").unwrap().cards.len(), 2);
    assert!(view.player("p0").unwrap().cards.is_empty());
    assert!(view.player("p2").unwrap().cards.is_empty());
    // Full state still has everything.
    assert_eq!(engine.get_state().player("p0").unwrap().cards.len(), 2);

    let spectator = engine.get_state_for_player("rail");
    assert!(spectator.players.iter().all(|p| p.cards.is_empty()));
}
