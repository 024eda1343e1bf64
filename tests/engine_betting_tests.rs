// tests/engine_betting_tests.rs

mod common;

use common::{
    act, active_id, bust_hand_deal, play_bust_hand, raise_to, settings, started_table,
    ScriptedRng,
};

use poker_table::domain::player::Player;
use poker_table::domain::{Chips, Phase};
use poker_table::engine::{
    validate_action, ActionType, BettingRound, EngineError, IllegalAction, ValidatedAction,
};

fn player(id: &str, seat: usize, stack: u64, bet: u64) -> Player {
    let mut p = Player::new(id.to_string(), id.to_string(), Chips(stack), seat);
    p.current_bet = Chips(bet);
    p
}

//
// BettingRound
//

#[test]
fn round_is_incomplete_until_everyone_has_acted() {
    let players = vec![player("a", 0, 100, 0), player("b", 1, 100, 0)];
    let mut round = BettingRound::new(Phase::Flop, Chips::ZERO, Chips(20));

    assert!(!round.is_complete(&players));
    assert_eq!(round.next_actor(&players, 0), Some(1));

    round.mark_acted(1);
    assert_eq!(round.next_actor(&players, 1), Some(0));
    round.mark_acted(0);
    assert!(round.is_complete(&players));
    assert_eq!(round.next_actor(&players, 0), None);
}

#[test]
fn full_raise_reopens_action_for_everyone_else() {
    let mut players = vec![player("a", 0, 100, 0), player("b", 1, 60, 40)];
    let mut round = BettingRound::new(Phase::Flop, Chips::ZERO, Chips(20));
    round.mark_acted(0);
    round.on_full_raise(1, Chips(40));

    assert_eq!(round.current_bet, Chips(40));
    assert_eq!(round.min_raise, Chips(40));
    assert_eq!(round.last_aggressor, Some(1));
    assert!(!round.has_acted(0));
    assert_eq!(round.next_actor(&players, 1), Some(0));

    players[0].current_bet = Chips(40);
    round.mark_acted(0);
    assert!(round.is_complete(&players));
}

#[test]
fn lone_player_facing_an_all_in_must_still_act() {
    let mut shover = player("a", 0, 0, 300);
    shover.is_all_in = true;
    let players = vec![shover, player("b", 1, 500, 0)];
    let mut round = BettingRound::new(Phase::Turn, Chips::ZERO, Chips(20));
    round.on_full_raise(0, Chips(300));

    assert!(!round.is_complete(&players));
    assert_eq!(round.next_actor(&players, 0), Some(1));
}

#[test]
fn lone_player_who_has_matched_ends_the_round() {
    let mut shover = player("a", 0, 0, 20);
    shover.is_all_in = true;
    // Big blind covered by an all-in caller: nobody left to bet against.
    let players = vec![shover, player("b", 1, 500, 20)];
    let round = BettingRound::new(Phase::PreFlop, Chips(20), Chips(20));

    assert!(round.is_complete(&players));
}

#[test]
fn short_all_ins_that_add_up_to_a_full_raise_reopen_action() {
    let caller = player("a", 0, 980, 20);
    let mut round = BettingRound::new(Phase::PreFlop, Chips(20), Chips(20));
    round.mark_acted(0);

    round.on_short_raise(1, Chips(35));
    assert!(round.has_acted(0));
    assert_eq!(
        validate_action(&caller, 0, ActionType::AllIn, None, &round, true),
        Err(IllegalAction::BettingNotReopened)
    );

    // 35 -> 45 is short on its own, but 20 -> 45 is a full raise.
    round.on_short_raise(2, Chips(45));
    assert!(!round.has_acted(0));
    assert_eq!(round.last_aggressor, Some(2));
    assert_eq!(round.min_raise, Chips(20));
    assert_eq!(
        validate_action(&caller, 0, ActionType::Raise, Some(Chips(65)), &round, true),
        Ok(ValidatedAction::Raise { to: Chips(65) })
    );
}

#[test]
fn all_in_for_a_call_is_allowed_after_acting() {
    let short = player("a", 0, 10, 20);
    let mut round = BettingRound::new(Phase::PreFlop, Chips(20), Chips(20));
    round.mark_acted(0);
    round.on_short_raise(1, Chips(35));

    assert_eq!(
        validate_action(&short, 0, ActionType::AllIn, None, &round, true),
        Ok(ValidatedAction::AllIn { to: Chips(30) })
    );
}

//
// engine-level betting
//

#[test]
fn raise_with_no_opponent_left_to_act_is_rejected() {
    let mut engine = started_table(2, settings(10, 20, 1000), ScriptedRng::new());
    raise_to(&mut engine, "p0", 5_000).unwrap();

    let err = raise_to(&mut engine, "p1", 2_000).unwrap_err();
    assert_eq!(err, EngineError::InvalidAction(IllegalAction::NoOpponentCanAct));

    let state = act(&mut engine, "p1", ActionType::Call).unwrap();
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.community_cards.len(), 5);
    assert_eq!(state.total_chips(), Chips(2000));
}

#[test]
fn short_all_in_does_not_reopen_betting() {
    let rng = ScriptedRng::new().then_deal(bust_hand_deal());
    let mut engine = started_table(3, settings(10, 20, 1000), rng);
    play_bust_hand(&mut engine);

    engine.rebuy("p2", Chips(35)).unwrap();
    let state = engine.next_hand("p0").unwrap().clone();
    assert_eq!(state.dealer_position, Some(1));
    assert_eq!(state.small_blind_position, Some(2));
    assert_eq!(state.big_blind_position, Some(0));
    assert_eq!(active_id(&state), Some("p1"));

    act(&mut engine, "p1", ActionType::Call).unwrap();
    // 10 posted + 25 behind: five short of a full raise.
    let state = act(&mut engine, "p2", ActionType::AllIn).unwrap();
    assert_eq!(state.current_bet, Chips(35));
    assert_eq!(state.min_raise, Chips(20));
    assert_eq!(active_id(&state), Some("p0"));

    // The big blind has not acted yet and may still raise.
    assert!(engine.legal_actions().contains(&ActionType::Raise));
    act(&mut engine, "p0", ActionType::Call).unwrap();

    assert_eq!(active_id(engine.get_state()), Some("p1"));
    assert!(!engine.legal_actions().contains(&ActionType::Raise));
    let err = raise_to(&mut engine, "p1", 100).unwrap_err();
    assert_eq!(err, EngineError::InvalidAction(IllegalAction::BettingNotReopened));

    let state = act(&mut engine, "p1", ActionType::Call).unwrap();
    assert_eq!(state.phase, Phase::Flop);
    assert_eq!(state.pot, Chips(105));
}

#[test]
fn shoving_cannot_dodge_a_closed_raise() {
    let rng = ScriptedRng::new().then_deal(bust_hand_deal());
    let mut engine = started_table(3, settings(10, 20, 1000), rng);
    play_bust_hand(&mut engine);

    engine.rebuy("p2", Chips(35)).unwrap();
    engine.next_hand("p0").unwrap();
    act(&mut engine, "p1", ActionType::Call).unwrap();
    act(&mut engine, "p2", ActionType::AllIn).unwrap();
    act(&mut engine, "p0", ActionType::Call).unwrap();

    let before = engine.get_state().clone();
    assert_eq!(active_id(&before), Some("p1"));
    assert_eq!(engine.legal_actions(), [ActionType::Fold, ActionType::Call]);

    let err = act(&mut engine, "p1", ActionType::AllIn).unwrap_err();
    assert_eq!(err, EngineError::InvalidAction(IllegalAction::BettingNotReopened));
    let err = raise_to(&mut engine, "p1", 5_000).unwrap_err();
    assert_eq!(err, EngineError::InvalidAction(IllegalAction::BettingNotReopened));
    assert_eq!(engine.get_state(), &before);
    assert_eq!(before.current_bet, Chips(35));
}

#[test]
fn all_in_call_for_less_keeps_the_bet_level() {
    let rng = ScriptedRng::new().then_deal(bust_hand_deal());
    let mut engine = started_table(3, settings(10, 20, 1000), rng);
    play_bust_hand(&mut engine);

    engine.rebuy("p2", Chips(50)).unwrap();
    engine.next_hand("p0").unwrap();

    raise_to(&mut engine, "p1", 200).unwrap();
    let state = act(&mut engine, "p2", ActionType::Call).unwrap();

    let p2 = state.player("p2").unwrap();
    assert!(p2.is_all_in);
    assert_eq!(p2.current_bet, Chips(50));
    assert_eq!(state.current_bet, Chips(200));
    assert_eq!(state.history.last().unwrap().amount, Some(Chips(40)));
    assert_eq!(active_id(&state), Some("p0"));
}

#[test]
fn short_call_puts_the_caller_all_in() {
    let rng = ScriptedRng::new().then_deal(bust_hand_deal());
    let mut engine = started_table(3, settings(10, 20, 1000), rng);
    play_bust_hand(&mut engine);

    // Small blind of 10 leaves 30 behind.
    engine.rebuy("p2", Chips(40)).unwrap();
    engine.next_hand("p0").unwrap();
    raise_to(&mut engine, "p1", 200).unwrap();

    let prior = engine.get_state().player("p2").unwrap().clone();
    assert_eq!(prior.stack, Chips(30));

    let state = act(&mut engine, "p2", ActionType::Call).unwrap();
    let p2 = state.player("p2").unwrap();
    assert!(p2.is_all_in);
    assert_eq!(p2.stack, Chips::ZERO);

    let last = state.history.last().unwrap();
    assert_eq!(last.player_id, "p2");
    assert_eq!(last.action, ActionType::Call);
    assert_eq!(last.amount, Some(Chips(30)));
    assert_eq!(last.bet_to, prior.current_bet + Chips(30));
    assert_eq!(last.current_bet_after, Chips(200));
}
