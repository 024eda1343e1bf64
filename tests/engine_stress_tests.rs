// tests/engine_stress_tests.rs
//
// Random legal play on seeded decks. Every step must keep the chip count
// intact and leave the table in a consistent phase.

mod common;

use proptest::prelude::*;

use common::settings;

use poker_table::domain::{Chips, Phase};
use poker_table::engine::ActionType;
use poker_table::infra::DeterministicRng;
use poker_table::GameEngine;

const MAX_ACTIONS_PER_HAND: usize = 400;

fn seeded_table(players: usize, seed: u64, stack: u64) -> GameEngine<DeterministicRng> {
    let mut engine =
        GameEngine::with_rng(1, "SEED01", settings(5, 10, stack), DeterministicRng::from_seed(seed))
            .unwrap();
    for i in 0..players {
        engine.add_player(format!("p{i}"), format!("P{i}")).unwrap();
    }
    engine.start_game("p0").unwrap();
    engine
}

fn board_len_fits(phase: Phase, len: usize) -> bool {
    match phase {
        Phase::PreFlop => len == 0,
        Phase::Flop => len == 3,
        Phase::Turn => len == 4,
        Phase::River | Phase::Showdown => len == 5,
        Phase::Finished => len <= 5,
        Phase::Waiting => len == 0,
    }
}

/// Play one hand to the end, picking actions from `choices`.
fn play_hand(
    engine: &mut GameEngine<DeterministicRng>,
    choices: &[u8],
    cursor: &mut usize,
    total: Chips,
) -> Result<(), TestCaseError> {
    for _ in 0..MAX_ACTIONS_PER_HAND {
        let state = engine.get_state();
        let Some(actor) = state.active_player() else {
            return Ok(());
        };
        prop_assert!(actor.can_act(), "{} is on turn but cannot act", actor.id);
        let actor = actor.id.clone();

        let legal = engine.legal_actions();
        prop_assert!(!legal.is_empty());
        let pick = choices[*cursor % choices.len()];
        *cursor += 1;
        let action = legal[pick as usize % legal.len()];

        let amount = match action {
            ActionType::Raise => {
                let min = engine.min_raise_to().unwrap();
                Some(min + Chips(u64::from(pick % 4) * 10))
            }
            _ => None,
        };

        let state = engine
            .process_player_action(&actor, action, amount)
            .map_err(|e| TestCaseError::fail(format!("{actor} {action}: {e}")))?;

        prop_assert_eq!(state.total_chips(), total);
        prop_assert!(board_len_fits(state.phase, state.community_cards.len()));
        if state.phase.is_betting() {
            prop_assert!(state.active_player_index.is_some());
        }
    }
    Err(TestCaseError::fail("hand did not finish"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_conserves_chips(
        players in 2usize..=10,
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<u8>(), 1..256),
    ) {
        let stack = 200;
        let total = Chips(stack * players as u64);
        let mut engine = seeded_table(players, seed, stack);
        let mut cursor = 0;

        for _ in 0..8 {
            play_hand(&mut engine, &choices, &mut cursor, total)?;

            let state = engine.get_state();
            prop_assert_eq!(state.phase, Phase::Finished);
            prop_assert_eq!(state.pot, Chips::ZERO);
            prop_assert_eq!(state.total_chips(), total);
            let result = state.last_hand_result.as_ref().unwrap();
            let won: Chips = result.winners.iter().map(|w| w.amount).sum();
            prop_assert_eq!(won, result.pot);

            let funded = state.players.iter().filter(|p| !p.stack.is_zero()).count();
            if funded < 2 {
                break;
            }
            engine.next_hand("p0").unwrap();
        }
    }
}

#[test]
fn same_seed_deals_the_same_cards() {
    let a = seeded_table(6, 42, 1000);
    let b = seeded_table(6, 42, 1000);
    let hole = |e: &GameEngine<DeterministicRng>| {
        e.get_state()
            .players
            .iter()
            .map(|p| p.cards.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(hole(&a), hole(&b));
}

#[test]
fn busting_down_to_one_stack_stops_the_table() {
    let mut engine = seeded_table(2, 7, 100);
    for _ in 0..200 {
        if engine.get_state().hand_in_progress() {
            let actor = engine.get_state().active_player_id().cloned().unwrap();
            engine
                .process_player_action(&actor, ActionType::AllIn, None)
                .unwrap();
            continue;
        }
        if engine.next_hand("p0").is_err() {
            break;
        }
    }
    let state = engine.get_state();
    let funded: Vec<_> = state.players.iter().filter(|p| !p.stack.is_zero()).collect();
    assert_eq!(funded.len(), 1);
    assert_eq!(funded[0].stack, Chips(200));
}
