#![allow(dead_code)]

use std::collections::VecDeque;

use poker_table::domain::card::{parse_cards, Card};
use poker_table::domain::deck::Deck;
use poker_table::domain::settings::GameSettings;
use poker_table::domain::table::GameState;
use poker_table::domain::Chips;
use poker_table::engine::{ActionType, EngineError, GameEngine, RandomSource};

/// Deck source that stacks the deck so that chosen cards are dealt in a
/// chosen order. Hands beyond the scripted ones get an unshuffled deck.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    permutations: VecDeque<Vec<usize>>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a hand whose cards come off the deck in `deal_order`; `None`
    /// slots (burns, don't-care cards) take any card not otherwise used.
    pub fn then_deal(mut self, deal_order: Vec<Option<Card>>) -> Self {
        let fresh = Deck::standard_52().cards;
        let wanted: Vec<Card> = deal_order.iter().flatten().copied().collect();
        let mut spare = fresh.iter().copied().filter(|c| !wanted.contains(c));

        let mut dealt: Vec<Card> = deal_order
            .into_iter()
            .map(|slot| slot.or_else(|| spare.next()).expect("deck exhausted"))
            .collect();
        let mut final_deck: Vec<Card> = spare.collect();
        // Cards are drawn from the back.
        dealt.reverse();
        final_deck.extend(dealt);
        assert_eq!(final_deck.len(), 52, "script reuses a card");

        let permutation = final_deck
            .iter()
            .map(|c| fresh.iter().position(|f| f == c).expect("known card"))
            .collect();
        self.permutations.push_back(permutation);
        self
    }
}

impl RandomSource for ScriptedRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        let Some(perm) = self.permutations.pop_front() else {
            return;
        };
        assert_eq!(perm.len(), slice.len());
        // slice[i] becomes old slice[perm[i]].
        for i in 0..perm.len() {
            let mut j = perm[i];
            while j < i {
                j = perm[j];
            }
            slice.swap(i, j);
        }
    }
}

pub fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid cards")
}

/// Deal order for one hold'em hand.
///
/// `holes` lists hole cards per player in dealing order (first seat left of
/// the button first), e.g. `["AsKs", "7c2d"]`. `board` is five cards.
pub fn holdem_deal(holes: &[&str], board: &str) -> Vec<Option<Card>> {
    let holes: Vec<Vec<Card>> = holes
        .iter()
        .map(|h| {
            let (a, b) = h.split_at(2);
            cards(&format!("{a} {b}"))
        })
        .collect();
    let board = cards(board);
    assert_eq!(board.len(), 5);

    let mut order = Vec::new();
    for round in 0..2 {
        order.extend(holes.iter().map(|h| Some(h[round])));
    }
    order.push(None);
    order.extend(board[..3].iter().copied().map(Some));
    order.push(None);
    order.push(Some(board[3]));
    order.push(None);
    order.push(Some(board[4]));
    order
}

pub fn settings(small_blind: u64, big_blind: u64, stack: u64) -> GameSettings {
    GameSettings::with_blinds(small_blind, big_blind, stack)
}

/// Table with players "p0".."p{n-1}" seated, not started.
pub fn seated_table<R: RandomSource>(n: usize, settings: GameSettings, rng: R) -> GameEngine<R> {
    let mut engine = GameEngine::with_rng(1, "TEST01", settings, rng).expect("valid settings");
    for i in 0..n {
        engine
            .add_player(format!("p{i}"), format!("Player {i}"))
            .expect("seat available");
    }
    engine
}

/// Table already in its first hand.
pub fn started_table<R: RandomSource>(n: usize, settings: GameSettings, rng: R) -> GameEngine<R> {
    let mut engine = seated_table(n, settings, rng);
    engine.start_game("p0").expect("game starts");
    engine
}

pub fn act<R: RandomSource>(
    engine: &mut GameEngine<R>,
    player: &str,
    action: ActionType,
) -> Result<GameState, EngineError> {
    engine
        .process_player_action(player, action, None)
        .map(Clone::clone)
}

pub fn raise_to<R: RandomSource>(
    engine: &mut GameEngine<R>,
    player: &str,
    amount: u64,
) -> Result<GameState, EngineError> {
    engine
        .process_player_action(player, ActionType::Raise, Some(Chips(amount)))
        .map(Clone::clone)
}

pub fn stack_of(state: &GameState, player: &str) -> u64 {
    state.player(player).expect("seated").stack.0
}

pub fn active_id(state: &GameState) -> Option<&str> {
    state.active_player_id().map(String::as_str)
}

/// Check when possible, otherwise call; until the hand ends.
pub fn check_it_down<R: RandomSource>(engine: &mut GameEngine<R>) {
    while let Some(id) = engine.get_state().active_player_id().cloned() {
        let action = if engine.legal_actions().contains(&ActionType::Check) {
            ActionType::Check
        } else {
            ActionType::Call
        };
        engine
            .process_player_action(&id, action, None)
            .expect("passive action is legal");
    }
}

/// Deal for `play_bust_hand`: p0 holds aces, p2 seven-deuce.
pub fn bust_hand_deal() -> Vec<Option<Card>> {
    // Button on p0: p1, p2, p0 are dealt in that order.
    holdem_deal(&["Kd9c", "7c2d", "AsAh"], "Kc Qd 8h 5s 3c")
}

/// Three players at 10/20 with 1000 each: p0 shoves, p1 folds the small
/// blind, p2 calls off and loses. Ends with p0 2010, p1 990, p2 0.
pub fn play_bust_hand<R: RandomSource>(engine: &mut GameEngine<R>) {
    raise_to(engine, "p0", 5_000).expect("shove");
    act(engine, "p1", ActionType::Fold).expect("fold");
    act(engine, "p2", ActionType::Call).expect("call off");

    let state = engine.get_state();
    assert_eq!(stack_of(state, "p0"), 2010);
    assert_eq!(stack_of(state, "p1"), 990);
    assert_eq!(stack_of(state, "p2"), 0);
}
