use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandRank, Phase};
use crate::domain::player::Player;
use crate::domain::settings::{AnteType, GameSettings};
use crate::domain::table::GameState;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::actions::ActionType;
use crate::engine::betting::BettingRound;
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{
    credit, GameAction, HandEndReason, HandResult, PotAward, SeatSnapshot, ShowdownHand,
    TableSnapshot, WinnerShare,
};
use crate::engine::positions::{
    blind_seats, next_dealer, seats_clockwise_after, table_labels, PositionLabel,
};
use crate::engine::side_pots::{compute_side_pots, split_pot, Contribution};
use crate::engine::validation::{recorded_type, validate_action, ValidatedAction};
use crate::engine::RandomSource;
use crate::eval::{hand_category, HandEvaluator};
use crate::infra::SystemRng;

/// Engine-private bookkeeping for the hand being played.
#[derive(Clone, Debug)]
struct HandContext {
    deck: Deck,
    betting: BettingRound,
    /// Chips each seat put in this hand, antes included.
    contributions: Vec<Chips>,
    stacks_start: BTreeMap<PlayerId, Chips>,
    seating: Vec<SeatSnapshot>,
    started_at: DateTime<Utc>,
}

impl HandContext {
    fn idle(big_blind: Chips) -> Self {
        Self {
            deck: Deck { cards: Vec::new() },
            betting: BettingRound::new(Phase::Waiting, Chips::ZERO, big_blind),
            contributions: Vec::new(),
            stacks_start: BTreeMap::new(),
            seating: Vec::new(),
            started_at: Utc::now(),
        }
    }
}

/// One poker table: owns the authoritative `GameState` and applies every
/// transition to it.
///
/// Each operation validates first and mutates second; an `Err` means the
/// state was not touched.
#[derive(Debug)]
pub struct GameEngine<R: RandomSource = SystemRng> {
    state: GameState,
    evaluator: HandEvaluator,
    rng: R,
    hand: HandContext,
}

impl GameEngine<SystemRng> {
    pub fn new(
        id: TableId,
        code: impl Into<String>,
        settings: GameSettings,
    ) -> Result<Self, EngineError> {
        Self::with_rng(id, code, settings, SystemRng)
    }
}

impl<R: RandomSource> GameEngine<R> {
    pub fn with_rng(
        id: TableId,
        code: impl Into<String>,
        settings: GameSettings,
        rng: R,
    ) -> Result<Self, EngineError> {
        settings
            .validate()
            .map_err(|e| EngineError::InvalidSettings(e.to_string()))?;
        let evaluator = HandEvaluator::for_variant(settings.variant)
            .map_err(|e| EngineError::InvalidSettings(e.to_string()))?;

        let hand = HandContext::idle(settings.big_blind);
        let state = GameState::new(id, code.into(), settings);
        info!("table {} ({}) created", state.id, state.code);

        Ok(Self {
            state,
            evaluator,
            rng,
            hand,
        })
    }

    //
    // queries
    //

    pub fn get_state(&self) -> &GameState {
        &self.state
    }

    /// The state as `viewer` may see it: other players' hole cards are
    /// stripped unless they were shown down in the hand just finished.
    pub fn get_state_for_player(&self, viewer: &str) -> GameState {
        let mut view = self.state.clone();
        let reveal = self.showdown_revealed();
        for p in view.players.iter_mut() {
            let shown = reveal && p.is_in_hand();
            if p.id != viewer && !shown {
                p.cards.clear();
            }
        }
        view
    }

    pub fn betting_round(&self) -> &BettingRound {
        &self.hand.betting
    }

    /// Position names for the seats dealt into the current (or last) hand.
    pub fn position_labels(&self) -> Vec<(PlayerId, PositionLabel)> {
        let Some(dealer) = self.state.dealer_position else {
            return Vec::new();
        };
        table_labels(&self.state.players, dealer)
            .into_iter()
            .map(|(seat, label)| (self.state.players[seat].id.clone(), label))
            .collect()
    }

    /// Smallest legal raise target for the player to act, if any.
    pub fn min_raise_to(&self) -> Option<Chips> {
        self.state.active_player_index?;
        Some(self.hand.betting.current_bet + self.hand.betting.min_raise)
    }

    /// Action types the player to act may choose from right now. A raise is
    /// listed when the minimum raise would be accepted.
    pub fn legal_actions(&self) -> Vec<ActionType> {
        let Some(seat) = self.state.active_player_index else {
            return Vec::new();
        };
        let player = &self.state.players[seat];
        let opponents_can_act = self.opponents_can_act(seat);
        let min_to = self.min_raise_to();

        [
            ActionType::Fold,
            ActionType::Check,
            ActionType::Call,
            ActionType::Raise,
            ActionType::AllIn,
        ]
        .into_iter()
        .filter(|&action| {
            validate_action(
                player,
                seat,
                action,
                min_to,
                &self.hand.betting,
                opponents_can_act,
            )
            .is_ok()
        })
        .collect()
    }

    //
    // seating
    //

    pub fn add_player(
        &mut self,
        player_id: impl Into<PlayerId>,
        name: impl Into<String>,
    ) -> Result<&GameState, EngineError> {
        let player_id = player_id.into();
        self.ensure_open()?;
        if self.state.phase != Phase::Waiting {
            return Err(EngineError::GameAlreadyStarted);
        }
        if self.state.seat_of(&player_id).is_some() {
            return Err(EngineError::DuplicatePlayer(player_id));
        }
        let max_players = self.state.settings.max_players;
        if self.state.seated_count() >= max_players {
            return Err(EngineError::GameFull { max_players });
        }

        let seat = self.state.seated_count();
        let stack = self.state.settings.starting_stack;
        info!(
            "table {}: {} sits at seat {} with {}",
            self.state.code, player_id, seat, stack
        );
        self.state
            .players
            .push(Player::new(player_id, name.into(), stack, seat));
        self.touch();
        Ok(&self.state)
    }

    pub fn remove_player(&mut self, player_id: &str) -> Result<&GameState, EngineError> {
        self.ensure_open()?;
        if self.state.phase != Phase::Waiting {
            return Err(EngineError::GameActive);
        }
        let seat = self
            .state
            .seat_of(player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_string()))?;

        self.state.players.remove(seat);
        for (i, p) in self.state.players.iter_mut().enumerate() {
            p.position = i;
        }
        info!("table {}: {} left", self.state.code, player_id);
        self.touch();
        Ok(&self.state)
    }

    //
    // hand lifecycle
    //

    pub fn start_game(&mut self, requester_id: &str) -> Result<&GameState, EngineError> {
        self.ensure_open()?;
        if self.state.phase != Phase::Waiting {
            return Err(EngineError::GameAlreadyStarted);
        }
        let seated = self.state.seated_count();
        if seated < 2 {
            return Err(EngineError::NotEnoughPlayers(seated));
        }
        let dealer = next_dealer(&self.state.players, None)
            .ok_or(EngineError::NotEnoughPlayers(0))?;

        info!(
            "table {}: game started by {} with {} players",
            self.state.code, requester_id, seated
        );
        self.begin_hand(dealer)?;
        self.touch();
        Ok(&self.state)
    }

    pub fn next_hand(&mut self, requester_id: &str) -> Result<&GameState, EngineError> {
        self.ensure_open()?;
        match self.state.phase {
            Phase::Waiting => return Err(EngineError::GameNotStarted),
            Phase::Finished => {}
            _ => return Err(EngineError::HandInProgress),
        }
        let with_chips = self.players_with_chips();
        if with_chips < 2 {
            return Err(EngineError::NotEnoughPlayers(with_chips));
        }
        let dealer = next_dealer(&self.state.players, self.state.dealer_position)
            .ok_or(EngineError::NotEnoughPlayers(with_chips))?;

        debug!(
            "table {}: next hand requested by {}",
            self.state.code, requester_id
        );
        self.begin_hand(dealer)?;
        self.touch();
        Ok(&self.state)
    }

    /// Refill a busted player's stack between hands.
    ///
    /// `stack_range` is advisory: amounts outside it are logged and accepted.
    pub fn rebuy(&mut self, player_id: &str, amount: Chips) -> Result<&GameState, EngineError> {
        self.ensure_open()?;
        let seat = self
            .state
            .seat_of(player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_string()))?;
        if self.state.hand_in_progress() {
            return Err(EngineError::HandInProgress);
        }
        if amount.is_zero() {
            return Err(EngineError::RebuyNotAllowed("amount must be positive"));
        }
        if !self.state.players[seat].stack.is_zero() {
            return Err(EngineError::RebuyNotAllowed("stack is not empty"));
        }
        if self.state.total_chips().0.checked_add(amount.0).is_none() {
            return Err(EngineError::RebuyNotAllowed("amount exceeds table capacity"));
        }

        if let Some(range) = self.state.settings.stack_range {
            if !range.contains(amount) {
                warn!(
                    "table {}: rebuy of {} by {} outside stack range {}..={}",
                    self.state.code, amount, player_id, range.min, range.max
                );
            }
        }

        let player = &mut self.state.players[seat];
        player.stack = amount;
        player.is_active = true;
        info!("table {}: {} rebuys for {}", self.state.code, player_id, amount);
        self.touch();
        Ok(&self.state)
    }

    /// Close the table. A hand in progress is voided and every contribution
    /// goes back to its owner.
    pub fn end_game(&mut self) -> Result<&GameState, EngineError> {
        self.ensure_open()?;

        if self.state.hand_in_progress() {
            for (seat, p) in self.state.players.iter_mut().enumerate() {
                let refund = self
                    .hand
                    .contributions
                    .get(seat)
                    .copied()
                    .unwrap_or(Chips::ZERO);
                p.stack += refund;
                p.current_bet = Chips::ZERO;
            }
            warn!(
                "table {}: hand #{} aborted, {} refunded",
                self.state.code, self.state.hand_number, self.state.pot
            );
            self.hand.contributions.fill(Chips::ZERO);
            self.state.pot = Chips::ZERO;
            self.state.current_bet = Chips::ZERO;
        }

        let now = Utc::now();
        self.state.phase = Phase::Finished;
        self.state.active_player_index = None;
        self.state.ended_at = Some(now);
        self.state.updated_at = now;
        info!("table {} closed", self.state.code);
        Ok(&self.state)
    }

    //
    // betting
    //

    pub fn process_player_action(
        &mut self,
        player_id: &str,
        action: ActionType,
        amount: Option<Chips>,
    ) -> Result<&GameState, EngineError> {
        self.ensure_open()?;
        if !self.state.phase.is_betting() {
            return Err(EngineError::NoActiveHand);
        }
        let seat = match self.state.active_player_index {
            Some(seat) if self.state.players[seat].id == player_id => seat,
            expected => {
                return Err(EngineError::NotYourTurn {
                    player: player_id.to_string(),
                    expected: expected.map(|s| self.state.players[s].id.clone()),
                })
            }
        };

        let validated = validate_action(
            &self.state.players[seat],
            seat,
            action,
            amount,
            &self.hand.betting,
            self.opponents_can_act(seat),
        )?;

        self.apply(seat, validated);

        let in_hand = self.state.players.iter().filter(|p| p.is_in_hand()).count();
        if in_hand == 1 {
            self.finish_uncontested();
        } else if self.hand.betting.is_complete(&self.state.players) {
            self.advance_street();
        } else {
            self.state.active_player_index = self.hand.betting.next_actor(&self.state.players, seat);
        }

        self.touch();
        Ok(&self.state)
    }

    //
    // internals
    //

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.state.is_ended() {
            Err(EngineError::GameEnded)
        } else {
            Ok(())
        }
    }

    fn touch(&mut self) {
        self.state.updated_at = Utc::now();
    }

    fn players_with_chips(&self) -> usize {
        self.state
            .players
            .iter()
            .filter(|p| !p.stack.is_zero())
            .count()
    }

    fn opponents_can_act(&self, seat: SeatIndex) -> bool {
        self.state
            .players
            .iter()
            .enumerate()
            .any(|(i, p)| i != seat && p.can_act())
    }

    /// Hole cards of non-folded players are public once the last hand went
    /// to showdown.
    fn showdown_revealed(&self) -> bool {
        matches!(self.state.phase, Phase::Showdown | Phase::Finished)
            && self.state.last_hand_result.as_ref().is_some_and(|r| {
                r.reason == HandEndReason::Showdown && r.hand_number == self.state.hand_number
            })
    }

    /// Deal a new hand with the button on `dealer`: antes, blinds, hole
    /// cards, first actor. Only the blind lookup can fail and it runs before
    /// anything is mutated.
    fn begin_hand(&mut self, dealer: SeatIndex) -> Result<(), EngineError> {
        let seats = blind_seats(&self.state.players, dealer, |p| !p.stack.is_zero())
            .ok_or(EngineError::NotEnoughPlayers(self.players_with_chips()))?;

        let now = Utc::now();
        let small_blind = self.state.settings.small_blind;
        let big_blind = self.state.settings.big_blind;
        let ante = self.state.settings.ante;

        let state = &mut self.state;
        state.hand_number += 1;
        state.players.iter_mut().for_each(Player::reset_for_hand);
        state.community_cards.clear();
        state.pot = Chips::ZERO;
        state.phase = Phase::PreFlop;
        state.dealer_position = Some(seats.dealer);
        state.small_blind_position = Some(seats.small_blind);
        state.big_blind_position = Some(seats.big_blind);
        state.hand_started_at = Some(now);

        let mut contributions = vec![Chips::ZERO; state.players.len()];
        let stacks_start: BTreeMap<PlayerId, Chips> = state
            .players
            .iter()
            .filter(|p| p.is_active)
            .map(|p| (p.id.clone(), p.stack))
            .collect();
        let seating = state
            .players
            .iter()
            .filter(|p| p.is_active)
            .map(|p| SeatSnapshot {
                seat: p.position,
                player_id: p.id.clone(),
                name: p.name.clone(),
                stack: p.stack,
            })
            .collect();

        // Antes are dead money: in the pot, not part of the street bet.
        let ante_payers: Vec<SeatIndex> = match ante.kind {
            AnteType::None => Vec::new(),
            AnteType::Ante => (0..state.players.len())
                .filter(|&s| state.players[s].is_active)
                .collect(),
            AnteType::BbAnte => vec![seats.big_blind],
        };
        for seat in ante_payers {
            let paid = state.players[seat].post_dead(ante.amount);
            contributions[seat] += paid;
            state.pot += paid;
        }

        for (seat, blind) in [(seats.small_blind, small_blind), (seats.big_blind, big_blind)] {
            let paid = state.players[seat].commit(blind);
            contributions[seat] += paid;
            state.pot += paid;
        }

        // A short big blind leaves the level at whatever was actually posted.
        let current_bet = state.players[seats.small_blind]
            .current_bet
            .max(state.players[seats.big_blind].current_bet);
        let mut betting = BettingRound::new(Phase::PreFlop, current_bet, big_blind);
        betting.last_aggressor = Some(seats.big_blind);
        state.current_bet = current_bet;
        state.min_raise = big_blind;

        let mut deck = Deck::standard_52();
        self.rng.shuffle(&mut deck.cards);
        let order = seats_clockwise_after(&state.players, seats.dealer, |p| p.is_active);
        for _ in 0..self.evaluator.hole_cards() {
            for &seat in &order {
                if let Some(card) = deck.draw_one() {
                    state.players[seat].cards.push(card);
                }
            }
        }

        info!(
            "table {} hand #{}: button {}, blinds {}/{} from seats {} and {}, {} dealt in",
            state.code,
            state.hand_number,
            seats.dealer,
            small_blind,
            big_blind,
            seats.small_blind,
            seats.big_blind,
            order.len()
        );

        self.hand = HandContext {
            deck,
            betting,
            contributions,
            stacks_start,
            seating,
            started_at: now,
        };

        match self
            .hand
            .betting
            .next_actor(&self.state.players, seats.big_blind)
        {
            Some(seat) => self.state.active_player_index = Some(seat),
            None => {
                self.state.active_player_index = None;
                self.advance_street();
            }
        }
        Ok(())
    }

    /// Move chips for a validated action and log it.
    fn apply(&mut self, seat: SeatIndex, action: ValidatedAction) {
        let betting = &mut self.hand.betting;
        let player = &mut self.state.players[seat];

        let paid = match action {
            ValidatedAction::Fold => {
                player.has_folded = true;
                betting.mark_acted(seat);
                None
            }
            ValidatedAction::Check => {
                betting.mark_acted(seat);
                None
            }
            ValidatedAction::Call(amount) => {
                let paid = player.commit(amount);
                betting.mark_acted(seat);
                Some(paid)
            }
            ValidatedAction::Raise { to } => {
                let paid = player.commit(to - player.current_bet);
                betting.on_full_raise(seat, to);
                Some(paid)
            }
            ValidatedAction::AllIn { to } => {
                let paid = player.commit(player.stack);
                if to > betting.current_bet {
                    if to - betting.current_bet >= betting.min_raise {
                        betting.on_full_raise(seat, to);
                    } else {
                        betting.on_short_raise(seat, to);
                    }
                } else {
                    betting.mark_acted(seat);
                }
                Some(paid)
            }
        };

        let record = GameAction {
            player_id: player.id.clone(),
            action: recorded_type(action),
            amount: paid,
            phase: self.state.phase,
            bet_to: player.current_bet,
            current_bet_after: betting.current_bet,
            hand_number: self.state.hand_number,
            timestamp: Utc::now(),
        };

        if let Some(paid) = paid {
            self.hand.contributions[seat] += paid;
            self.state.pot += paid;
        }
        self.state.current_bet = self.hand.betting.current_bet;
        self.state.min_raise = self.hand.betting.min_raise;

        debug!(
            "table {} hand #{}: {} {} (bet {}, pot {})",
            self.state.code,
            record.hand_number,
            record.player_id,
            record.action,
            record.bet_to,
            self.state.pot
        );
        self.state.history.push(record);
    }

    /// Close the street and open the next one. Streets nobody can bet on are
    /// dealt straight through to the showdown.
    fn advance_street(&mut self) {
        loop {
            for p in self.state.players.iter_mut() {
                p.current_bet = Chips::ZERO;
            }
            self.state.current_bet = Chips::ZERO;

            let next = match self.state.phase.next_street() {
                Some(Phase::Showdown) | None => {
                    self.showdown();
                    return;
                }
                Some(next) => next,
            };

            self.hand.deck.burn();
            let cards = self.hand.deck.draw_n(next.cards_dealt_on_entry());
            self.state.community_cards.extend(cards);
            self.state.phase = next;

            let big_blind = self.state.settings.big_blind;
            self.hand.betting = BettingRound::new(next, Chips::ZERO, big_blind);
            self.state.min_raise = big_blind;

            debug!(
                "table {} hand #{}: {:?} board {:?}",
                self.state.code, self.state.hand_number, next, self.state.community_cards
            );

            let dealer = self.state.dealer_position.unwrap_or_default();
            match self.hand.betting.next_actor(&self.state.players, dealer) {
                Some(seat) => {
                    self.state.active_player_index = Some(seat);
                    return;
                }
                None => {
                    self.state.active_player_index = None;
                    debug!("table {}: nobody left to bet, running out the board", self.state.code);
                }
            }
        }
    }

    /// Everyone else folded: the last player takes the whole pot unshown.
    fn finish_uncontested(&mut self) {
        let Some(seat) = self.state.players.iter().position(Player::is_in_hand) else {
            return;
        };
        let pot = self.state.pot;
        let winner = &mut self.state.players[seat];
        winner.stack += pot;

        let winners = vec![WinnerShare {
            player_id: winner.id.clone(),
            amount: pot,
        }];
        let award = PotAward {
            amount: pot,
            eligible: vec![winner.id.clone()],
            winners: winners.clone(),
        };
        self.settle(HandEndReason::Fold, winners, vec![award], Vec::new());
    }

    /// Rank every live hand and pay each pot tier to its best eligible hand.
    fn showdown(&mut self) {
        self.state.phase = Phase::Showdown;
        self.state.active_player_index = None;

        let board = self.state.community_cards.clone();
        let mut ranks: Vec<Option<HandRank>> = vec![None; self.state.players.len()];
        let mut shown = Vec::new();
        for (seat, p) in self.state.players.iter().enumerate() {
            if !p.is_in_hand() {
                continue;
            }
            let rank = match self.evaluator.evaluate(&p.cards, &board) {
                Ok(rank) => rank,
                // Seven distinct cards from one deck always evaluate.
                Err(e) => panic!("corrupt hand at showdown for {}: {e}", p.id),
            };
            ranks[seat] = Some(rank);
            shown.push(ShowdownHand {
                player_id: p.id.clone(),
                cards: p.cards.clone(),
                category: hand_category(rank),
                rank,
            });
        }

        let contributions: Vec<Contribution> = self
            .hand
            .contributions
            .iter()
            .enumerate()
            .map(|(seat, &amount)| Contribution {
                seat,
                amount,
                folded: !self.state.players[seat].is_in_hand(),
            })
            .collect();

        // Odd chips go to the first winners left of the button.
        let dealer = self.state.dealer_position.unwrap_or_default();
        let payout_order = seats_clockwise_after(&self.state.players, dealer, |_| true);
        let live: Vec<SeatIndex> = payout_order
            .iter()
            .copied()
            .filter(|&s| ranks[s].is_some())
            .collect();

        let mut winners = Vec::new();
        let mut awards = Vec::new();
        for pot in compute_side_pots(&contributions) {
            // A tier whose contributors all folded goes to the best live hand.
            let candidates = if pot.eligible_seats.is_empty() {
                live.clone()
            } else {
                pot.eligible_seats.clone()
            };
            let best = candidates.iter().filter_map(|&s| ranks[s]).max();
            let tied: Vec<SeatIndex> = payout_order
                .iter()
                .copied()
                .filter(|s| candidates.contains(s) && ranks[*s].is_some() && ranks[*s] == best)
                .collect();

            let mut award = PotAward {
                amount: pot.amount,
                eligible: candidates
                    .iter()
                    .map(|&s| self.state.players[s].id.clone())
                    .collect(),
                winners: Vec::new(),
            };
            for (seat, share) in split_pot(pot.amount, &tied) {
                let player = &mut self.state.players[seat];
                player.stack += share;
                credit(&mut winners, &player.id, share);
                credit(&mut award.winners, &player.id, share);
            }
            awards.push(award);
        }

        self.settle(HandEndReason::Showdown, winners, awards, shown);
    }

    /// Close the hand: empty the pot, record the result, mark finished.
    fn settle(
        &mut self,
        reason: HandEndReason,
        winners: Vec<WinnerShare>,
        pots: Vec<PotAward>,
        showdown: Vec<ShowdownHand>,
    ) {
        let pot = self.state.pot;
        debug_assert_eq!(
            winners.iter().map(|w| w.amount).sum::<Chips>(),
            pot,
            "payouts must equal the pot"
        );

        self.state.pot = Chips::ZERO;
        self.state.current_bet = Chips::ZERO;
        self.state.active_player_index = None;
        self.state.phase = Phase::Finished;
        for p in self.state.players.iter_mut() {
            p.current_bet = Chips::ZERO;
        }
        self.hand.contributions.fill(Chips::ZERO);

        let stacks_start = std::mem::take(&mut self.hand.stacks_start);
        let stacks_end = self
            .state
            .players
            .iter()
            .filter(|p| stacks_start.contains_key(&p.id))
            .map(|p| (p.id.clone(), p.stack))
            .collect();

        let result = HandResult {
            hand_number: self.state.hand_number,
            reason,
            winners,
            pot,
            community_cards: self.state.community_cards.clone(),
            actions: self.state.current_hand_actions().cloned().collect(),
            pots,
            showdown,
            stacks_start,
            stacks_end,
            table: TableSnapshot {
                seats: std::mem::take(&mut self.hand.seating),
                dealer: self.state.dealer_position.unwrap_or_default(),
                small_blind: self.state.small_blind_position.unwrap_or_default(),
                big_blind: self.state.big_blind_position.unwrap_or_default(),
            },
            started_at: self.hand.started_at,
            ended_at: Utc::now(),
        };

        info!(
            "table {} hand #{} finished by {:?}: pot {} to {}",
            self.state.code,
            result.hand_number,
            reason,
            pot,
            result
                .winners
                .iter()
                .map(|w| format!("{} ({})", w.player_id, w.amount))
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.state.last_hand_result = Some(result);
    }
}
