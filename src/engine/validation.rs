use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::SeatIndex;
use crate::engine::actions::ActionType;
use crate::engine::betting::BettingRound;
use crate::engine::errors::IllegalAction;

/// A legal action, resolved into exact chip movements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Pay this much toward the current bet; less than owed when the stack
    /// runs out.
    Call(Chips),
    /// Full raise; `to` is the new street total.
    Raise { to: Chips },
    /// Whole stack goes in; `to` is the resulting street total.
    AllIn { to: Chips },
}

/// Check an action against the current betting round.
///
/// `opponents_can_act` is whether any other seat can still bet; without one a
/// raise has nobody to answer it.
pub fn validate_action(
    player: &Player,
    seat: SeatIndex,
    action: ActionType,
    amount: Option<Chips>,
    round: &BettingRound,
    opponents_can_act: bool,
) -> Result<ValidatedAction, IllegalAction> {
    let to_call = round.to_call(player);
    let max_to = player.current_bet + player.stack;

    match action {
        ActionType::Fold => Ok(ValidatedAction::Fold),

        ActionType::Check => {
            if to_call.is_zero() {
                Ok(ValidatedAction::Check)
            } else {
                Err(IllegalAction::CannotCheck { to_call })
            }
        }

        ActionType::Call => {
            if to_call.is_zero() {
                Err(IllegalAction::NothingToCall)
            } else {
                Ok(ValidatedAction::Call(to_call.min(player.stack)))
            }
        }

        ActionType::AllIn => {
            if max_to > round.current_bet && round.has_acted(seat) {
                return Err(IllegalAction::BettingNotReopened);
            }
            Ok(ValidatedAction::AllIn { to: max_to })
        }

        ActionType::Raise => {
            let amount = amount.ok_or(IllegalAction::MissingAmount)?;
            if !opponents_can_act {
                return Err(IllegalAction::NoOpponentCanAct);
            }
            if amount >= max_to {
                // Asking for more than the stack covers is a shove.
                if max_to > round.current_bet && round.has_acted(seat) {
                    return Err(IllegalAction::BettingNotReopened);
                }
                return Ok(ValidatedAction::AllIn { to: max_to });
            }
            if amount <= round.current_bet {
                return Err(IllegalAction::RaiseNotAboveBet {
                    amount,
                    current_bet: round.current_bet,
                });
            }
            let minimum = round.current_bet + round.min_raise;
            if amount < minimum {
                return Err(IllegalAction::RaiseTooSmall { amount, minimum });
            }
            if round.has_acted(seat) {
                return Err(IllegalAction::BettingNotReopened);
            }
            Ok(ValidatedAction::Raise { to: amount })
        }
    }
}

/// What kind of action a validated decision gets logged as.
pub fn recorded_type(action: ValidatedAction) -> ActionType {
    match action {
        ValidatedAction::Fold => ActionType::Fold,
        ValidatedAction::Check => ActionType::Check,
        ValidatedAction::Call(_) => ActionType::Call,
        ValidatedAction::Raise { .. } => ActionType::Raise,
        ValidatedAction::AllIn { .. } => ActionType::AllIn,
    }
}
