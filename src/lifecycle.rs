// Game lifecycle: a game is live until the server reports that it's over, and stays over
// until the user explicitly resets it.

use crate::force::Force;
use crate::position::{GameOutcome, Position, TerminationReason};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecyclePhase {
    Live,
    Over(TerminationReason),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lifecycle {
    pub phase: LifecyclePhase,
    // Known for checkmates only.
    pub winner: Option<Force>,
    // Game-over overlay. Dismissing it doesn't unfreeze the board.
    pub overlay_visible: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TerminationSummary {
    pub title: String,
    pub message: String,
    pub subtitle: String,
}

pub const RESET_PROMPT: &str = "Game is over. Click Reset to play again.";

impl Lifecycle {
    pub fn new() -> Self {
        Lifecycle {
            phase: LifecyclePhase::Live,
            winner: None,
            overlay_visible: false,
        }
    }

    pub fn is_live(&self) -> bool { self.phase == LifecyclePhase::Live }
    pub fn is_over(&self) -> bool { !self.is_live() }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        match self.phase {
            LifecyclePhase::Live => None,
            LifecyclePhase::Over(reason) => Some(reason),
        }
    }

    // Returns whether the phase changed.
    pub fn observe_position(&mut self, position: &Position) -> bool {
        let Some(reason) = position.status().termination_reason() else {
            if self.is_over() {
                log::warn!("Ignoring active position while the game is over; waiting for reset");
            }
            return false;
        };
        let winner = match position.outcome() {
            GameOutcome::Victory(force) => Some(force),
            GameOutcome::Draw | GameOutcome::Undecided => None,
        };
        self.finish(reason, winner)
    }

    // Game over learned from a rejected move: there is no position to tell the winner.
    pub fn observe_termination(&mut self, reason: TerminationReason) -> bool {
        self.finish(reason, None)
    }

    fn finish(&mut self, reason: TerminationReason, winner: Option<Force>) -> bool {
        if self.is_over() {
            // A rejected move may have reported the checkmate before we saw the final position.
            if self.phase == LifecyclePhase::Over(reason) && self.winner.is_none() && winner.is_some() {
                self.winner = winner;
                return true;
            }
            return false;
        }
        log::info!("Game over: {}", reason.name());
        *self = Lifecycle {
            phase: LifecyclePhase::Over(reason),
            winner,
            overlay_visible: true,
        };
        true
    }

    // Returns whether anything changed.
    pub fn dismiss_overlay(&mut self) -> bool {
        let changed = self.overlay_visible;
        self.overlay_visible = false;
        changed
    }

    pub fn reset(&mut self) { *self = Lifecycle::new(); }

    pub fn summary(&self) -> Option<TerminationSummary> {
        self.termination_reason().map(|reason| termination_summary(reason, self.winner))
    }
}

pub fn termination_summary(reason: TerminationReason, winner: Option<Force>) -> TerminationSummary {
    const RESET_HINT: &str = "Press 'Reset Game' to play again.";
    let (title, message, subtitle) = match reason {
        TerminationReason::Checkmate => match winner {
            Some(winner) => (
                format!("{winner} Wins!"),
                format!("CHECKMATE! {winner} wins!"),
                "The king has been checkmated! Game completed.",
            ),
            None => (
                "Checkmate!".to_owned(),
                "CHECKMATE!".to_owned(),
                "The king has been checkmated! Game completed.",
            ),
        },
        TerminationReason::Stalemate => (
            "Draw - Stalemate".to_owned(),
            "STALEMATE! Game is a draw.".to_owned(),
            "No legal moves available. The game ends in a draw.",
        ),
        TerminationReason::Repetition => (
            "Draw - Repetition".to_owned(),
            "DRAW BY REPETITION! Same position occurred three times.".to_owned(),
            "The same position occurred three times.",
        ),
        TerminationReason::FiftyMoves => (
            "Draw - Fifty Moves".to_owned(),
            "DRAW BY FIFTY-MOVE RULE! No captures or pawn moves in the last 50 moves.".to_owned(),
            "No captures or pawn moves in the last 50 moves.",
        ),
        TerminationReason::InsufficientMaterial => (
            "Draw - Insufficient Material".to_owned(),
            "DRAW! Insufficient material to checkmate.".to_owned(),
            "Neither player has enough pieces to checkmate.",
        ),
        TerminationReason::Unknown => (
            "Game Over".to_owned(),
            "GAME OVER!".to_owned(),
            "Click anywhere to continue playing or reset the game.",
        ),
    };
    TerminationSummary {
        title,
        message: format!("{message} {RESET_HINT}"),
        subtitle: subtitle.to_owned(),
    }
}
