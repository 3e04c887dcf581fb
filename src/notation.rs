// Move notation and the move record shown next to the board.
//
// Notation is built by the client from the move and the server's verdict on it (capture,
// King's Step, check, mate), so it is only produced for confirmed moves.

use derive_new::new;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::force::Force;
use crate::interaction::MoveIntent;
use crate::piece::PieceKind;
use crate::position::{Position, TerminationReason};
use crate::step::{classify_step, StepClass};


pub const SPECIAL_STEP_MARK: &str = "(KS)";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum AlgebraicCharset {
    #[default]
    Ascii,
    AuxiliaryUnicode,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, new)]
pub struct CompletedMove {
    pub piece_kind: PieceKind,
    pub from: Coord,
    pub to: Coord,
    pub is_capture: bool,
    pub is_special_step: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecordEntry {
    pub number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveRecord {
    entries: Vec<MoveRecordEntry>,
    // Number of the full move that will be recorded next.
    move_number: u32,
}

impl CompletedMove {
    // Describes a confirmed move given the positions before and after it.
    pub fn from_positions(intent: MoveIntent, before: &Position, after: &Position) -> Option<Self> {
        let piece = before.piece_at(intent.from)?;
        let last_move = after.last_move().filter(|m| m.from == intent.from && m.to == intent.to);
        let is_capture = last_move
            .and_then(|m| m.is_capture)
            .unwrap_or_else(|| before.is_capture_candidate(intent.from, intent.to));
        let is_special_step = match last_move {
            Some(m) => m.is_special_step,
            None => {
                classify_step(piece.kind, piece.force, intent.from, intent.to)
                    == StepClass::SpecialStep
            }
        };
        let is_checkmate =
            after.status().termination_reason() == Some(TerminationReason::Checkmate);
        Some(CompletedMove {
            piece_kind: piece.kind,
            from: intent.from,
            to: intent.to,
            is_capture,
            is_special_step,
            is_check: after.is_check(),
            is_checkmate,
        })
    }

    pub fn format(&self, charset: AlgebraicCharset) -> String {
        let capture_notation = match charset {
            AlgebraicCharset::Ascii => "x",
            AlgebraicCharset::AuxiliaryUnicode => "×",
        };
        let mut s = self.piece_kind.to_algebraic_for_move().to_owned();
        if self.is_capture {
            if self.piece_kind == PieceKind::Pawn {
                s.push(self.from.col.to_algebraic());
            }
            s.push_str(capture_notation);
        }
        s.push_str(&self.to.to_algebraic());
        if self.is_special_step {
            s.push_str(SPECIAL_STEP_MARK);
        }
        if self.is_checkmate {
            s.push('#');
        } else if self.is_check {
            s.push('+');
        }
        s
    }
}

impl MoveRecord {
    pub fn new() -> Self { MoveRecord { entries: Vec::new(), move_number: 1 } }

    pub fn entries(&self) -> &[MoveRecordEntry] { &self.entries }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn move_number(&self) -> u32 { self.move_number }

    pub fn clear(&mut self) { *self = MoveRecord::new(); }

    // Adds a half-move made by `force` and returns the affected entry.
    pub fn record(&mut self, force: Force, notation: String) -> &MoveRecordEntry {
        match force {
            Force::White => {
                if self.entries.last().is_some_and(|e| e.white.is_some() && e.black.is_none()) {
                    log::warn!(
                        "Move record anomaly: white move {notation} follows a white move without a black reply"
                    );
                }
                self.entries.push(MoveRecordEntry {
                    number: self.move_number,
                    white: Some(notation),
                    black: None,
                });
            }
            Force::Black => {
                match self.entries.last_mut() {
                    Some(entry) if entry.black.is_none() => entry.black = Some(notation),
                    _ => {
                        // Normally black replies to a recorded white move. This can happen after
                        // a desync (e.g. a reset racing with a move), so keep going.
                        log::warn!(
                            "Move record anomaly: black move {notation} without a pending white move"
                        );
                        self.entries.push(MoveRecordEntry {
                            number: self.move_number,
                            white: None,
                            black: Some(notation),
                        });
                    }
                }
                self.move_number += 1;
            }
        }
        // There is always an entry: we've just pushed or updated one.
        &self.entries[self.entries.len() - 1]
    }

    pub fn to_movetext(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match (&entry.white, &entry.black) {
                (Some(white), Some(black)) => format!("{}. {} {}", entry.number, white, black),
                (Some(white), None) => format!("{}. {}", entry.number, white),
                (None, Some(black)) => format!("{}... {}", entry.number, black),
                (None, None) => format!("{}.", entry.number),
            })
            .join(" ")
    }
}
