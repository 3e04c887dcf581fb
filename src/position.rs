// Authoritative game state as received from the server.
//
// A `Position` is never modified: every sync produces a new one. All legality data (move and
// capture candidates, check, termination) comes from the server verbatim; the only thing the
// client adds is validation that the snapshot is internally consistent.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use enum_map::{enum_map, EnumMap};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::coord::Coord;
use crate::event::{BoardSnapshot, LastMoveInfo, MoveRejection};
use crate::fen::parse_fen;
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceKind, PieceOnBoard};


#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Checkmate,
    Stalemate,
    #[strum(serialize = "threefold_repetition", to_string = "repetition")]
    #[serde(alias = "threefold_repetition")]
    Repetition,
    FiftyMoves,
    InsufficientMaterial,
    // Server says the game is over, but doesn't say why.
    Unknown,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Active,
    Over(TerminationReason),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOutcome {
    Victory(Force),
    Draw,
    Undecided,
}

// Game-over related fields shared by board snapshots and move rejections.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TerminationFlags<'a> {
    pub is_game_over: bool,
    pub reason: Option<&'a str>,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_threefold_repetition: bool,
    pub is_fifty_moves: bool,
    pub is_insufficient_material: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Candidates {
    pub moves: BTreeSet<Coord>,
    pub captures: BTreeSet<Coord>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LastMove {
    pub from: Coord,
    pub to: Coord,
    pub is_capture: Option<bool>,
    pub is_special_step: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PositionError {
    InvalidFen(String),
    TurnMismatch { turn: Force, fen_turn: Force },
    InvalidSquare { field: &'static str, value: String },
    CandidateWithoutOwnPiece(Coord),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    fen: String,
    grid: Grid,
    active_force: Force,
    kings: EnumMap<Force, Option<Coord>>,
    candidates: HashMap<Coord, Candidates>,
    is_check: bool,
    check_square: Option<Coord>,
    last_move: Option<LastMove>,
    status: GameStatus,
}

impl TerminationReason {
    pub fn name(self) -> &'static str { self.into() }
}

impl GameStatus {
    pub fn is_active(self) -> bool { self == GameStatus::Active }
    pub fn termination_reason(self) -> Option<TerminationReason> {
        match self {
            GameStatus::Active => None,
            GameStatus::Over(reason) => Some(reason),
        }
    }
}

impl TerminationFlags<'_> {
    // Returns termination reason if the game is over. An explicit reason wins; otherwise the
    // reason is inferred from the individual flags in the order the server checks them.
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        if !self.is_game_over && !self.is_checkmate {
            return None;
        }
        if let Some(reason) = self.reason {
            match reason.parse() {
                Ok(reason) => return Some(reason),
                Err(_) => log::warn!("Unknown game over reason: \"{reason}\""),
            }
        }
        Some(if self.is_checkmate {
            TerminationReason::Checkmate
        } else if self.is_stalemate {
            TerminationReason::Stalemate
        } else if self.is_insufficient_material {
            TerminationReason::InsufficientMaterial
        } else if self.is_threefold_repetition {
            TerminationReason::Repetition
        } else if self.is_fifty_moves {
            TerminationReason::FiftyMoves
        } else {
            TerminationReason::Unknown
        })
    }
}

impl<'a> From<&'a BoardSnapshot> for TerminationFlags<'a> {
    fn from(s: &'a BoardSnapshot) -> Self {
        TerminationFlags {
            is_game_over: s.is_game_over,
            reason: s.game_over_reason.as_deref(),
            is_checkmate: s.is_checkmate,
            is_stalemate: s.is_stalemate,
            is_threefold_repetition: s.is_threefold_repetition,
            is_fifty_moves: s.is_fifty_moves,
            is_insufficient_material: s.is_insufficient_material,
        }
    }
}

impl<'a> From<&'a MoveRejection> for TerminationFlags<'a> {
    fn from(r: &'a MoveRejection) -> Self {
        TerminationFlags {
            is_game_over: r.is_game_over,
            reason: r.game_over_reason.as_deref(),
            is_checkmate: r.is_checkmate,
            is_stalemate: r.is_stalemate,
            is_threefold_repetition: r.is_threefold_repetition,
            is_fifty_moves: r.is_fifty_moves,
            is_insufficient_material: r.is_insufficient_material,
        }
    }
}

impl Candidates {
    pub fn contains(&self, target: Coord) -> bool {
        self.moves.contains(&target) || self.captures.contains(&target)
    }
    pub fn is_empty(&self) -> bool { self.moves.is_empty() && self.captures.is_empty() }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::InvalidFen(message) => write!(f, "{message}"),
            PositionError::TurnMismatch { turn, fen_turn } => {
                write!(f, "turn is {turn}, but FEN says {fen_turn}")
            }
            PositionError::InvalidSquare { field, value } => {
                write!(f, "invalid square in {field}: \"{value}\"")
            }
            PositionError::CandidateWithoutOwnPiece(coord) => {
                write!(f, "move candidates listed for {coord}, which has no piece to move")
            }
        }
    }
}

impl std::error::Error for PositionError {}

fn parse_square(field: &'static str, value: &str) -> Result<Coord, PositionError> {
    Coord::from_algebraic(value).ok_or_else(|| PositionError::InvalidSquare {
        field,
        value: value.to_owned(),
    })
}

fn parse_squares(field: &'static str, values: &[String]) -> Result<BTreeSet<Coord>, PositionError> {
    values.iter().map(|v| parse_square(field, v)).collect()
}

fn parse_last_move(info: &LastMoveInfo) -> Result<LastMove, PositionError> {
    Ok(LastMove {
        from: parse_square("lastMove.from", &info.from)?,
        to: parse_square("lastMove.to", &info.to)?,
        is_capture: info.is_capture,
        is_special_step: info.is_kings_step,
    })
}

impl Position {
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, PositionError> {
        let fen_position = parse_fen(&snapshot.fen).map_err(PositionError::InvalidFen)?;
        if fen_position.active_force != snapshot.turn {
            return Err(PositionError::TurnMismatch {
                turn: snapshot.turn,
                fen_turn: fen_position.active_force,
            });
        }
        let grid = fen_position.grid;
        let active_force = snapshot.turn;
        let mut kings: EnumMap<Force, Option<Coord>> = enum_map! { _ => None };
        for (coord, piece) in grid.pieces() {
            if piece.kind == PieceKind::King {
                kings[piece.force] = Some(coord);
            }
        }

        let status = match TerminationFlags::from(snapshot).termination_reason() {
            None => GameStatus::Active,
            Some(reason) => GameStatus::Over(reason),
        };

        let mut candidates = HashMap::new();
        if status.is_active() {
            for (from, entry) in snapshot.move_info.iter() {
                let from = parse_square("moveInfo", from)?;
                if !grid[from].is_some_and(|piece| piece.force == active_force) {
                    return Err(PositionError::CandidateWithoutOwnPiece(from));
                }
                let entry = Candidates {
                    moves: parse_squares("moveInfo.moves", &entry.moves)?,
                    captures: parse_squares("moveInfo.captures", &entry.captures)?,
                };
                if !entry.is_empty() {
                    candidates.insert(from, entry);
                }
            }
        }

        let check_square = snapshot
            .in_check
            .as_deref()
            .map(|sq| parse_square("inCheck", sq))
            .transpose()?;
        let last_move = snapshot.last_move.as_ref().map(parse_last_move).transpose()?;

        Ok(Position {
            fen: snapshot.fen.clone(),
            grid,
            active_force,
            kings,
            candidates,
            is_check: snapshot.is_check || check_square.is_some(),
            check_square,
            last_move,
            status,
        })
    }

    pub fn fen(&self) -> &str { &self.fen }
    pub fn active_force(&self) -> Force { self.active_force }
    pub fn is_check(&self) -> bool { self.is_check }
    pub fn check_square(&self) -> Option<Coord> { self.check_square }
    pub fn last_move(&self) -> Option<LastMove> { self.last_move }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn is_terminated(&self) -> bool { !self.status.is_active() }

    pub fn piece_at(&self, coord: Coord) -> Option<PieceOnBoard> { self.grid[coord] }
    pub fn king_square(&self, force: Force) -> Option<Coord> { self.kings[force] }

    // Whether the square holds a piece that belongs to the side to move.
    pub fn has_own_piece(&self, coord: Coord) -> bool {
        self.grid[coord].is_some_and(|piece| piece.force == self.active_force)
    }

    pub fn candidates(&self, from: Coord) -> Option<&Candidates> { self.candidates.get(&from) }

    pub fn is_candidate(&self, from: Coord, to: Coord) -> bool {
        self.candidates(from).is_some_and(|c| c.contains(to))
    }

    pub fn is_capture_candidate(&self, from: Coord, to: Coord) -> bool {
        self.candidates(from).is_some_and(|c| c.captures.contains(&to))
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.status {
            GameStatus::Active => GameOutcome::Undecided,
            // The side that has been checkmated is the one to move.
            GameStatus::Over(TerminationReason::Checkmate) => {
                GameOutcome::Victory(self.active_force.opponent())
            }
            GameStatus::Over(_) => GameOutcome::Draw,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{snapshot, starting_snapshot};

    #[test]
    fn starting_position() {
        let pos = Position::from_snapshot(&starting_snapshot()).unwrap();
        assert_eq!(pos.active_force(), Force::White);
        assert!(pos.has_own_piece(Coord::E2));
        assert!(!pos.has_own_piece(Coord::E7));
        assert!(!pos.has_own_piece(Coord::E4));
        assert!(pos.is_candidate(Coord::G1, Coord::F3));
        assert!(!pos.is_candidate(Coord::G1, Coord::G3));
        assert_eq!(pos.status(), GameStatus::Active);
        assert_eq!(pos.outcome(), GameOutcome::Undecided);
        assert_eq!(pos.king_square(Force::White), Some(Coord::E1));
        assert_eq!(pos.king_square(Force::Black), Some(Coord::E8));
    }

    #[test]
    fn terminated_position_has_no_candidates() {
        let mut s = starting_snapshot();
        s.is_game_over = true;
        s.game_over_reason = Some("stalemate".to_owned());
        let pos = Position::from_snapshot(&s).unwrap();
        assert_eq!(pos.status(), GameStatus::Over(TerminationReason::Stalemate));
        assert_eq!(pos.candidates(Coord::G1), None);
        assert_eq!(pos.outcome(), GameOutcome::Draw);
    }

    #[test]
    fn termination_reason_inference() {
        let flags = TerminationFlags { is_checkmate: true, ..Default::default() };
        assert_eq!(flags.termination_reason(), Some(TerminationReason::Checkmate));
        let flags = TerminationFlags {
            is_game_over: true,
            reason: Some("threefold_repetition"),
            ..Default::default()
        };
        assert_eq!(flags.termination_reason(), Some(TerminationReason::Repetition));
        let flags = TerminationFlags { is_game_over: true, ..Default::default() };
        assert_eq!(flags.termination_reason(), Some(TerminationReason::Unknown));
        let flags = TerminationFlags { is_stalemate: true, ..Default::default() };
        assert_eq!(flags.termination_reason(), None);
        assert_eq!(TerminationReason::FiftyMoves.name(), "fifty_moves");
        assert_eq!(TerminationReason::Repetition.name(), "repetition");
    }

    #[test]
    fn checkmate_winner() {
        let mut s = snapshot("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1", &[]);
        s.is_game_over = true;
        s.is_checkmate = true;
        s.is_check = true;
        s.in_check = Some("h8".to_owned());
        let pos = Position::from_snapshot(&s).unwrap();
        assert_eq!(pos.outcome(), GameOutcome::Victory(Force::White));
        assert_eq!(pos.check_square(), Some(Coord::H8));
        assert_eq!(pos.king_square(Force::Black), Some(Coord::H8));
        assert_eq!(pos.king_square(Force::White), Some(Coord::G6));
    }

    #[test]
    fn malformed_snapshots() {
        let mut s = starting_snapshot();
        s.turn = Force::Black;
        assert!(matches!(Position::from_snapshot(&s), Err(PositionError::TurnMismatch { .. })));

        let mut s = starting_snapshot();
        s.fen = "not a fen".to_owned();
        assert!(matches!(Position::from_snapshot(&s), Err(PositionError::InvalidFen(_))));

        let mut s = starting_snapshot();
        s.in_check = Some("z9".to_owned());
        assert!(matches!(Position::from_snapshot(&s), Err(PositionError::InvalidSquare { .. })));

        let s = snapshot(crate::test_util::STARTING_FEN, &[("e7", &["e5"], &[])]);
        assert_eq!(
            Position::from_snapshot(&s),
            Err(PositionError::CandidateWithoutOwnPiece(Coord::E7))
        );
    }
}
