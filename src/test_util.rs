// Test utilities shared by unit tests and integration tests (the latter cannot see
// `#[cfg(test)]` items).

use std::collections::HashMap;

use crate::event::{BoardSnapshot, LastMoveInfo, MoveInfoEntry};
use crate::fen::parse_fen;


pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Candidate list for one origin square: (origin, moves, captures).
pub type CandidateSpec<'a> = (&'a str, &'a [&'a str], &'a [&'a str]);

// Builds an active-game snapshot. Side to move is taken from the FEN.
pub fn snapshot(fen: &str, candidates: &[CandidateSpec]) -> BoardSnapshot {
    let turn = parse_fen(fen).map(|p| p.active_force).unwrap_or_else(|err| panic!("{err}"));
    let to_strings =
        |squares: &[&str]| -> Vec<String> { squares.iter().map(|s| (*s).to_owned()).collect() };
    let move_info: HashMap<String, MoveInfoEntry> = candidates
        .iter()
        .map(|(from, moves, captures)| {
            ((*from).to_owned(), MoveInfoEntry {
                moves: to_strings(moves),
                captures: to_strings(captures),
            })
        })
        .collect();
    BoardSnapshot {
        fen: fen.to_owned(),
        extended_fen: Some(fen.to_owned()),
        turn,
        move_info,
        is_check: false,
        is_game_over: false,
        game_over_reason: None,
        is_checkmate: false,
        is_stalemate: false,
        is_threefold_repetition: false,
        is_fifty_moves: false,
        is_insufficient_material: false,
        in_check: None,
        last_move: None,
    }
}

// Starting position with the candidates the server reports for it, King's Steps included.
pub fn starting_snapshot() -> BoardSnapshot {
    snapshot(STARTING_FEN, &[
        ("a2", &["a3", "a4", "b3"], &[]),
        ("b2", &["b3", "b4", "a3", "c3"], &[]),
        ("c2", &["c3", "c4", "b3", "d3"], &[]),
        ("d2", &["d3", "d4", "c3", "e3"], &[]),
        ("e2", &["e3", "e4", "d3", "f3"], &[]),
        ("f2", &["f3", "f4", "e3", "g3"], &[]),
        ("g2", &["g3", "g4", "f3", "h3"], &[]),
        ("h2", &["h3", "h4", "g3"], &[]),
        ("b1", &["a3", "c3"], &[]),
        ("g1", &["f3", "h3"], &[]),
    ])
}

pub fn with_last_move(
    mut snapshot: BoardSnapshot, from: &str, to: &str, is_kings_step: bool,
) -> BoardSnapshot {
    snapshot.last_move = Some(LastMoveInfo {
        from: from.to_owned(),
        to: to.to_owned(),
        is_kings_step,
        is_capture: None,
    });
    snapshot
}

pub fn with_termination(mut snapshot: BoardSnapshot, reason: &str) -> BoardSnapshot {
    snapshot.is_game_over = true;
    snapshot.game_over_reason = Some(reason.to_owned());
    snapshot.is_checkmate = reason == "checkmate";
    snapshot.is_stalemate = reason == "stalemate";
    snapshot.move_info.clear();
    snapshot
}
