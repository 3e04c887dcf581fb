// Only the parts of FEN that the client needs: piece placement and the side to move. Castling
// rights, en passant target and clocks are the server's business; they are validated for
// shape only.

use itertools::Itertools;

use crate::coord::{Col, Coord, Row, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::PieceOnBoard;


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FenPosition {
    pub grid: Grid,
    pub active_force: Force,
}

pub fn grid_from_fen_placement(placement: &str) -> Result<Grid, String> {
    let mut grid = Grid::new();
    let rows = placement.split('/').collect_vec();
    if rows.len() as u8 != NUM_ROWS {
        return Err(format!("invalid FEN: has {} rows, expected {}", rows.len(), NUM_ROWS));
    }
    // FEN lists rows from the 8th down to the 1st.
    for (row, row_notation) in rows.iter().rev().enumerate() {
        let mut col: u32 = 0;
        for ch in row_notation.chars() {
            if let Some(n) = ch.to_digit(10) {
                if n == 0 {
                    return Err(format!("invalid FEN: zero skip in row {}", row + 1));
                }
                col += n;
            } else if let Some(piece) = PieceOnBoard::from_ascii(ch) {
                if col >= NUM_COLS as u32 {
                    return Err(format!("invalid FEN: row {} is too long", row + 1));
                }
                let coord = Coord::new(Row::from_zero_based(row as u8), Col::from_zero_based(col as u8));
                grid[coord] = Some(piece);
                col += 1;
            } else {
                return Err(format!("invalid FEN: unknown piece: {ch}"));
            }
        }
        if col != NUM_COLS as u32 {
            return Err(format!(
                "invalid FEN: row {} has {} columns, expected {}",
                row + 1,
                col,
                NUM_COLS
            ));
        }
    }
    Ok(grid)
}

pub fn parse_fen(fen: &str) -> Result<FenPosition, String> {
    let (placement, active_force_notation, castling, en_passant, half_turn_clock, full_turn_index) =
        fen.split_whitespace()
            .collect_tuple()
            .ok_or_else(|| format!("invalid FEN: {fen}"))?;
    let grid = grid_from_fen_placement(placement)?;
    let active_force = Force::from_fen(active_force_notation)
        .ok_or_else(|| format!("invalid force: {active_force_notation}"))?;
    if !castling.chars().all(|ch| "KQkq-".contains(ch)) {
        return Err(format!("invalid castling rights: {castling}"));
    }
    if en_passant != "-" && Coord::from_algebraic(en_passant).is_none() {
        return Err(format!("invalid en passant target: {en_passant}"));
    }
    half_turn_clock
        .parse::<u32>()
        .map_err(|_| format!("invalid half-turn clock: {half_turn_clock}"))?;
    full_turn_index
        .parse::<u32>()
        .map_err(|_| format!("invalid full turn index: {full_turn_index}"))?;
    Ok(FenPosition { grid, active_force })
}
