// Classification of candidate moves into regular moves and King's Steps.
//
// This is purely cosmetic: it decides how a candidate square is highlighted. Legality always
// comes from the server's candidate lists.

use crate::coord::{Coord, SubjectiveRow};
use crate::force::Force;
use crate::piece::PieceKind;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StepClass {
    Regular,
    // A one-square step that the piece couldn't make under the standard chess rules.
    SpecialStep,
}

pub fn classify_step(piece_kind: PieceKind, force: Force, from: Coord, to: Coord) -> StepClass {
    if !piece_kind.can_make_kings_step() {
        return StepClass::Regular;
    }
    let (d_row, d_col) = to - from;
    let (row_diff, col_diff) = (d_row.abs(), d_col.abs());
    let is_canonical = match piece_kind {
        PieceKind::Pawn => {
            let forward = match force {
                Force::White => 1,
                Force::Black => -1,
            };
            let starting_row = SubjectiveRow::from_one_based(2).to_row(force);
            d_col == 0 && (d_row == forward || (from.row == starting_row && d_row == 2 * forward))
        }
        PieceKind::Knight => (row_diff, col_diff) == (1, 2) || (row_diff, col_diff) == (2, 1),
        PieceKind::Bishop => row_diff == col_diff,
        PieceKind::Rook => row_diff == 0 || col_diff == 0,
        PieceKind::Queen | PieceKind::King => true,
    };
    let is_one_square = row_diff <= 1 && col_diff <= 1 && (row_diff, col_diff) != (0, 0);
    if !is_canonical && is_one_square {
        StepClass::SpecialStep
    } else {
        StepClass::Regular
    }
}
