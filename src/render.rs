// Projection of the confirmed position and the local interaction state onto board squares.
//
// Rendering is a pure function: every call builds the view from scratch, so nothing from a
// previous render (e.g. candidates of a piece that is no longer selected) can leak through.

use std::collections::BTreeSet;

use serde::Serialize;
use strum::{EnumIter, IntoStaticStr};

use crate::coord::Coord;
use crate::force::Force;
use crate::interaction::InteractionState;
use crate::piece::PieceOnBoard;
use crate::position::Position;
use crate::step::{classify_step, StepClass};


// Visual classes of a square. Names match the CSS classes of the web client.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, EnumIter, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SquareClass {
    Light,
    Dark,
    Empty,
    Piece,
    White,
    Black,
    Selected,
    ValidMove,
    ValidCapture,
    ValidSpecialStep,
    LastMoveFrom,
    LastMoveTo,
    LastMoveSpecialStep,
    InCheck,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SquareView {
    pub coord: Coord,
    pub piece: Option<PieceOnBoard>,
    pub classes: BTreeSet<SquareClass>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct StatusLine {
    pub turn: Force,
    pub check_notice: Option<String>,
}

// All 64 squares, rank 8 to rank 1, file a to file h.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BoardView {
    pub squares: Vec<SquareView>,
    pub status: StatusLine,
}

impl SquareClass {
    pub fn css_name(self) -> &'static str { self.into() }
}

impl SquareView {
    pub fn has(&self, class: SquareClass) -> bool { self.classes.contains(&class) }

    pub fn class_string(&self) -> String {
        self.classes.iter().map(|c| c.css_name()).collect::<Vec<_>>().join(" ")
    }
}

impl BoardView {
    pub fn square(&self, coord: Coord) -> &SquareView {
        let row = 7 - coord.row.to_zero_based() as usize;
        let col = coord.col.to_zero_based() as usize;
        &self.squares[row * 8 + col]
    }

    // Squares carrying the given class, in display order.
    pub fn squares_with(&self, class: SquareClass) -> Vec<Coord> {
        self.squares.iter().filter(|sq| sq.has(class)).map(|sq| sq.coord).collect()
    }
}

pub fn render_board(position: &Position, state: InteractionState) -> BoardView {
    let mut squares: Vec<SquareView> = Coord::all_display_order()
        .map(|coord| {
            let piece = position.piece_at(coord);
            let mut classes = BTreeSet::new();
            classes.insert(if coord.is_light() { SquareClass::Light } else { SquareClass::Dark });
            match piece {
                None => {
                    classes.insert(SquareClass::Empty);
                }
                Some(piece) => {
                    classes.insert(SquareClass::Piece);
                    classes.insert(match piece.force {
                        Force::White => SquareClass::White,
                        Force::Black => SquareClass::Black,
                    });
                }
            }
            SquareView { coord, piece, classes }
        })
        .collect();
    let mut add_class = |coord: Coord, class: SquareClass| {
        let row = 7 - coord.row.to_zero_based() as usize;
        let col = coord.col.to_zero_based() as usize;
        squares[row * 8 + col].classes.insert(class);
    };

    if let Some(last_move) = position.last_move() {
        add_class(last_move.from, SquareClass::LastMoveFrom);
        add_class(last_move.to, SquareClass::LastMoveTo);
        if last_move.is_special_step {
            add_class(last_move.to, SquareClass::LastMoveSpecialStep);
        }
    }

    if position.is_check() {
        let check_square =
            position.check_square().or_else(|| position.king_square(position.active_force()));
        if let Some(coord) = check_square {
            add_class(coord, SquareClass::InCheck);
        }
    }

    // Terminated positions have no candidates, but selection must not be shown either.
    if !position.is_terminated() {
        if let Some(focus) = state.focus() {
            add_class(focus, SquareClass::Selected);
            if let (Some(piece), Some(candidates)) =
                (position.piece_at(focus), position.candidates(focus))
            {
                for &to in candidates.moves.iter() {
                    let class = match classify_step(piece.kind, piece.force, focus, to) {
                        StepClass::Regular => SquareClass::ValidMove,
                        StepClass::SpecialStep => SquareClass::ValidSpecialStep,
                    };
                    add_class(to, class);
                }
                for &to in candidates.captures.iter() {
                    add_class(to, SquareClass::ValidCapture);
                }
            }
        }
    }

    let active_force = position.active_force();
    let check_notice = (position.is_check() && !position.is_terminated()).then(|| {
        format!("{} IS IN CHECK!", active_force.display_name().to_uppercase())
    });
    BoardView {
        squares,
        status: StatusLine { turn: active_force, check_notice },
    }
}
