use kings_step_chess::coord::Coord;
use kings_step_chess::interaction::{InteractionState, MoveIntent};
use kings_step_chess::notation::{AlgebraicCharset, CompletedMove};
use kings_step_chess::position::Position;
use kings_step_chess::render::{render_board, SquareClass};
use kings_step_chess::step::{classify_step, StepClass};
use kings_step_chess::test_util::{snapshot, with_last_move};
use kings_step_chess::{Force, PieceKind};
use pretty_assertions::assert_eq;


fn rook_position() -> Position {
    Position::from_snapshot(&snapshot("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &[
        ("a1", &["a2", "a3", "a4", "a5", "b1", "c1", "d1", "b2"], &[]),
        ("e1", &["d1", "d2", "e2", "f1", "f2"], &[]),
    ]))
    .unwrap()
}

#[test]
fn rook_diagonal_step_is_special() {
    let rook_step = |to| classify_step(PieceKind::Rook, Force::White, Coord::A1, to);
    assert_eq!(rook_step(Coord::B2), StepClass::SpecialStep);
    assert_eq!(rook_step(Coord::A5), StepClass::Regular);

    let view = render_board(&rook_position(), InteractionState::Selected(Coord::A1));
    assert_eq!(view.squares_with(SquareClass::ValidSpecialStep), vec![Coord::B2]);
    assert!(view.square(Coord::A5).has(SquareClass::ValidMove));
    assert!(!view.square(Coord::A5).has(SquareClass::ValidSpecialStep));
    assert_eq!(view.square(Coord::B2).class_string(), "dark empty valid-special-step");
}

#[test]
fn king_steps_are_never_special() {
    let view = render_board(&rook_position(), InteractionState::Selected(Coord::E1));
    assert!(view.squares_with(SquareClass::ValidSpecialStep).is_empty());
    assert_eq!(view.squares_with(SquareClass::ValidMove).len(), 5);
}

#[test]
fn special_step_notation_from_server_flag() {
    let before = rook_position();
    let after = Position::from_snapshot(&with_last_move(
        snapshot("4k3/8/8/8/8/8/1R6/4K3 b - - 1 1", &[("e8", &["d8", "f8"], &[])]),
        "a1",
        "b2",
        true,
    ))
    .unwrap();
    let completed =
        CompletedMove::from_positions(MoveIntent::new(Coord::A1, Coord::B2), &before, &after)
            .unwrap();
    assert!(completed.is_special_step);
    assert_eq!(completed.format(AlgebraicCharset::Ascii), "Rb2(KS)");

    let view = render_board(&after, InteractionState::Idle);
    assert_eq!(view.squares_with(SquareClass::LastMoveSpecialStep), vec![Coord::B2]);
}

#[test]
fn notation_examples() {
    let nf3 = CompletedMove::new(PieceKind::Knight, Coord::G1, Coord::F3, false, false, false, false);
    assert_eq!(nf3.format(AlgebraicCharset::Ascii), "Nf3");
    let exd8 = CompletedMove::new(PieceKind::Pawn, Coord::E7, Coord::D8, true, false, true, true);
    assert_eq!(exd8.format(AlgebraicCharset::Ascii), "exd8#");
}
