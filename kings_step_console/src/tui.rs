use console::Style;
use itertools::Itertools;
use kings_step_chess::coord::Col;
use kings_step_chess::lifecycle::Lifecycle;
use kings_step_chess::notation::MoveRecordEntry;
use kings_step_chess::render::{BoardView, SquareClass, SquareView};


fn format_square(ch: char) -> String { format!(" {} ", ch) }

fn square_style(square: &SquareView) -> Style {
    use SquareClass::*;
    let style = Style::new().color256(233);
    // Ordered by priority: only one background can be shown.
    let background = [
        (InCheck, 203),
        (Selected, 75),
        (ValidCapture, 210),
        (ValidSpecialStep, 141),
        (ValidMove, 114),
        (LastMoveSpecialStep, 183),
        (LastMoveTo, 186),
        (LastMoveFrom, 187),
        (Light, 230),
    ]
    .into_iter()
    .find(|(class, _)| square.has(*class))
    .map_or(222, |(_, color)| color);
    style.on_color256(background)
}

fn square_symbol(square: &SquareView, unicode_pieces: bool) -> char {
    match square.piece {
        Some(piece) if unicode_pieces => piece.pictogram(),
        Some(piece) => piece.to_ascii(),
        None if square.has(SquareClass::ValidMove) => '·',
        None if square.has(SquareClass::ValidSpecialStep) => '∘',
        None => ' ',
    }
}

pub fn render_grid(view: &BoardView, unicode_pieces: bool) -> String {
    let mut ret = String::new();
    for rank in view.squares.chunks(8) {
        ret.push_str(&format_square(rank[0].coord.row.to_algebraic()));
        for square in rank {
            let text = format_square(square_symbol(square, unicode_pieces));
            ret.push_str(&square_style(square).apply_to(text).to_string());
        }
        ret.push('\n');
    }
    ret.push_str(&format_square(' '));
    ret.push_str(&Col::all().map(|col| format_square(col.to_algebraic())).join(""));
    ret.push('\n');
    ret
}

pub fn render_status(view: &BoardView, lifecycle: &Lifecycle) -> String {
    let mut ret = format!("Turn: {}", view.status.turn);
    if let Some(summary) = lifecycle.summary() {
        if lifecycle.overlay_visible {
            ret = format!("{}\n{}\n{}", summary.title, summary.message, summary.subtitle);
        } else {
            ret.push_str(&format!("\n{}", summary.title));
        }
    } else if let Some(ref notice) = view.status.check_notice {
        ret.push_str(&format!("\n{}", Style::new().red().bold().apply_to(notice)));
    }
    ret
}

pub fn render_move_record(entries: &[MoveRecordEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:>3}. {:<10} {}",
                entry.number,
                entry.white.as_deref().unwrap_or("..."),
                entry.black.as_deref().unwrap_or("")
            )
            .trim_end()
            .to_owned()
        })
        .join("\n")
}


#[cfg(test)]
mod tests {
    use kings_step_chess::interaction::InteractionState;
    use kings_step_chess::position::Position;
    use kings_step_chess::render::render_board;
    use kings_step_chess::test_util::starting_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn grid_layout() {
        console::set_colors_enabled(false);
        let position = Position::from_snapshot(&starting_snapshot()).unwrap();
        let view = render_board(&position, InteractionState::Selected(kings_step_chess::Coord::G1));
        let grid = render_grid(&view, false);
        let lines = grid.lines().collect_vec();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], " 8  r  n  b  q  k  b  n  r ");
        assert_eq!(lines[5], " 3                 ·     · ");
        assert_eq!(lines[8], "    a  b  c  d  e  f  g  h ");
    }

    #[test]
    fn move_record() {
        let entries = vec![
            MoveRecordEntry { number: 1, white: Some("e4".to_owned()), black: Some("e5".to_owned()) },
            MoveRecordEntry { number: 2, white: Some("Nf3".to_owned()), black: None },
        ];
        assert_eq!(render_move_record(&entries), "  1. e4         e5\n  2. Nf3");
    }
}
