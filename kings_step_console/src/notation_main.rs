use anyhow::Context;
use kings_step_chess::coord::Coord;
use kings_step_chess::notation::{AlgebraicCharset, CompletedMove};
use kings_step_chess::piece::PieceKind;


pub struct NotationConfig {
    pub piece: String,
    pub from: String,
    pub to: String,
    pub is_capture: bool,
    pub is_special_step: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub unicode: bool,
}

fn parse_piece(s: &str) -> Option<PieceKind> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => PieceKind::from_algebraic_char(ch.to_ascii_uppercase()),
        _ => None,
    }
}

fn format_move(config: &NotationConfig) -> anyhow::Result<String> {
    let piece_kind = parse_piece(&config.piece).context(format!("Invalid piece: {}", config.piece))?;
    let from = Coord::from_algebraic(&config.from).context(format!("Invalid square: {}", config.from))?;
    let to = Coord::from_algebraic(&config.to).context(format!("Invalid square: {}", config.to))?;
    let completed = CompletedMove::new(
        piece_kind,
        from,
        to,
        config.is_capture,
        config.is_special_step,
        config.is_check,
        config.is_checkmate,
    );
    let charset =
        if config.unicode { AlgebraicCharset::AuxiliaryUnicode } else { AlgebraicCharset::Ascii };
    Ok(completed.format(charset))
}

pub fn run(config: NotationConfig) -> anyhow::Result<()> {
    println!("{}", format_move(&config)?);
    Ok(())
}
