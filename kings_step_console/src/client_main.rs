// Interactive console client. Reads one command per line, executes it and redraws the board.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;

use anyhow::Context;
use crossterm::style::Stylize;
use crossterm::{cursor, execute, terminal};
use kings_step_chess::client::{ClientEngine, Notice, Presenter};
use kings_step_chess::coord::Coord;
use kings_step_chess::gateway::pump;
use kings_step_chess::interaction::{Gesture, GestureError, GestureOutcome, InteractionState};
use kings_step_chess::lifecycle::Lifecycle;
use kings_step_chess::notation::{MoveRecord, MoveRecordEntry};
use kings_step_chess::render::BoardView;
use regex_lite::Regex;

use crate::client_config::ClientConfig;
use crate::network::HttpGateway;
use crate::tui;


pub struct PlayConfig {
    pub server_url: String,
    pub client: ClientConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Command {
    Click(Coord),
    // Shortcut for two clicks.
    Move(Coord, Coord),
    Drag(Coord),
    Drop(Coord),
    Cancel,
    Reset,
    Dismiss,
    Refresh,
    History,
    Help,
    Quit,
}

struct CommandParser {
    square_re: Regex,
    move_re: Regex,
    drag_re: Regex,
}

struct ConsolePresenter {
    unicode_pieces: bool,
    view: Option<BoardView>,
    lifecycle: Lifecycle,
    notices: Vec<Notice>,
}

const HELP: &str = "\
Commands:
  <square>         click a square, e.g. `e2`
  <from><to>       click two squares, e.g. `e2e4`
  drag <square>    start dragging a piece
  drop <square>    drop the dragged piece
  cancel           cancel dragging
  reset            start a new game
  dismiss          hide the game over message
  refresh          reload the board from the server
  history          show all moves
  quit";

impl CommandParser {
    fn new() -> Result<Self, regex_lite::Error> {
        Ok(CommandParser {
            square_re: Regex::new(r"^([a-h][1-8])$")?,
            move_re: Regex::new(r"^([a-h][1-8])\s*-?\s*([a-h][1-8])$")?,
            drag_re: Regex::new(r"^(drag|drop)\s+([a-h][1-8])$")?,
        })
    }

    fn parse(&self, line: &str) -> Result<Command, String> {
        let line = line.trim().to_lowercase();
        let coord = |s: &str| Coord::from_algebraic(s).ok_or_else(|| format!("Invalid square: {s}"));
        if let Some(cap) = self.square_re.captures(&line) {
            return Ok(Command::Click(coord(&cap[1])?));
        }
        if let Some(cap) = self.move_re.captures(&line) {
            return Ok(Command::Move(coord(&cap[1])?, coord(&cap[2])?));
        }
        if let Some(cap) = self.drag_re.captures(&line) {
            let square = coord(&cap[2])?;
            return Ok(match &cap[1] {
                "drag" => Command::Drag(square),
                _ => Command::Drop(square),
            });
        }
        match line.as_str() {
            "cancel" => Ok(Command::Cancel),
            "reset" => Ok(Command::Reset),
            "dismiss" => Ok(Command::Dismiss),
            "refresh" => Ok(Command::Refresh),
            "history" => Ok(Command::History),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(format!("Unknown command: \"{line}\". Type `help` for the list of commands.")),
        }
    }
}

impl ConsolePresenter {
    fn new(unicode_pieces: bool) -> Self {
        ConsolePresenter {
            unicode_pieces,
            view: None,
            lifecycle: Lifecycle::new(),
            notices: Vec::new(),
        }
    }
}

impl Presenter for ConsolePresenter {
    fn render(&mut self, view: &BoardView) { self.view = Some(view.clone()); }

    // The move list is read from the engine's record on every redraw.
    fn append_notation(&mut self, _entry: &MoveRecordEntry) {}
    fn clear_notation(&mut self) {}

    fn lifecycle_changed(&mut self, lifecycle: &Lifecycle) { self.lifecycle = *lifecycle; }
    fn notice(&mut self, notice: Notice) { self.notices.push(notice); }
}

fn gesture_error_message(error: GestureError) -> String {
    match error {
        GestureError::NotOwnPiece(coord) => format!("There is no piece of yours on {coord}"),
        GestureError::NoDragInProgress => "Nothing to drop: start with `drag <square>`".to_owned(),
        GestureError::GameOver => "Game is over".to_owned(),
        GestureError::RequestPending => "Waiting for the server".to_owned(),
    }
}

// Returns an error message to show, if any.
fn execute_command(engine: &mut ClientEngine<ConsolePresenter>, command: Command) -> Option<String> {
    let apply = |engine: &mut ClientEngine<ConsolePresenter>, gesture: Gesture| {
        match engine.handle_gesture(gesture) {
            GestureOutcome::Rejected(GestureError::GameOver) => None, // reset prompt is shown
            GestureOutcome::Rejected(err) => Some(gesture_error_message(err)),
            GestureOutcome::Noop | GestureOutcome::Intent(_) => None,
        }
    };
    match command {
        Command::Click(coord) => apply(engine, Gesture::Click(coord)),
        Command::Move(from, to) => {
            // Clicking an already selected square would deselect it.
            if engine.interaction() == InteractionState::Selected(from) {
                apply(engine, Gesture::Click(to))
            } else {
                apply(engine, Gesture::Click(from)).or_else(|| apply(engine, Gesture::Click(to)))
            }
        }
        Command::Drag(coord) => apply(engine, Gesture::DragStart(coord)),
        Command::Drop(coord) => apply(engine, Gesture::Drop(coord)),
        Command::Cancel => apply(engine, Gesture::DragCancel),
        Command::Reset => {
            engine.reset();
            None
        }
        Command::Dismiss => {
            engine.dismiss_overlay();
            None
        }
        Command::Refresh => {
            engine.start();
            None
        }
        Command::History => Some(engine.move_record().to_movetext()),
        Command::Help => Some(HELP.to_owned()),
        Command::Quit => None,
    }
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl std::fmt::Display) -> io::Result<()> {
    writeln!(stdout, "{v}")
}

// Last few moves; full list is available via `history`.
fn recent_moves(record: &MoveRecord) -> String {
    let entries = record.entries();
    tui::render_move_record(&entries[entries.len().saturating_sub(5)..])
}

fn redraw(
    stdout: &mut io::Stdout, engine: &mut ClientEngine<ConsolePresenter>, message: Option<String>,
) -> io::Result<()> {
    let notices = std::mem::take(&mut engine.presenter_mut().notices);
    let presenter = engine.presenter();
    execute!(stdout, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
    match presenter.view {
        Some(ref view) => {
            writeln_raw(stdout, tui::render_grid(view, presenter.unicode_pieces))?;
            writeln_raw(stdout, tui::render_status(view, &presenter.lifecycle))?;
        }
        None => writeln_raw(stdout, "Loading...")?,
    }
    writeln_raw(stdout, recent_moves(engine.move_record()))?;
    for notice in notices {
        let text = notice.message();
        match notice {
            Notice::ResetPrompt => writeln_raw(stdout, text.magenta())?,
            _ => writeln_raw(stdout, text.red())?,
        }
    }
    if let Some(message) = message {
        writeln_raw(stdout, message.yellow())?;
    }
    write!(stdout, "> ")?;
    stdout.flush()
}

pub fn run(config: PlayConfig) -> anyhow::Result<()> {
    let mut gateway = HttpGateway::new(&config.server_url, config.client.request_timeout)?;
    let (requests_tx, requests_rx) = mpsc::channel();
    let presenter = ConsolePresenter::new(config.client.unicode_pieces);
    let mut engine = ClientEngine::new(presenter, requests_tx, config.client.charset);
    let parser = CommandParser::new().context("Cannot build command parser")?;
    let mut stdout = io::stdout();

    log::info!("Connecting to {}", config.server_url);
    engine.start();
    pump(&mut engine, &requests_rx, &mut gateway);
    redraw(&mut stdout, &mut engine, None)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Cannot read command")?;
        if line.trim().is_empty() {
            redraw(&mut stdout, &mut engine, None)?;
            continue;
        }
        let message = match parser.parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute_command(&mut engine, command),
            Err(err) => Some(err),
        };
        pump(&mut engine, &requests_rx, &mut gateway);
        redraw(&mut stdout, &mut engine, message)?;
    }
    Ok(())
}

// Fetches the board once and prints it.
pub fn show(config: PlayConfig) -> anyhow::Result<()> {
    let mut gateway = HttpGateway::new(&config.server_url, config.client.request_timeout)?;
    let (requests_tx, requests_rx) = mpsc::channel();
    let presenter = ConsolePresenter::new(config.client.unicode_pieces);
    let mut engine = ClientEngine::new(presenter, requests_tx, config.client.charset);
    engine.start();
    pump(&mut engine, &requests_rx, &mut gateway);
    let presenter = engine.presenter();
    if let Some(notice) = presenter.notices.first() {
        anyhow::bail!("{}", notice.message());
    }
    let view = presenter.view.as_ref().context("Server did not send a board")?;
    println!("{}", tui::render_grid(view, presenter.unicode_pieces));
    println!("{}", tui::render_status(view, &presenter.lifecycle));
    println!("FEN: {}", engine.position().map_or("?", |p| p.fen()));
    Ok(())
}
