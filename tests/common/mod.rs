// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public items.

use std::collections::HashMap;
use std::sync::mpsc;

use kings_step_chess::client::{ClientEngine, Notice, Presenter};
use kings_step_chess::event::{BoardSnapshot, MoveOutcome, MoveRejection, MoveRequest, ResetResponse};
use kings_step_chess::gateway::{pump, OutgoingRequest, SyncGateway, SyncRequest, TransportError};
use kings_step_chess::interaction::{Gesture, GestureOutcome, MoveIntent};
use kings_step_chess::lifecycle::Lifecycle;
use kings_step_chess::notation::{AlgebraicCharset, MoveRecordEntry};
use kings_step_chess::render::BoardView;
use kings_step_chess::test_util::starting_snapshot;


#[macro_export]
macro_rules! gesture {
    (click $coord:ident) => {
        kings_step_chess::interaction::Gesture::Click(kings_step_chess::coord::Coord::$coord)
    };
    (drag $coord:ident) => {
        kings_step_chess::interaction::Gesture::DragStart(kings_step_chess::coord::Coord::$coord)
    };
    (drop $coord:ident) => {
        kings_step_chess::interaction::Gesture::Drop(kings_step_chess::coord::Coord::$coord)
    };
    (cancel) => {
        kings_step_chess::interaction::Gesture::DragCancel
    };
}

#[macro_export]
macro_rules! intent {
    ($from:ident -> $to:ident) => {
        kings_step_chess::interaction::MoveIntent {
            from: kings_step_chess::coord::Coord::$from,
            to: kings_step_chess::coord::Coord::$to,
        }
    };
}


#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingPresenter {
    pub views: Vec<BoardView>,
    pub notation: Vec<MoveRecordEntry>,
    pub num_notation_clears: usize,
    pub lifecycles: Vec<Lifecycle>,
    pub notices: Vec<Notice>,
}

impl RecordingPresenter {
    #[allow(dead_code)]
    pub fn last_view(&self) -> &BoardView { self.views.last().unwrap() }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, view: &BoardView) { self.views.push(view.clone()); }
    fn append_notation(&mut self, entry: &MoveRecordEntry) { self.notation.push(entry.clone()); }
    fn clear_notation(&mut self) { self.num_notation_clears += 1; }
    fn lifecycle_changed(&mut self, lifecycle: &Lifecycle) { self.lifecycles.push(*lifecycle); }
    fn notice(&mut self, notice: Notice) { self.notices.push(notice); }
}


// In-memory stand-in for the game server. Knows only the moves it has been scripted with:
// every other move is rejected as illegal.
#[allow(dead_code)]
pub struct FakeServer {
    pub board: BoardSnapshot,
    pub initial_board: BoardSnapshot,
    // Move in UCI notation -> board after the move.
    pub scripted_moves: HashMap<String, BoardSnapshot>,
    pub offline: bool,
    pub requests: Vec<SyncRequest>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn new() -> Self { Self::with_board(starting_snapshot()) }

    pub fn with_board(board: BoardSnapshot) -> Self {
        FakeServer {
            board,
            initial_board: starting_snapshot(),
            scripted_moves: HashMap::new(),
            offline: false,
            requests: Vec::new(),
        }
    }

    pub fn script_move(&mut self, uci: &str, board: BoardSnapshot) {
        self.scripted_moves.insert(uci.to_owned(), board);
    }

    fn check_online(&self) -> Result<(), TransportError> {
        if self.offline {
            Err(TransportError::Network("connection refused".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl SyncGateway for FakeServer {
    fn fetch_board(&mut self) -> Result<BoardSnapshot, TransportError> {
        self.requests.push(SyncRequest::FetchBoard);
        self.check_online()?;
        Ok(self.board.clone())
    }

    fn submit_move(&mut self, request: &MoveRequest) -> Result<MoveOutcome, TransportError> {
        self.requests.push(SyncRequest::SubmitMove(MoveIntent::from_uci(&request.uci).unwrap()));
        self.check_online()?;
        if self.board.is_game_over {
            return Ok(MoveOutcome::Rejected(MoveRejection {
                error: "Game is already over.".to_owned(),
                is_game_over: true,
                game_over_reason: self.board.game_over_reason.clone(),
                is_checkmate: self.board.is_checkmate,
                is_stalemate: self.board.is_stalemate,
                ..Default::default()
            }));
        }
        match self.scripted_moves.remove(&request.uci) {
            Some(board) => {
                self.board = board.clone();
                Ok(MoveOutcome::Accepted(board))
            }
            None => Ok(MoveOutcome::Rejected(MoveRejection {
                error: "Illegal move".to_owned(),
                ..Default::default()
            })),
        }
    }

    fn reset(&mut self) -> Result<ResetResponse, TransportError> {
        self.requests.push(SyncRequest::Reset);
        self.check_online()?;
        self.board = self.initial_board.clone();
        Ok(ResetResponse { success: true, error: None })
    }
}


#[allow(dead_code)]
pub struct TestClient {
    pub engine: ClientEngine<RecordingPresenter>,
    pub requests_rx: mpsc::Receiver<OutgoingRequest>,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new() -> Self {
        let (requests_tx, requests_rx) = mpsc::channel();
        let engine =
            ClientEngine::new(RecordingPresenter::default(), requests_tx, AlgebraicCharset::Ascii);
        TestClient { engine, requests_rx }
    }

    // Creates a client and loads the server's current board.
    pub fn connected(server: &mut FakeServer) -> Self {
        let mut client = Self::new();
        client.engine.start();
        client.sync(server);
        client
    }

    pub fn presenter(&self) -> &RecordingPresenter { self.engine.presenter() }

    pub fn gesture(&mut self, gesture: Gesture) -> GestureOutcome {
        self.engine.handle_gesture(gesture)
    }

    // Delivers all queued requests to the server and feeds responses back to the engine.
    pub fn sync(&mut self, server: &mut FakeServer) -> usize {
        pump(&mut self.engine, &self.requests_rx, server)
    }

    // Takes queued requests without executing them.
    pub fn take_requests(&mut self) -> Vec<OutgoingRequest> { self.requests_rx.try_iter().collect() }
}
