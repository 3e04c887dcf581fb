// Client engine: owns the confirmed position and the local interaction state, turns user
// gestures into server requests and applies server responses.
//
// The engine is single-threaded and never blocks. Outgoing requests are sent to a channel;
// the owner of the transport executes them and passes results to `process_response`.

use std::collections::HashMap;
use std::sync::mpsc;

use crate::event::{BoardSnapshot, MoveOutcome, MoveRejection};
use crate::gateway::{OutgoingRequest, RequestId, SyncRequest, SyncResponse, TransportError};
use crate::interaction::{
    reconcile, transition, Gesture, GestureError, GestureOutcome, InteractionState, MoveIntent,
    Transition,
};
use crate::lifecycle::{Lifecycle, RESET_PROMPT};
use crate::notation::{AlgebraicCharset, CompletedMove, MoveRecord, MoveRecordEntry};
use crate::position::{Position, TerminationFlags};
use crate::render::{render_board, BoardView};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Notice {
    TransportFailure(String),
    MoveRejected(String),
    ResetFailed(String),
    MalformedPosition(String),
    // The board is frozen because the game is over.
    ResetPrompt,
}

// Everything the user sees. All calls are made synchronously from engine methods.
pub trait Presenter {
    fn render(&mut self, view: &BoardView);
    fn append_notation(&mut self, entry: &MoveRecordEntry);
    fn clear_notation(&mut self);
    fn lifecycle_changed(&mut self, lifecycle: &Lifecycle);
    fn notice(&mut self, notice: Notice);
}

#[derive(Clone, Copy, Debug)]
struct InFlightRequest {
    request: SyncRequest,
    // Reset epoch the request was issued in.
    epoch: u32,
}

#[derive(Clone, Copy, Debug)]
enum SnapshotSource {
    Fetch,
    // Own move confirmed by the server.
    OwnMove(MoveIntent),
}

pub struct ClientEngine<P: Presenter> {
    presenter: P,
    requests_tx: mpsc::Sender<OutgoingRequest>,
    next_request_id: u64,
    epoch: u32,
    in_flight: HashMap<RequestId, InFlightRequest>,
    pending_move: Option<RequestId>,
    // Reset request, and then the board fetch that follows it. Input is blocked until the
    // board of the new game arrives.
    pending_reset: Option<RequestId>,
    // Last position confirmed by the server; `None` until the first board arrives.
    position: Option<Position>,
    interaction: InteractionState,
    lifecycle: Lifecycle,
    move_record: MoveRecord,
    charset: AlgebraicCharset,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::TransportFailure(message) => format!("Connection problem: {message}"),
            Notice::MoveRejected(message) => format!("Move rejected: {message}"),
            Notice::ResetFailed(message) => format!("Reset failed: {message}"),
            Notice::MalformedPosition(message) => {
                format!("Ignoring invalid board from server: {message}")
            }
            Notice::ResetPrompt => RESET_PROMPT.to_owned(),
        }
    }
}

impl<P: Presenter> ClientEngine<P> {
    pub fn new(
        presenter: P, requests_tx: mpsc::Sender<OutgoingRequest>, charset: AlgebraicCharset,
    ) -> Self {
        ClientEngine {
            presenter,
            requests_tx,
            next_request_id: 1,
            epoch: 0,
            in_flight: HashMap::new(),
            pending_move: None,
            pending_reset: None,
            position: None,
            interaction: InteractionState::Idle,
            lifecycle: Lifecycle::new(),
            move_record: MoveRecord::new(),
            charset,
        }
    }

    pub fn presenter(&self) -> &P { &self.presenter }
    pub fn presenter_mut(&mut self) -> &mut P { &mut self.presenter }
    pub fn position(&self) -> Option<&Position> { self.position.as_ref() }
    pub fn interaction(&self) -> InteractionState { self.interaction }
    pub fn lifecycle(&self) -> &Lifecycle { &self.lifecycle }
    pub fn move_record(&self) -> &MoveRecord { &self.move_record }
    pub fn has_pending_move(&self) -> bool { self.pending_move.is_some() }
    pub fn has_pending_reset(&self) -> bool { self.pending_reset.is_some() }

    // Whether a gesture can currently lead to a move.
    pub fn accepts_input(&self) -> bool {
        self.position.as_ref().is_some_and(|p| !p.is_terminated())
            && self.lifecycle.is_live()
            && self.pending_move.is_none()
            && self.pending_reset.is_none()
    }

    pub fn view(&self) -> Option<BoardView> {
        self.position.as_ref().map(|position| render_board(position, self.interaction))
    }

    pub fn start(&mut self) { self.request(SyncRequest::FetchBoard); }

    pub fn handle_gesture(&mut self, gesture: Gesture) -> GestureOutcome {
        let Some(position) = &self.position else {
            log::debug!("Ignoring {gesture:?}: no board yet");
            return GestureOutcome::Noop;
        };
        if self.pending_reset.is_some() {
            log::debug!("Ignoring {gesture:?}: waiting for the new game to start");
            return GestureOutcome::Rejected(GestureError::RequestPending);
        }
        if self.lifecycle.is_over() || position.is_terminated() {
            self.interaction = InteractionState::Idle;
            if matches!(gesture, Gesture::Click(_)) {
                self.presenter.notice(Notice::ResetPrompt);
            }
            return GestureOutcome::Rejected(GestureError::GameOver);
        }
        if self.pending_move.is_some() {
            log::debug!("Ignoring {gesture:?}: waiting for the server to confirm a move");
            return GestureOutcome::Rejected(GestureError::RequestPending);
        }
        let Transition { state, outcome } = transition(self.interaction, gesture, position);
        self.interaction = state;
        if let GestureOutcome::Intent(intent) = outcome {
            log::info!("Submitting move {}", intent.to_uci());
            self.pending_move = self.request(SyncRequest::SubmitMove(intent));
        }
        self.render();
        outcome
    }

    pub fn reset(&mut self) {
        log::info!("Resetting the game");
        self.epoch += 1;
        self.pending_move = None;
        self.interaction = InteractionState::Idle;
        self.move_record.clear();
        self.presenter.clear_notation();
        self.lifecycle.reset();
        self.presenter.lifecycle_changed(&self.lifecycle);
        self.pending_reset = self.request(SyncRequest::Reset);
        self.render();
    }

    pub fn dismiss_overlay(&mut self) {
        if self.lifecycle.dismiss_overlay() {
            self.presenter.lifecycle_changed(&self.lifecycle);
        }
    }

    pub fn process_response(&mut self, id: RequestId, response: SyncResponse) {
        let Some(InFlightRequest { request, epoch }) = self.in_flight.remove(&id) else {
            log::warn!("Got response to unknown request {id}: {response:?}");
            return;
        };
        if self.pending_move == Some(id) {
            self.pending_move = None;
        }
        let completes_reset = self.pending_reset == Some(id);
        if completes_reset {
            self.pending_reset = None;
        }
        let is_current_epoch = epoch == self.epoch;
        match (request, response) {
            (SyncRequest::FetchBoard, SyncResponse::Board(result)) => match result {
                Ok(snapshot) => {
                    self.apply_snapshot(&snapshot, SnapshotSource::Fetch, is_current_epoch)
                }
                Err(err) => self.transport_failure(err),
            },
            (SyncRequest::SubmitMove(intent), SyncResponse::Move(result)) => match result {
                Ok(MoveOutcome::Accepted(snapshot)) => {
                    if !is_current_epoch {
                        log::info!("Move {} confirmed after a reset", intent.to_uci());
                    }
                    let source = SnapshotSource::OwnMove(intent);
                    self.apply_snapshot(&snapshot, source, is_current_epoch);
                }
                Ok(MoveOutcome::Rejected(rejection)) => {
                    self.apply_rejection(&rejection, is_current_epoch)
                }
                Err(err) => self.transport_failure(err),
            },
            (SyncRequest::Reset, SyncResponse::Reset(result)) => match result {
                Ok(response) if response.success => {
                    let fetch_id = self.request(SyncRequest::FetchBoard);
                    if completes_reset {
                        self.pending_reset = fetch_id;
                    }
                }
                Ok(response) => {
                    let message = response.error.unwrap_or_else(|| "unknown error".to_owned());
                    log::error!("Server refused to reset the game: {message}");
                    self.presenter.notice(Notice::ResetFailed(message));
                }
                Err(err) => self.transport_failure(err),
            },
            (request, response) => {
                log::error!("Response {response:?} doesn't match request {id}: {request:?}");
            }
        }
    }

    fn request(&mut self, request: SyncRequest) -> Option<RequestId> {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        if self.requests_tx.send(OutgoingRequest { id, request }).is_err() {
            log::error!("Cannot send request {id}: {request:?}, the transport is gone");
            self.transport_failure(TransportError::Network("request channel closed".to_owned()));
            return None;
        }
        self.in_flight.insert(id, InFlightRequest { request, epoch: self.epoch });
        Some(id)
    }

    // Snapshots requested before the last reset still replace the position, but neither the
    // move record nor the lifecycle learns from them: both belong to the new game.
    fn apply_snapshot(
        &mut self, snapshot: &BoardSnapshot, source: SnapshotSource, is_current_epoch: bool,
    ) {
        let new_position = match Position::from_snapshot(snapshot) {
            Ok(position) => position,
            Err(err) => {
                log::error!("Skipping malformed board from server: {err}");
                self.presenter.notice(Notice::MalformedPosition(err.to_string()));
                return;
            }
        };
        match source {
            SnapshotSource::Fetch => {
                self.interaction = reconcile(self.interaction, &new_position);
            }
            SnapshotSource::OwnMove(intent) => {
                if let (true, Some(old_position)) = (is_current_epoch, &self.position) {
                    match CompletedMove::from_positions(intent, old_position, &new_position) {
                        Some(completed) => {
                            let mover = old_position.active_force();
                            let entry =
                                self.move_record.record(mover, completed.format(self.charset));
                            self.presenter.append_notation(entry);
                        }
                        None => log::warn!(
                            "Cannot describe move {}: no piece on {} before the move",
                            intent.to_uci(),
                            intent.from
                        ),
                    }
                }
                self.interaction = InteractionState::Idle;
            }
        }
        if !is_current_epoch {
            log::info!("Applying board requested before the reset; game status unchanged");
        } else if self.lifecycle.observe_position(&new_position) {
            self.interaction = InteractionState::Idle;
            self.presenter.lifecycle_changed(&self.lifecycle);
        }
        self.position = Some(new_position);
        self.render();
    }

    fn apply_rejection(&mut self, rejection: &MoveRejection, is_current_epoch: bool) {
        log::info!("Move rejected by server: {}", rejection.error);
        self.presenter.notice(Notice::MoveRejected(rejection.error.clone()));
        let termination = TerminationFlags::from(rejection).termination_reason();
        if let (true, Some(reason)) = (is_current_epoch, termination) {
            // Our position is stale: the game has ended on the server.
            self.interaction = InteractionState::Idle;
            if self.lifecycle.observe_termination(reason) {
                self.presenter.lifecycle_changed(&self.lifecycle);
            }
            self.request(SyncRequest::FetchBoard);
        } else if let Some(position) = &self.position {
            self.interaction = reconcile(self.interaction, position);
        }
        self.render();
    }

    fn transport_failure(&mut self, err: TransportError) {
        log::error!("Request to server failed: {err}");
        self.interaction = InteractionState::Idle;
        self.presenter.notice(Notice::TransportFailure(err.to_string()));
        self.render();
    }

    fn render(&mut self) {
        if let Some(position) = &self.position {
            let view = render_board(position, self.interaction);
            self.presenter.render(&view);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;
    use crate::test_util::starting_snapshot;

    #[derive(Default)]
    struct NullPresenter {
        renders: usize,
    }

    impl Presenter for NullPresenter {
        fn render(&mut self, _view: &BoardView) { self.renders += 1; }
        fn append_notation(&mut self, _entry: &MoveRecordEntry) {}
        fn clear_notation(&mut self) {}
        fn lifecycle_changed(&mut self, _lifecycle: &Lifecycle) {}
        fn notice(&mut self, _notice: Notice) {}
    }

    #[test]
    fn gestures_before_first_board_are_ignored() {
        let (tx, rx) = mpsc::channel();
        let mut engine = ClientEngine::new(NullPresenter::default(), tx, AlgebraicCharset::Ascii);
        assert_eq!(engine.handle_gesture(Gesture::Click(Coord::E2)), GestureOutcome::Noop);
        assert!(!engine.accepts_input());
        assert!(rx.try_recv().is_err());
        assert_eq!(engine.presenter().renders, 0);
    }

    #[test]
    fn unknown_response_is_ignored() {
        let (tx, _rx) = mpsc::channel();
        let mut engine = ClientEngine::new(NullPresenter::default(), tx, AlgebraicCharset::Ascii);
        engine.process_response(RequestId(42), SyncResponse::Board(Ok(starting_snapshot())));
        assert_eq!(engine.position(), None);
    }

    #[test]
    fn mismatched_response_is_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut engine = ClientEngine::new(NullPresenter::default(), tx, AlgebraicCharset::Ascii);
        engine.start();
        let OutgoingRequest { id, request } = rx.try_recv().unwrap();
        assert_eq!(request, SyncRequest::FetchBoard);
        engine.process_response(id, SyncResponse::Reset(Ok(Default::default())));
        assert_eq!(engine.position(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_does_not_block_input() {
        let (tx, rx) = mpsc::channel();
        let mut engine = ClientEngine::new(NullPresenter::default(), tx, AlgebraicCharset::Ascii);
        engine.start();
        let OutgoingRequest { id, .. } = rx.try_recv().unwrap();
        engine.process_response(id, SyncResponse::Board(Ok(starting_snapshot())));
        drop(rx);
        engine.handle_gesture(Gesture::Click(Coord::G1));
        let outcome = engine.handle_gesture(Gesture::Click(Coord::F3));
        assert!(matches!(outcome, GestureOutcome::Intent(_)));
        assert!(!engine.has_pending_move());
        assert_eq!(engine.interaction(), InteractionState::Idle);
    }
}
