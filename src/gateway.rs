// Requests the client sends to the game server and the responses it gets back.
//
// The engine never talks to the network itself: it queues `OutgoingRequest`s, and whoever
// owns the transport executes them and feeds the results back via
// `ClientEngine::process_response`.

use std::fmt;
use std::sync::mpsc;

use crate::client::{ClientEngine, Presenter};
use crate::event::{BoardSnapshot, MoveOutcome, MoveRequest, ResetResponse};
use crate::interaction::MoveIntent;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RequestId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncRequest {
    FetchBoard,
    SubmitMove(MoveIntent),
    Reset,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OutgoingRequest {
    pub id: RequestId,
    pub request: SyncRequest,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TransportError {
    // Connection could not be established or was interrupted.
    Network(String),
    // Server replied with an unexpected status code.
    Http { status: u16, body: String },
    // Server replied, but the body is not what the API promises.
    Decode(String),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SyncResponse {
    Board(Result<BoardSnapshot, TransportError>),
    Move(Result<MoveOutcome, TransportError>),
    Reset(Result<ResetResponse, TransportError>),
}

// Blocking transport to the game server.
pub trait SyncGateway {
    fn fetch_board(&mut self) -> Result<BoardSnapshot, TransportError>;
    // A move rejected by the server is a successful exchange: `Ok(MoveOutcome::Rejected)`.
    fn submit_move(&mut self, request: &MoveRequest) -> Result<MoveOutcome, TransportError>;
    fn reset(&mut self) -> Result<ResetResponse, TransportError>;

    fn execute(&mut self, request: SyncRequest) -> SyncResponse {
        match request {
            SyncRequest::FetchBoard => SyncResponse::Board(self.fetch_board()),
            SyncRequest::SubmitMove(intent) => {
                SyncResponse::Move(self.submit_move(&MoveRequest::from(intent)))
            }
            SyncRequest::Reset => SyncResponse::Reset(self.reset()),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(message) => write!(f, "network error: {message}"),
            TransportError::Http { status, body } if body.is_empty() => {
                write!(f, "server returned HTTP {status}")
            }
            TransportError::Http { status, body } => {
                write!(f, "server returned HTTP {status}: {body}")
            }
            TransportError::Decode(message) => write!(f, "cannot decode server response: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

// Executes all queued requests, including the ones queued while processing responses (e.g. the
// board fetch that follows a reset). Returns the number of requests executed.
pub fn pump<P: Presenter, G: SyncGateway + ?Sized>(
    engine: &mut ClientEngine<P>, requests_rx: &mpsc::Receiver<OutgoingRequest>, gateway: &mut G,
) -> usize {
    let mut num_executed = 0;
    while let Ok(OutgoingRequest { id, request }) = requests_rx.try_recv() {
        log::debug!("Executing request {id}: {request:?}");
        let response = gateway.execute(request);
        engine.process_response(id, response);
        num_executed += 1;
    }
    num_executed
}
