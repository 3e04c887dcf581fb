#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod coord;
pub mod event;
pub mod fen;
pub mod force;
pub mod gateway;
pub mod grid;
pub mod interaction;
pub mod lifecycle;
pub mod notation;
pub mod piece;
pub mod position;
pub mod render;
pub mod step;
pub mod test_util;

pub use client::{ClientEngine, Notice, Presenter};
pub use coord::{Col, Coord, Row, SubjectiveRow};
pub use event::{BoardSnapshot, MoveOutcome, MoveRejection, MoveRequest, ResetResponse};
pub use force::Force;
pub use gateway::{pump, OutgoingRequest, RequestId, SyncGateway, SyncRequest, SyncResponse, TransportError};
pub use interaction::{Gesture, GestureError, GestureOutcome, InteractionState, MoveIntent};
pub use lifecycle::{Lifecycle, LifecyclePhase, TerminationSummary};
pub use notation::{AlgebraicCharset, CompletedMove, MoveRecord, MoveRecordEntry};
pub use piece::{PieceKind, PieceOnBoard};
pub use position::{GameOutcome, GameStatus, Position, PositionError, TerminationReason};
pub use render::{render_board, BoardView, SquareClass, SquareView, StatusLine};
pub use step::{classify_step, StepClass};
