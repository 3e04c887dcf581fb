// Wire format of the game server API. Field names follow the server's JSON (camelCase).
//
// Wire types are deliberately loose (strings for squares, optional flags): the server is
// trusted for game semantics, but a snapshot is validated as a whole by
// `Position::from_snapshot` before anything is displayed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::force::Force;
use crate::interaction::MoveIntent;


pub const BOARD_PATH: &str = "/api/board";
pub const MOVE_PATH: &str = "/api/move";
pub const RESET_PATH: &str = "/api/reset";

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MoveInfoEntry {
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub captures: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMoveInfo {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub is_kings_step: bool,
    // Not sent by every server version. When missing, the client infers it from the capture
    // candidates of the previous position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_capture: Option<bool>,
}

// Response to `GET /api/board`; also embedded into a successful move response.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub fen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_fen: Option<String>,
    pub turn: Force,
    #[serde(default)]
    pub move_info: HashMap<String, MoveInfoEntry>,
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_game_over: bool,
    #[serde(default)]
    pub game_over_reason: Option<String>,
    #[serde(default)]
    pub is_checkmate: bool,
    #[serde(default)]
    pub is_stalemate: bool,
    #[serde(default)]
    pub is_threefold_repetition: bool,
    #[serde(default)]
    pub is_fifty_moves: bool,
    #[serde(default)]
    pub is_insufficient_material: bool,
    #[serde(default)]
    pub in_check: Option<String>,
    #[serde(default)]
    pub last_move: Option<LastMoveInfo>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub uci: String,
}

// Body of a 2xx response to `POST /api/move`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveAccepted {
    #[serde(default)]
    pub success: bool,
    #[serde(flatten)]
    pub board: BoardSnapshot,
}

// Body of a 4xx response to `POST /api/move`. Game-over fields are only present when the
// move was rejected because the game had already ended.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRejection {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub is_game_over: bool,
    #[serde(default)]
    pub game_over_reason: Option<String>,
    #[serde(default)]
    pub is_checkmate: bool,
    #[serde(default)]
    pub is_stalemate: bool,
    #[serde(default)]
    pub is_threefold_repetition: bool,
    #[serde(default)]
    pub is_fifty_moves: bool,
    #[serde(default)]
    pub is_insufficient_material: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Accepted(BoardSnapshot),
    Rejected(MoveRejection),
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<MoveIntent> for MoveRequest {
    fn from(intent: MoveIntent) -> Self { MoveRequest { uci: intent.to_uci() } }
}
