// HTTP transport to the game server.

use std::time::Duration;

use anyhow::Context;
use kings_step_chess::event::{
    BoardSnapshot, MoveAccepted, MoveOutcome, MoveRejection, MoveRequest, ResetResponse, BOARD_PATH,
    MOVE_PATH, RESET_PATH,
};
use kings_step_chess::gateway::{SyncGateway, TransportError};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;


pub struct HttpGateway {
    client: Client,
    base_url: String,
}

struct RawResponse {
    status: StatusCode,
    body: String,
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|err| TransportError::Decode(err.to_string()))
}

impl RawResponse {
    fn unexpected_status(self) -> TransportError {
        TransportError::Http { status: self.status.as_u16(), body: self.body }
    }
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build().context("Cannot create HTTP client")?;
        Ok(HttpGateway {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    fn send(&self, request: RequestBuilder) -> Result<RawResponse, TransportError> {
        let response = request.send().map_err(|err| TransportError::Network(err.to_string()))?;
        let status = response.status();
        let body = response.text().map_err(|err| TransportError::Network(err.to_string()))?;
        log::debug!("HTTP {status}: {body}");
        Ok(RawResponse { status, body })
    }
}

impl SyncGateway for HttpGateway {
    fn fetch_board(&mut self) -> Result<BoardSnapshot, TransportError> {
        let response = self.send(self.client.get(self.url(BOARD_PATH)))?;
        if !response.status.is_success() {
            return Err(response.unexpected_status());
        }
        decode(&response.body)
    }

    fn submit_move(&mut self, request: &MoveRequest) -> Result<MoveOutcome, TransportError> {
        let response = self.send(self.client.post(self.url(MOVE_PATH)).json(request))?;
        if response.status.is_success() {
            let accepted: MoveAccepted = decode(&response.body)?;
            Ok(MoveOutcome::Accepted(accepted.board))
        } else if response.status == StatusCode::BAD_REQUEST {
            let rejection: MoveRejection = decode(&response.body)?;
            Ok(MoveOutcome::Rejected(rejection))
        } else {
            Err(response.unexpected_status())
        }
    }

    fn reset(&mut self) -> Result<ResetResponse, TransportError> {
        let response = self.send(self.client.post(self.url(RESET_PATH)))?;
        // A refused reset still comes with `{success: false, error}`.
        match decode::<ResetResponse>(&response.body) {
            Ok(reset) if response.status.is_success() || !reset.success => Ok(reset),
            Ok(_) => Err(response.unexpected_status()),
            Err(err) if response.status.is_success() => Err(err),
            Err(_) => Err(response.unexpected_status()),
        }
    }
}
