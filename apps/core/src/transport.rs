use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::contract::{
    CommandResponse, FinderRequest, FinderResponse, MoveDirection, OpenRequest, ViewResponse,
};
use crate::host::SnapshotHost;
use crate::mode::Mode;
use crate::selection::Direction;
use crate::session::{FinderSession, SessionError};

const FALLBACK_RESPONSE: &str =
    r#"{"status":"err","error":{"code":"internal","message":"response encoding failed"}}"#;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    NoSession,
    Host,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: FinderResponse },
    Err { error: ErrorResponse },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no finder session is open")]
    NoSession,
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Request loop state for one overlay shell connection.
///
/// Holds at most one session; `open` replaces it, `close` drops it.
pub struct FinderServer {
    config: Config,
    session: Option<FinderSession>,
}

impl FinderServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&FinderSession> {
        self.session.as_ref()
    }

    pub fn handle_request(&mut self, request: FinderRequest) -> TransportResponse {
        match self.dispatch(request) {
            Ok(response) => TransportResponse::Ok { response },
            Err(error) => {
                warn!(%error, "finder request failed");
                TransportResponse::Err {
                    error: map_transport_error(error),
                }
            }
        }
    }

    pub fn handle_json(&mut self, payload: &str) -> String {
        let response = match serde_json::from_str::<FinderRequest>(payload) {
            Ok(request) => self.handle_request(request),
            Err(error) => TransportResponse::Err {
                error: ErrorResponse {
                    code: ErrorCode::InvalidJson,
                    message: error.to_string(),
                },
            },
        };

        serde_json::to_string(&response).unwrap_or_else(|_| FALLBACK_RESPONSE.to_string())
    }

    /// Newline-delimited JSON: one request per line, one response per line.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_json(&line);
            writer.write_all(response.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        debug!("finder transport input closed");
        Ok(())
    }

    fn dispatch(&mut self, request: FinderRequest) -> Result<FinderResponse, TransportError> {
        match request {
            FinderRequest::Open(open) => {
                self.session = Some(self.open_session(open)?);
                self.view()
            }
            FinderRequest::Close => {
                self.session = None;
                Ok(FinderResponse::Closed)
            }
            FinderRequest::Query(query) => {
                self.active()?.set_query(&query.text);
                self.view()
            }
            FinderRequest::Move(movement) => {
                let direction = match movement.direction {
                    MoveDirection::Up => Direction::Up,
                    MoveDirection::Down => Direction::Down,
                };
                self.active()?.move_selection(direction);
                self.view()
            }
            FinderRequest::Expand => {
                self.active()?.expand_selected();
                self.view()
            }
            FinderRequest::Collapse => {
                self.active()?.collapse_selected();
                self.view()
            }
            FinderRequest::Select(target) => {
                if !self.active()?.select(target.index) {
                    return Err(out_of_range(target.index));
                }
                self.view()
            }
            FinderRequest::Click(target) => {
                if !self.active()?.select(target.index) {
                    return Err(out_of_range(target.index));
                }
                self.confirm()
            }
            FinderRequest::Confirm => self.confirm(),
        }
    }

    fn open_session(&self, open: OpenRequest) -> Result<FinderSession, TransportError> {
        let mode = Mode::from_command(open.command.as_deref());
        let mut snapshot = open.snapshot;
        if open.current_tab_id.is_some() {
            snapshot.current_tab_id = open.current_tab_id;
        }
        let host = SnapshotHost::new(snapshot);
        let session = FinderSession::open(mode, &host, &self.config)?;
        Ok(session.with_previous_tab(open.previous_tab_id))
    }

    fn confirm(&mut self) -> Result<FinderResponse, TransportError> {
        match self.active()?.confirm() {
            Some(command) => {
                self.session = None;
                Ok(FinderResponse::Command(CommandResponse {
                    command,
                    close: true,
                }))
            }
            None => self.view(),
        }
    }

    fn active(&mut self) -> Result<&mut FinderSession, TransportError> {
        self.session.as_mut().ok_or(TransportError::NoSession)
    }

    fn view(&self) -> Result<FinderResponse, TransportError> {
        let session = self.session.as_ref().ok_or(TransportError::NoSession)?;
        let mode = session.mode();
        let empty_message = session
            .candidates()
            .is_empty()
            .then(|| mode.empty_message().to_string());

        Ok(FinderResponse::View(ViewResponse {
            mode,
            placeholder: mode.placeholder().to_string(),
            query: session.query().to_string(),
            rows: session.rows(),
            selected_index: session.selected_index(),
            empty_message,
        }))
    }
}

fn out_of_range(index: usize) -> TransportError {
    TransportError::InvalidRequest(format!("row index {index} is out of range"))
}

fn map_transport_error(error: TransportError) -> ErrorResponse {
    let code = match &error {
        TransportError::NoSession => ErrorCode::NoSession,
        TransportError::InvalidRequest(_) => ErrorCode::InvalidRequest,
        TransportError::Session(SessionError::Host(_)) => ErrorCode::Host,
    };
    ErrorResponse {
        code,
        message: error.to_string(),
    }
}
