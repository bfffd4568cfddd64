use serde::{Deserialize, Serialize};

use crate::host::{HostCommand, HostSnapshot};
use crate::mode::Mode;
use crate::model::TabId;
use crate::render::Row;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenRequest {
    /// One of the `toggle-*` command strings; unknown values open the tab finder.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub snapshot: HostSnapshot,
    #[serde(default)]
    pub current_tab_id: Option<TabId>,
    #[serde(default)]
    pub previous_tab_id: Option<TabId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum FinderRequest {
    Open(OpenRequest),
    Query(QueryRequest),
    Move(MoveRequest),
    Expand,
    Collapse,
    Click(IndexRequest),
    Select(IndexRequest),
    Confirm,
    Close,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewResponse {
    pub mode: Mode,
    pub placeholder: String,
    pub query: String,
    pub rows: Vec<Row>,
    pub selected_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResponse {
    pub command: HostCommand,
    pub close: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum FinderResponse {
    View(ViewResponse),
    Command(CommandResponse),
    Closed,
}
