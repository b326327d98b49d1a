use crate::{
  commands::ResolvedCommand,
  os::{OsCategory, SelectionMode},
};

/// Frames the page sends over `/ws`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
  Select { os: SelectionMode },
  Copied { index: usize, ok: bool },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
  Commands(Snapshot),
  CopyFeedback { copied: Option<usize> },
  Error { message: String },
}

/// Everything the page needs to draw the command list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Snapshot {
  pub detected: OsCategory,
  pub selection: SelectionMode,
  pub effective: OsCategory,
  pub commands: Vec<ResolvedCommand>,
}

impl ClientEvent {
  pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(text)
  }
}

impl ServerEvent {
  pub fn encode(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string(self)
  }
}
