use crate::{
  commands::{self, ResolvedCommand},
  event::{ClientEvent, ServerEvent, Snapshot},
  os::{self, OsCategory, SelectionMode},
};

/// Index of the last command that made it onto the clipboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyFeedback {
  copied: Option<usize>,
}

impl CopyFeedback {
  pub fn copied(&self) -> Option<usize> {
    self.copied
  }

  /// A failed copy leaves the previous confirmation in place.
  pub fn record(&mut self, index: usize, ok: bool) {
    if ok {
      self.copied = Some(index);
    }
  }

  pub fn clear(&mut self) {
    self.copied = None;
  }
}

/// State for one page load. Detection happens once, at construction.
#[derive(Clone, Debug)]
pub struct Session {
  id: uuid::Uuid,
  detected: OsCategory,
  selection: SelectionMode,
  copy: CopyFeedback,
}

impl Session {
  pub fn new(user_agent: &str, selection: SelectionMode) -> Self {
    Self {
      id: uuid::Uuid::new_v4(),
      detected: os::detect(user_agent),
      selection,
      copy: CopyFeedback::default(),
    }
  }

  pub fn id(&self) -> uuid::Uuid {
    self.id
  }

  pub fn detected(&self) -> OsCategory {
    self.detected
  }

  pub fn selection(&self) -> SelectionMode {
    self.selection
  }

  pub fn copy_feedback(&self) -> CopyFeedback {
    self.copy
  }

  pub fn effective(&self) -> OsCategory {
    self.selection.effective(self.detected)
  }

  pub fn commands(&self) -> Vec<ResolvedCommand> {
    commands::resolve(self.effective())
  }

  pub fn select(&mut self, selection: SelectionMode) {
    if selection != self.selection {
      self.copy.clear();
    }
    self.selection = selection;
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      detected: self.detected,
      selection: self.selection,
      effective: self.effective(),
      commands: self.commands(),
    }
  }

  pub fn apply(&mut self, event: ClientEvent) -> ServerEvent {
    match event {
      ClientEvent::Select { os } => {
        self.select(os);
        ServerEvent::Commands(self.snapshot())
      }
      ClientEvent::Copied { index, ok } => {
        if index < commands::templates(self.effective()).len() {
          self.copy.record(index, ok);
        }
        ServerEvent::CopyFeedback {
          copied: self.copy.copied(),
        }
      }
    }
  }
}
