#[derive(Debug, thiserror::Error)]
#[error("unrecognised operating system {0:?}, expected auto, windows, macos or linux")]
pub struct ParseOsError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid {var} value {value:?}: {source}")]
  InvalidPort {
    var: &'static str,
    value: String,
    source: std::num::ParseIntError,
  },
}

impl From<ConfigError> for std::io::Error {
  fn from(e: ConfigError) -> Self {
    std::io::Error::other(e)
  }
}
