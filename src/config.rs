use crate::error::ConfigError;

const HOST_VAR: &str = "HELPER_HOST";
const PORT_VAR: &str = "HELPER_PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 35436;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
  pub host: String,
  pub port: u16,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|var| std::env::var(var).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let host = lookup(HOST_VAR)
      .filter(|h| !h.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_HOST.to_owned());

    let port = match lookup(PORT_VAR) {
      Some(value) => value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidPort {
          var: PORT_VAR,
          value,
          source,
        })?,
      None => DEFAULT_PORT,
    };

    Ok(Self { host, port })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}
