use std::{fmt, str::FromStr};

use crate::error::ParseOsError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum OsCategory {
  Windows,
  Macos,
  Linux,
  #[default]
  Unknown,
}

/// User-agent substrings per category, checked in this order. The first
/// category with a matching signature wins, so "x11" alongside "windows nt"
/// still yields Windows.
const SIGNATURES: [(OsCategory, &[&str]); 3] = [
  (OsCategory::Windows, &["windows nt", "win64", "win32"]),
  (OsCategory::Macos, &["mac os x", "macintosh"]),
  (OsCategory::Linux, &["linux", "x11"]),
];

/// Classifies a raw user-agent string. Never fails: no match is `Unknown`.
pub fn detect(user_agent: &str) -> OsCategory {
  let ua = user_agent.to_lowercase();

  SIGNATURES
    .iter()
    .find(|(_, needles)| needles.iter().any(|needle| ua.contains(needle)))
    .map(|(os, _)| *os)
    .unwrap_or(OsCategory::Unknown)
}

impl OsCategory {
  pub const ALL: [OsCategory; 4] = [
    OsCategory::Windows,
    OsCategory::Macos,
    OsCategory::Linux,
    OsCategory::Unknown,
  ];

  pub const fn label(self) -> &'static str {
    match self {
      OsCategory::Windows => "Windows",
      OsCategory::Macos => "macOS",
      OsCategory::Linux => "Linux",
      OsCategory::Unknown => "Unknown",
    }
  }

  pub const fn is_known(self) -> bool {
    !matches!(self, OsCategory::Unknown)
  }
}

impl fmt::Display for OsCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for OsCategory {
  type Err = ParseOsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "windows" => Ok(OsCategory::Windows),
      "macos" => Ok(OsCategory::Macos),
      "linux" => Ok(OsCategory::Linux),
      "unknown" => Ok(OsCategory::Unknown),
      _ => Err(ParseOsError(s.to_owned())),
    }
  }
}

impl From<OsCategory> for &'static str {
  fn from(os: OsCategory) -> Self {
    os.label()
  }
}

impl TryFrom<String> for OsCategory {
  type Error = ParseOsError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// Either defer to the detected category or pin one explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum SelectionMode {
  #[default]
  Auto,
  Explicit(OsCategory),
}

impl SelectionMode {
  pub fn effective(self, detected: OsCategory) -> OsCategory {
    match self {
      SelectionMode::Auto => detected,
      SelectionMode::Explicit(os) => os,
    }
  }

  pub const fn label(self) -> &'static str {
    match self {
      SelectionMode::Auto => "Auto",
      SelectionMode::Explicit(os) => os.label(),
    }
  }
}

impl FromStr for SelectionMode {
  type Err = ParseOsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.trim().eq_ignore_ascii_case("auto") {
      return Ok(SelectionMode::Auto);
    }

    match s.parse()? {
      OsCategory::Unknown => Err(ParseOsError(s.to_owned())),
      os => Ok(SelectionMode::Explicit(os)),
    }
  }
}

impl From<SelectionMode> for &'static str {
  fn from(selection: SelectionMode) -> Self {
    selection.label()
  }
}

impl TryFrom<String> for SelectionMode {
  type Error = ParseOsError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_user_agent_is_unknown() {
    assert_eq!(detect(""), OsCategory::Unknown);
  }

  #[test]
  fn detection_ignores_case() {
    assert_eq!(detect("WINDOWS NT 10.0"), OsCategory::Windows);
    assert_eq!(detect("MACINTOSH"), OsCategory::Macos);
  }

  #[test]
  fn detects_real_browser_strings() {
    let cases = [
      (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        OsCategory::Windows,
      ),
      ("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15)", OsCategory::Macos),
      (
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
        OsCategory::Linux,
      ),
      ("curl/8.4.0", OsCategory::Unknown),
    ];

    for (ua, expected) in cases {
      assert_eq!(detect(ua), expected, "{ua}");
    }
  }

  #[test]
  fn linux_signals_agree_regardless_of_position() {
    assert_eq!(detect("foo x11 bar linux baz"), OsCategory::Linux);
    assert_eq!(detect("foo linux bar x11 baz"), OsCategory::Linux);
  }

  #[test]
  fn priority_beats_specificity() {
    // An X11 client reporting a Windows host stays Windows.
    assert_eq!(detect("(X11; Windows NT 6.1)"), OsCategory::Windows);
    assert_eq!(detect("Linux; Macintosh"), OsCategory::Macos);
  }

  #[test]
  fn detect_always_lands_in_a_category() {
    for ua in ["", " ", "\u{1F600}", "win", "mac", "Linux", "a".repeat(4096).as_str()] {
      assert!(OsCategory::ALL.contains(&detect(ua)));
    }
  }

  #[test]
  fn parses_override_values() {
    assert_eq!("AUTO".parse::<SelectionMode>().unwrap(), SelectionMode::Auto);
    assert_eq!(
      "macOS".parse::<SelectionMode>().unwrap(),
      SelectionMode::Explicit(OsCategory::Macos)
    );
    assert!("beos".parse::<SelectionMode>().is_err());
    // Unknown is a detection outcome, not something a visitor can pick.
    let err = "unknown".parse::<SelectionMode>().unwrap_err();
    assert!(err.to_string().contains("expected auto, windows, macos or linux"));
    assert_eq!("unknown".parse::<OsCategory>().unwrap(), OsCategory::Unknown);
  }

  #[test]
  fn explicit_selection_overrides_detection() {
    assert_eq!(SelectionMode::Auto.effective(OsCategory::Linux), OsCategory::Linux);
    assert_eq!(
      SelectionMode::Explicit(OsCategory::Windows).effective(OsCategory::Linux),
      OsCategory::Windows
    );
  }

  #[test]
  fn serializes_as_labels() {
    assert_eq!(serde_json::to_string(&OsCategory::Macos).unwrap(), r#""macOS""#);
    assert_eq!(serde_json::to_string(&SelectionMode::Auto).unwrap(), r#""Auto""#);
    let os: OsCategory = serde_json::from_str(r#""linux""#).unwrap();
    assert_eq!(os, OsCategory::Linux);
  }
}
