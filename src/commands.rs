use crate::os::OsCategory;

pub const ARCH_TOKEN: &str = "{{ARCH}}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandTemplate {
  pub description: Option<&'static str>,
  pub command: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedCommand {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub command: String,
}

const fn step(description: &'static str, command: &'static str) -> CommandTemplate {
  CommandTemplate {
    description: Some(description),
    command,
  }
}

const WINDOWS: &[CommandTemplate] = &[
  step("Check processor architecture", "wmic cpu get architecture"),
  step(
    "Download CLI (replace placeholders)",
    "Start-Process \"https://prime.tmdata.io/plutus/api/v1/files/download?name=dataos-ctl-windows-{{ARCH}}.tar.gz&dir=cli-apps-{{CLI_VERSION}}&apikey={{PRIME_APIKEY}}\"",
  ),
];

const LINUX: &[CommandTemplate] = &[
  step("Set API key", "export PRIME_APIKEY=\"{{prime_apikey}}\""),
  step("Check processor architecture", "uname -p"),
  step(
    "Download CLI binary",
    "curl --silent --output dataos-ctl-linux-{{ARCH}}.tar.gz \\\n--location --request GET \\\n\"https://prime.tmdata.io/plutus/api/v1/files/download?name=dataos-ctl-linux-{{ARCH}}.tar.gz&dir=cli-apps-2.26&apikey=$PRIME_APIKEY\"",
  ),
  step("Extract the archive", "tar -xvf dataos-ctl-linux-{{ARCH}}.tar.gz"),
  step("Add binary to PATH", "export PATH=$PATH:$HOME/linux-{{ARCH}}"),
  step(
    "Persist PATH (Bash example)",
    "echo 'export PATH=$PATH:$HOME/.dataos/bin' >> ~/.bash_profile\nsource ~/.bash_profile",
  ),
];

const MACOS: &[CommandTemplate] = &[
  step("Set API key", "export PRIME_APIKEY=\"{{prime_apikey}}\""),
  step(
    "Download CLI binary",
    "curl --silent --output dataos-ctl-{{ARCH}}.tar.gz \\\n--location --request GET \\\n\"https://prime.tmdata.io/plutus/api/v1/files/download?name=dataos-ctl-{{ARCH}}.tar.gz&dir=cli-apps-2.26&apikey=$PRIME_APIKEY\"",
  ),
  step("Extract the archive", "tar -xvf dataos-ctl-{{ARCH}}.tar.gz"),
  step("Add binary to PATH", "export PATH=$PATH:$HOME/{{dir-name}}"),
  step(
    "Persist PATH (Zsh example)",
    "echo 'export PATH=$PATH:$HOME/.dataos/bin' >> ~/.zshrc\nsource ~/.zshrc",
  ),
];

/// Ordered install steps for a category. Later steps assume earlier ones ran.
pub const fn templates(os: OsCategory) -> &'static [CommandTemplate] {
  match os {
    OsCategory::Windows => WINDOWS,
    OsCategory::Macos => MACOS,
    OsCategory::Linux => LINUX,
    OsCategory::Unknown => &[],
  }
}

pub const fn arch_literal(os: OsCategory) -> Option<&'static str> {
  match os {
    OsCategory::Windows | OsCategory::Linux => Some("amd64"),
    OsCategory::Macos => Some("darwin-amd64"),
    OsCategory::Unknown => None,
  }
}

impl CommandTemplate {
  /// Replaces every `{{ARCH}}` token. Other placeholders are left for the user.
  pub fn resolve(&self, arch: &str) -> ResolvedCommand {
    ResolvedCommand {
      description: self.description.map(str::to_owned),
      command: self.command.replace(ARCH_TOKEN, arch),
    }
  }
}

pub fn resolve(os: OsCategory) -> Vec<ResolvedCommand> {
  let Some(arch) = arch_literal(os) else {
    return Vec::new();
  };

  templates(os).iter().map(|t| t.resolve(arch)).collect()
}
