use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
  /// Minimum level written to stdio.
  #[serde(default)]
  pub level: LogLevel,

  /// Log format on stdio.
  #[serde(default)]
  pub stdio: StdioLogMode,

  /// Pretty (multi-line) standard logs.
  #[serde(default)]
  pub pretty: bool,

  /// Include the emitting module in standard logs.
  #[serde(default)]
  pub location: bool,

  /// ANSI color in standard logs.
  #[serde(default = "default_ansi")]
  pub ansi: bool,
}

fn default_ansi() -> bool {
  true
}

impl Default for LogConfig {
  fn default() -> LogConfig {
    LogConfig {
      level: Default::default(),
      stdio: Default::default(),
      pretty: false,
      location: false,
      ansi: true,
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
  Error,
  Warn,
  #[default]
  Info,
  Debug,
  Trace,
}

impl From<LogLevel> for tracing::Level {
  fn from(value: LogLevel) -> Self {
    match value {
      LogLevel::Error => tracing::Level::ERROR,
      LogLevel::Warn => tracing::Level::WARN,
      LogLevel::Info => tracing::Level::INFO,
      LogLevel::Debug => tracing::Level::DEBUG,
      LogLevel::Trace => tracing::Level::TRACE,
    }
  }
}

impl From<tracing::Level> for LogLevel {
  fn from(value: tracing::Level) -> Self {
    match value {
      tracing::Level::ERROR => LogLevel::Error,
      tracing::Level::WARN => LogLevel::Warn,
      tracing::Level::INFO => LogLevel::Info,
      tracing::Level::DEBUG => LogLevel::Debug,
      tracing::Level::TRACE => LogLevel::Trace,
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StdioLogMode {
  #[default]
  Standard,
  Json,
  None,
}
