//! Diagnostic logging policy for classified failures.
//!
//! [`LoggingPolicy`] owns a [`LoggingConfig`] behind a reader/writer lock and
//! decides what gets written when a failure is classified. Adapters receive
//! the policy by injection (`Arc<LoggingPolicy>`); code that has nothing to
//! inject uses the process-wide instance from [`LoggingPolicy::shared`].
//!
//! The configuration is only ever replaced as a whole and only ever handed
//! out as a copy, so a reader never observes a half-updated record.
//!
//! Output goes through the `log` facade; the embedding binary chooses the
//! backend.
//!
//! ```rust
//! use directory_sync::logging::{LoggingConfig, LoggingPolicy};
//!
//! let policy = LoggingPolicy::new(LoggingConfig::default());
//! policy.set_config(LoggingConfig {
//!     log_suggestions: true,
//!     ..policy.config()
//! });
//! assert!(policy.config().log_suggestions);
//! ```

use crate::classifier::{classify_api_error, classify_http_status, classify_sdk_error};
use crate::error::{Cause, DirectoryError, StructuredError};
use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Minimum configured level at which classified failures are reported.
pub const REPORTING_THRESHOLD: LevelFilter = LevelFilter::Error;

/// Verbosity and suggestion visibility for failure diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit the numbered remediation list after each failure entry.
    pub log_suggestions: bool,
    /// Configured verbosity; failures are reported unless this is `Off`.
    pub log_level: LevelFilter,
}

impl LoggingConfig {
    /// Default applied at process start.
    pub const DEFAULT: LoggingConfig = LoggingConfig {
        log_suggestions: false,
        log_level: LevelFilter::Error,
    };

    /// Default as described in the user documentation, which shows
    /// suggestions out of the box.
    pub const SUGGESTIONS_ENABLED: LoggingConfig = LoggingConfig {
        log_suggestions: true,
        log_level: LevelFilter::Error,
    };
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single line the policy writes for a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLine {
    pub level: Level,
    pub text: String,
}

static SHARED: LazyLock<Arc<LoggingPolicy>> =
    LazyLock::new(|| Arc::new(LoggingPolicy::new(LoggingConfig::DEFAULT)));

/// Lock-guarded logging configuration plus the classify-and-log helpers.
#[derive(Debug)]
pub struct LoggingPolicy {
    config: RwLock<LoggingConfig>,
}

impl LoggingPolicy {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// The process-wide policy.
    pub fn shared() -> Arc<LoggingPolicy> {
        Arc::clone(&SHARED)
    }

    /// Replace the whole configuration.
    pub fn set_config(&self, config: LoggingConfig) {
        // The record is always written whole, so a poisoned lock still holds a
        // consistent value.
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *guard = config;
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> LoggingConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lines that [`log_and_describe`](Self::log_and_describe) would emit for
    /// `error` under the current configuration.
    pub fn diagnostic_lines(&self, error: &StructuredError) -> Vec<DiagnosticLine> {
        diagnostic_lines(&self.config(), error)
    }

    /// Report a classified failure according to the current configuration.
    pub fn log_and_describe(&self, error: &StructuredError) {
        for line in self.diagnostic_lines(error) {
            log::log!(line.level, "{}", line.text);
        }
    }

    /// Whether classified failures are written under the current configuration.
    pub fn reports_failures(&self) -> bool {
        self.config().log_level >= REPORTING_THRESHOLD
    }

    /// Report a request rejected locally before any remote call.
    pub fn report_contract_violation(&self, operation: &str, error: &DirectoryError) {
        if self.reports_failures() {
            log::error!("{} rejected: {}", operation, error);
        }
    }

    /// Classify a SCIM failure by HTTP status, report it and return it.
    pub fn handle_http_error(
        &self,
        operation: &str,
        status_code: u16,
        cause: Option<Cause>,
    ) -> StructuredError {
        let error = classify_http_status(operation, status_code, cause);
        self.log_and_describe(&error);
        error
    }

    /// Classify a Workspace directory failure, report it and return it.
    pub fn handle_api_error(&self, operation: &str, cause: Option<Cause>) -> StructuredError {
        let error = classify_api_error(operation, cause);
        self.log_and_describe(&error);
        error
    }

    /// Classify an Identity Store failure, report it and return it.
    pub fn handle_sdk_error(&self, operation: &str, cause: Option<Cause>) -> StructuredError {
        let error = classify_sdk_error(operation, cause);
        self.log_and_describe(&error);
        error
    }
}

impl Default for LoggingPolicy {
    fn default() -> Self {
        Self::new(LoggingConfig::DEFAULT)
    }
}

/// Compute the report for `error` under `config` without emitting it.
pub fn diagnostic_lines(config: &LoggingConfig, error: &StructuredError) -> Vec<DiagnosticLine> {
    if config.log_level < REPORTING_THRESHOLD {
        return Vec::new();
    }

    let cause = error
        .original_cause()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| "none".to_string());
    let mut lines = vec![DiagnosticLine {
        level: Level::Error,
        text: format!(
            "{} (service={}, operation={}, status={}, cause={})",
            error.summary(),
            error.service(),
            error.operation(),
            error.status_code(),
            cause
        ),
    }];

    if config.log_suggestions {
        lines.extend(
            error
                .suggestions()
                .iter()
                .enumerate()
                .map(|(index, suggestion)| DiagnosticLine {
                    level: Level::Info,
                    text: format!("  {}. {}", index + 1, suggestion),
                }),
        );
    }

    lines
}

/// Replace the process-wide configuration.
pub fn set_config(config: LoggingConfig) {
    SHARED.set_config(config);
}

/// A copy of the process-wide configuration.
pub fn config() -> LoggingConfig {
    SHARED.config()
}
