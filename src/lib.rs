//! Identity directory synchronization library for Rust.
//!
//! Provides classified, consistently reported failures for the three remote
//! services a directory sync talks to, plus a typed adapter over the Identity
//! Store directory.
//!
//! # Core Components
//!
//! - [`classifier`] - Maps HTTP statuses, Workspace API errors and Identity
//!   Store SDK errors to a [`StructuredError`] with remediation suggestions
//! - [`LoggingPolicy`] - Decides what is logged for each classified failure
//! - [`DirectoryAdapter`] / [`DryRunAdapter`] - Identity Store reads and writes,
//!   live or previewed
//! - [`WorkspaceSource`] / [`ScimProvisioner`] - Classified access to the
//!   upstream directory and the SCIM endpoint
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use directory_sync::directory::{DirectoryAdapter, DirectoryReader, InMemoryIdentityStore};
//! use directory_sync::logging::{self, LoggingConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! logging::set_config(LoggingConfig::from_env()?);
//!
//! let adapter = DirectoryAdapter::new(InMemoryIdentityStore::new("d-1234"), "d-1234");
//! for group in adapter.list_groups().await? {
//!     println!("{} {}", group.id, group.display_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod scim;
pub mod workspace;

// Re-export commonly used types for convenience
pub use classifier::{classify_api_error, classify_http_status, classify_sdk_error};
pub use config::{ConfigError, ConfigResult};
pub use directory::{
    DirectoryAdapter, DirectoryReader, DirectoryWriter, DryRunAdapter, IdentityStoreClient,
    MemberId,
};
pub use error::{
    Cause, ContractViolation, DirectoryError, DirectoryResult, ErrorKind, ErrorReport, Service,
    StructuredError,
};
pub use logging::{LoggingConfig, LoggingPolicy};
pub use scim::{HttpFailure, ScimClient, ScimProvisioner};
pub use workspace::{WorkspaceClient, WorkspaceSource};
