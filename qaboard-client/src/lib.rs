//! REST/JSON client for the qaboard test-management backend
//!
//! The crate is organized around one shared [`ApiClient`] cloned into a set
//! of per-resource services ([`Services`]). Every service normalizes the two
//! success shapes the backend answers with - a bare JSON value, or a
//! `{status, message, result}` wrapper - through [`Envelope`], and classifies
//! every failure into the [`ApiError`] taxonomy. Nothing here retries
//! implicitly; callers that want hardening wrap calls in
//! [`retry::with_retry`].
//!
//! # Example
//!
//! ```no_run
//! use qaboard_client::{ApiClient, Services};
//!
//! # async fn example() -> Result<(), qaboard_client::ApiError> {
//! let client = ApiClient::new("http://localhost:5000")?;
//! let services = Services::new(client);
//!
//! let projects = services.projects.list().await?;
//! for project in &projects {
//!     println!("{} ({})", project.name, project.status);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod envelope;
mod error;
pub mod retry;
pub mod services;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::ApiError;
pub use services::{
    BugService, CodexService, DocumentService, ProjectService, ScenarioService, Services,
    TestCaseService, TestRunService, WorkflowService,
};
