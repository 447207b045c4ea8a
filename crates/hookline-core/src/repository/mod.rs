//! Repository trait definitions ("ports") implemented by hookline-infra.

pub mod execution;
pub mod webhook;
pub mod workspace;

pub use execution::ExecutionLog;
pub use webhook::WebhookRepository;
pub use workspace::WorkspaceRepository;
