//! Workspace containment for tool execution.
//!
//! Every filesystem- and process-touching tool resolves its paths through
//! [`WorkspaceRoot`]; there is no other code path to the filesystem.

mod root;

pub use root::{SandboxError, WorkspaceRoot};
