use std::path::{Component, Path, PathBuf};

/// Error raised when a requested path cannot be granted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SandboxError {
    /// The request resolves outside the permitted working directory.
    #[error("cannot access \"{0}\" as it is outside the permitted working directory")]
    OutsideRoot(String),

    /// The working directory itself is unusable.
    #[error("working directory is not usable: {0}")]
    BadRoot(String),
}

/// The single absolute directory that bounds all tool operations.
///
/// Fixed for the lifetime of a run and never derived from model input.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    root: PathBuf,
}

impl WorkspaceRoot {
    /// Resolve `root` to its canonical absolute form, once per run.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let requested = root.as_ref();
        let root = requested
            .canonicalize()
            .map_err(|err| SandboxError::BadRoot(format!("{}: {err}", requested.display())))?;
        Ok(Self { root })
    }

    pub fn as_path(&self) -> &Path {
        &self.root
    }

    /// Resolve an untrusted request against the root.
    ///
    /// The candidate is joined onto the root and normalized lexically
    /// (collapsing `.` and `..` without touching the filesystem), then
    /// checked for containment component-wise. Targets that already exist
    /// are additionally canonicalized and re-checked, so a symlink
    /// pointing outside the root is rejected too. Absolute candidates go
    /// through the same resolve-then-compare path; there is no separate
    /// "looks absolute" case.
    pub fn resolve(&self, request: &str) -> Result<PathBuf, SandboxError> {
        let normalized = normalize(&self.root.join(request));
        if !normalized.starts_with(&self.root) {
            return Err(SandboxError::OutsideRoot(request.to_string()));
        }
        if let Ok(canonical) = normalized.canonicalize() {
            if !canonical.starts_with(&self.root) {
                return Err(SandboxError::OutsideRoot(request.to_string()));
            }
            return Ok(canonical);
        }
        Ok(normalized)
    }
}

/// Collapse `.` and `..` segments without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // popping the filesystem root is a no-op, which leaves
                // over-deep `..` chains pinned at `/`
                out.pop();
            }
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
        }
    }
    out
}
