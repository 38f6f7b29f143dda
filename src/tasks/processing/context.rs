//! Shared execution context for tasks.
use std::sync::Arc;

use crate::config::Layout;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::package::locate_brew;

/// Shared context for task execution.
pub struct Context {
    /// Repository root and home directory.
    pub layout: Arc<Layout>,
    /// Detected platform information.
    pub platform: Platform,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Create a new context for task execution.
    #[must_use]
    pub fn new(
        layout: Layout,
        platform: Platform,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        dry_run: bool,
    ) -> Self {
        Self {
            layout: Arc::new(layout),
            platform,
            log,
            executor,
            dry_run,
        }
    }

    /// Program used to invoke Homebrew, if it is installed.
    ///
    /// Looked up on every call so tasks that run after Homebrew is
    /// installed see the new binary.
    #[must_use]
    pub fn brew(&self) -> Option<String> {
        locate_brew(&*self.executor)
    }
}
