//! Copy resource: keeps a live file or directory content-identical to its
//! stored counterpart.
use std::path::PathBuf;

use anyhow::Result;

use super::error::ResourceError;
use super::helpers::fs;
use super::{Resource, ResourceState};

/// A stored → live copy that can be checked and applied.
///
/// Directories are replaced wholesale so stale files in the live tree do not
/// survive a restore.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// The stored copy inside the configuration set.
    pub source: PathBuf,
    /// The live location on the system.
    pub target: PathBuf,
    /// Whether the item is a directory tree.
    pub is_dir: bool,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, is_dir: bool) -> Self {
        Self {
            source,
            target,
            is_dir,
        }
    }

    fn source_present(&self) -> bool {
        if self.is_dir {
            self.source.is_dir()
        } else {
            self.source.is_file()
        }
    }
}

impl Resource for CopyResource {
    fn description(&self) -> String {
        format!("{} <- {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.source_present() {
            return Ok(ResourceState::Invalid {
                reason: format!("not in configuration set: {}", self.source.display()),
            });
        }

        if self.target.symlink_metadata().is_err() {
            return Ok(ResourceState::Missing);
        }

        let identical = if self.is_dir {
            self.target.is_dir() && fs::dirs_identical(&self.source, &self.target)?
        } else {
            self.target.is_file() && fs::files_identical(&self.source, &self.target)?
        };

        if identical {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<()> {
        if !self.source_present() {
            return Err(ResourceError::SourceMissing {
                path: self.source.clone(),
            }
            .into());
        }
        if self.is_dir {
            fs::replace_dir(&self.source, &self.target, false)?;
        } else {
            fs::replace_file(&self.source, &self.target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn file_resource(dir: &tempfile::TempDir) -> CopyResource {
        CopyResource::new(dir.path().join("stored"), dir.path().join("live"), false)
    }

    fn dir_resource(dir: &tempfile::TempDir) -> CopyResource {
        CopyResource::new(dir.path().join("stored"), dir.path().join("live"), true)
    }

    // ------------------------------------------------------------------
    // current_state
    // ------------------------------------------------------------------

    #[test]
    fn invalid_when_stored_copy_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = file_resource(&dir).current_state().unwrap();
        assert!(matches!(state, ResourceState::Invalid { .. }));
    }

    #[test]
    fn invalid_when_stored_kind_mismatches() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("stored"), "x").unwrap();
        let state = dir_resource(&dir).current_state().unwrap();
        assert!(matches!(state, ResourceState::Invalid { .. }));
    }

    #[test]
    fn missing_when_live_absent() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("stored"), "x").unwrap();
        assert_eq!(
            file_resource(&dir).current_state().unwrap(),
            ResourceState::Missing
        );
    }

    #[test]
    fn incorrect_when_content_differs() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("stored"), "new").unwrap();
        stdfs::write(dir.path().join("live"), "old").unwrap();
        assert!(matches!(
            file_resource(&dir).current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn correct_when_identical() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("stored"), "same").unwrap();
        stdfs::write(dir.path().join("live"), "same").unwrap();
        assert_eq!(
            file_resource(&dir).current_state().unwrap(),
            ResourceState::Correct
        );
    }

    #[test]
    fn directory_with_extra_live_file_is_incorrect() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("stored")).unwrap();
        stdfs::write(dir.path().join("stored/init.lua"), "-- cfg").unwrap();
        stdfs::create_dir_all(dir.path().join("live")).unwrap();
        stdfs::write(dir.path().join("live/init.lua"), "-- cfg").unwrap();
        stdfs::write(dir.path().join("live/stale.lua"), "-- old").unwrap();
        assert!(matches!(
            dir_resource(&dir).current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    // ------------------------------------------------------------------
    // apply
    // ------------------------------------------------------------------

    #[test]
    fn apply_file_creates_parents_and_copies() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("stored"), "Host *\n").unwrap();
        let resource = CopyResource::new(
            dir.path().join("stored"),
            dir.path().join(".ssh/config"),
            false,
        );
        resource.apply().unwrap();
        assert_eq!(
            stdfs::read_to_string(dir.path().join(".ssh/config")).unwrap(),
            "Host *\n"
        );
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn apply_directory_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("stored/lua")).unwrap();
        stdfs::write(dir.path().join("stored/init.lua"), "require('x')").unwrap();
        stdfs::write(dir.path().join("stored/lua/x.lua"), "return {}").unwrap();
        stdfs::create_dir_all(dir.path().join("live")).unwrap();
        stdfs::write(dir.path().join("live/stale.lua"), "-- old").unwrap();

        let resource = dir_resource(&dir);
        resource.apply().unwrap();

        assert!(!dir.path().join("live/stale.lua").exists());
        assert!(dir.path().join("live/lua/x.lua").exists());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn apply_without_stored_copy_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_resource(&dir).apply().unwrap_err();
        assert!(err.downcast_ref::<ResourceError>().is_some());
    }
}
