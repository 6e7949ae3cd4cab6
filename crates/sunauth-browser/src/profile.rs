use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A throwaway Chrome profile directory for one authentication attempt.
/// Every request gets its own profile so concurrent runs stay isolated;
/// the directory is removed when the profile is dropped.
pub struct ScratchProfile {
    path: PathBuf,
}

impl ScratchProfile {
    pub fn create() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("sunauth-profile-")
            .tempdir()
            .map_err(Error::Io)?;

        Ok(Self {
            path: temp_dir.keep(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_profile_creates_and_cleans_up() {
        let profile = ScratchProfile::create().unwrap();
        let path = profile.path().to_path_buf();

        assert!(path.exists());
        assert!(path.is_dir());

        drop(profile);

        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_profiles_are_distinct() {
        let a = ScratchProfile::create().unwrap();
        let b = ScratchProfile::create().unwrap();

        assert_ne!(a.path(), b.path());
    }
}
