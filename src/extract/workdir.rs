//! Scoped-resource guards for the extraction working area
//!
//! Extraction mutates process-global state: it changes the working directory
//! and it shadows any `build/`/`dist/` directories the caller already had.
//! Both mutations are wrapped in RAII guards so the state is restored on
//! every exit path, including errors raised mid-extraction.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Changes the process working directory and restores the previous one on
/// drop. Restoration is unconditional; a failure to restore is logged, not
/// panicked on, since drop runs on unwind paths too.
pub struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> io::Result<Self> {
        let original = env::current_dir()?;
        env::set_current_dir(dir)?;
        debug!(dir = %dir.display(), "entered working directory");
        Ok(Self { original })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original) {
            warn!(
                original = %self.original.display(),
                error = %e,
                "failed to restore working directory"
            );
        } else {
            debug!(dir = %self.original.display(), "restored working directory");
        }
    }
}

/// Moves a pre-existing directory out of the way with a suffixed rename
/// (never a delete), and on drop removes whatever the extraction run put in
/// its place before renaming the original back.
pub struct DisplacedDir {
    path: PathBuf,
    displaced_to: Option<PathBuf>,
}

impl DisplacedDir {
    pub fn displace(path: &Path, suffix: &str) -> io::Result<Self> {
        let displaced_to = if path.is_dir() {
            let mut shadow = path.as_os_str().to_os_string();
            shadow.push(suffix);
            let shadow = PathBuf::from(shadow);
            fs::rename(path, &shadow)?;
            debug!(from = %path.display(), to = %shadow.display(), "displaced existing directory");
            Some(shadow)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            displaced_to,
        })
    }
}

impl Drop for DisplacedDir {
    fn drop(&mut self) {
        if self.path.is_dir() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to clean up directory");
            }
        }

        if let Some(shadow) = &self.displaced_to {
            if let Err(e) = fs::rename(shadow, &self.path) {
                warn!(
                    from = %shadow.display(),
                    to = %self.path.display(),
                    error = %e,
                    "failed to restore displaced directory"
                );
            } else {
                debug!(path = %self.path.display(), "restored displaced directory");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_cwd_guard_restores_on_drop() {
        let before = env::current_dir().unwrap();
        let temp = TempDir::new().unwrap();

        {
            let _guard = CwdGuard::enter(temp.path()).unwrap();
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                temp.path().canonicalize().unwrap()
            );
        }

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_cwd_guard_restores_on_panic() {
        let before = env::current_dir().unwrap();
        let temp = TempDir::new().unwrap();
        let temp_path = temp.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let _guard = CwdGuard::enter(&temp_path).unwrap();
            panic!("mid-extraction failure");
        });

        assert!(result.is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_displace_and_restore() {
        let temp = TempDir::new().unwrap();
        let dist = temp.path().join("dist");
        fs::create_dir(&dist).unwrap();
        fs::write(dist.join("precious.txt"), "caller state").unwrap();

        {
            let _guard = DisplacedDir::displace(&dist, "_abc123").unwrap();
            // Original is out of the way, not deleted.
            assert!(!dist.exists());
            assert!(temp.path().join("dist_abc123/precious.txt").is_file());

            // Simulate the build recreating dist with new content.
            fs::create_dir(&dist).unwrap();
            fs::write(dist.join("generated.whl"), "wheel").unwrap();
        }

        // Generated content gone, caller state back.
        assert!(dist.join("precious.txt").is_file());
        assert!(!dist.join("generated.whl").exists());
        assert!(!temp.path().join("dist_abc123").exists());
    }

    #[test]
    fn test_displace_absent_dir_is_noop() {
        let temp = TempDir::new().unwrap();
        let build = temp.path().join("build");

        {
            let _guard = DisplacedDir::displace(&build, "_abc123").unwrap();
            // Simulate the build creating it fresh.
            fs::create_dir(&build).unwrap();
        }

        // Created during the run, removed afterward, nothing restored.
        assert!(!build.exists());
    }
}
