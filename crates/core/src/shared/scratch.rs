use std::path::{Path, PathBuf};

/// RAII guard over a request-scoped file.
///
/// The file is deleted when the guard drops, so cleanup holds on every exit
/// path of the owning scope, including panics mid-pipeline. A file that is
/// already gone at drop time is not an error.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!(
                    "failed to clean up scratch file {}: {e}",
                    self.path.display()
                );
            } else {
                log::debug!("cleaned up scratch file {}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_drop_deletes_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scratch.wav");
        std::fs::write(&path, b"data").unwrap();

        {
            let _guard = ScratchFile::new(path.clone());
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("never_created.mp4");
        let guard = ScratchFile::new(path.clone());
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn test_deletes_even_when_scope_panics() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scratch.mp4");
        std::fs::write(&path, b"data").unwrap();

        let p = path.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = ScratchFile::new(p);
            panic!("stage failure");
        });
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_path_accessor() {
        let guard = ScratchFile::new(PathBuf::from("/tmp/x.wav"));
        assert_eq!(guard.path(), Path::new("/tmp/x.wav"));
    }
}
