//! Pipeline orchestration: the three operating modes over the same
//! parse → canonicalize → dedup → validate/enrich → persist flow.

pub mod enrich;
pub mod extract;
pub mod update;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InputError, Result};

/// The store is flushed to disk after every `CHECKPOINT_INTERVAL`
/// successfully processed items and once more at batch completion, so an
/// interrupted run loses at most one interval of work.
pub const CHECKPOINT_INTERVAL: usize = 10;

/// Read a transcript, mapping a missing file to the dedicated input error
/// (exit code 2).
pub(crate) fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InputError::Missing(path.to_path_buf()).into()
        } else {
            InputError::Read {
                path: path.to_path_buf(),
                source,
            }
            .into()
        }
    })
}

pub(crate) fn require_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(InputError::Missing(PathBuf::from(path)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoreError;

    #[test]
    fn missing_transcript_maps_to_input_error() {
        let err = read_input(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, LoreError::Input(InputError::Missing(_))));
        assert_eq!(err.exit_code(), 2);
    }
}
