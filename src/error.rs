use std::path::PathBuf;

use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `linklore`.
///
/// Each subsystem defines its own error variant. Per-link failures (dead
/// URLs, navigation timeouts) are *not* errors — they are recorded in the
/// link records themselves. Only input acquisition and store corruption
/// abort a run.
#[derive(Debug, Error)]
pub enum LoreError {
    // ── Input acquisition ────────────────────────────────────────────────
    #[error("input: {0}")]
    Input(#[from] InputError),

    // ── Link store ───────────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Generic fallthrough (wraps anyhow for interop) ───────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoreError {
    /// Process exit code for this error. Missing inputs exit with 2 (the
    /// same code clap uses for usage errors); everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(InputError::Missing(_)) => 2,
            _ => 1,
        }
    }
}

// ─── Input errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ─── Store errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read link store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("link store {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write link store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ─── Convenience re-exports ──────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, LoreError>;
