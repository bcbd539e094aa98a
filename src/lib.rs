#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod cli;
pub mod enrich;
pub mod error;
pub mod links;
pub mod pipeline;
pub mod transcript;
pub mod validate;

pub use cli::{Cli, Commands};
pub use error::{LoreError, Result};
pub use links::{CanonicalLink, LinkStore};
