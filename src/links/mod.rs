pub mod canonical;
pub mod extract;
pub mod store;
pub mod types;

pub use canonical::{canonicalize, domain_of};
pub use extract::{RawUrlMention, mentions_in, seed_title};
pub use store::{LinkStore, extract_new};
pub use types::{CanonicalLink, EnrichStatus, ValidationStatus};
