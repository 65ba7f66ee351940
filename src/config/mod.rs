//! Configuration module
//!
//! Loads the JSON run configuration, computes its integrity hash, and
//! performs one-time syntactic validation at the boundary so the crawler
//! only ever sees a well-formed, typed [`Config`].

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, ExpectedPage, Validations};
pub use validation::validate;
