pub mod batch;
pub mod casing;
pub mod error;
pub mod fund;
pub mod normalizer;
pub mod relocation;
pub mod rules;
pub mod tables;

pub use error::{ConfigError, RuleError};
pub use normalizer::{FundContext, NameCleaner};
pub use tables::{ManagerOverride, RuleTables};

// Module-level constants
pub const TARGET_NAMES: &str = "name_clean";
