//! Completeness check run after every source has been applied.
//!
//! Every bound option is mandatory unless it carries a non-empty default, so
//! a flag whose current value is the empty string is a configuration error.

use crate::error::FlagfigError;
use crate::flag::FlagSet;

/// Fail on the first flag (registration order) whose value is empty.
pub fn validate_non_empty(flags: &FlagSet<'_>) -> Result<(), FlagfigError> {
    match flags.iter().find(|f| f.value().is_empty()) {
        Some(flag) => Err(FlagfigError::EmptyValue(flag.name().to_string())),
        None => Ok(()),
    }
}
