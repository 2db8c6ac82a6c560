//! Assign flag values from a decoded TOML tree.
//!
//! A flag named `server.port` is looked up as `tree["server"]["port"]`; a
//! plain name is a top-level key. Every flag is visited even when some are
//! missing; the first problem is reported after the pass.

use toml::{Table, Value};

use crate::error::FlagfigError;
use crate::flag::FlagSet;

/// Look up a flag name in the tree. Each `.` descends one table level, so
/// `database.url` resolves to `tree["database"]["url"]`. `None` when any
/// level is missing or is not a table.
pub fn table_get<'a>(tree: &'a Table, flag_name: &str) -> Option<&'a Value> {
    let mut segments = flag_name.split('.');
    let top = tree.get(segments.next()?)?;
    segments.try_fold(top, |node, segment| node.as_table()?.get(segment))
}

/// The string form a flag receives for a TOML value.
pub fn value_to_flag_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Datetime(d) => d.to_string(),
        Value::Array(_) | Value::Table(_) => value.to_string(),
    }
}

/// Set every flag that has a value in `tree`.
///
/// Returns the first [`KeyNotFound`](FlagfigError::KeyNotFound) or
/// [`InvalidValue`](FlagfigError::InvalidValue) encountered. Flags after it
/// are still assigned.
pub fn assign_tree(flags: &mut FlagSet<'_>, tree: &Table) -> Result<(), FlagfigError> {
    let mut first_error = None;

    for flag in flags.iter_mut() {
        let outcome = match table_get(tree, flag.name()) {
            Some(value) => flag.set(&value_to_flag_string(value)),
            None => {
                tracing::debug!("no value for '{}' in config tree", flag.name());
                Err(FlagfigError::KeyNotFound(flag.name().to_string()))
            }
        };
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
