//! Writing the current configuration back to disk.
//!
//! Uses `toml_edit` so that an existing file keeps its comments, formatting,
//! and any keys that are not flags. When no file exists yet, the document is
//! seeded from [`template`] so every option arrives with its description.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, Item, Key, Table, Value};

use crate::error::FlagfigError;
use crate::flag::{Flag, FlagSet};
use crate::tag;
use crate::types::FlagKind;

/// A TOML value of the flag's kind. Unparseable bool/int text falls back to
/// `false`/`0`, matching how defaults are bound.
fn typed_value(kind: FlagKind, raw: &str) -> Value {
    match kind {
        FlagKind::String => Value::from(raw),
        FlagKind::Bool => Value::from(tag::parse_bool(raw).unwrap_or(false)),
        FlagKind::Int => Value::from(tag::parse_int(raw).unwrap_or(0)),
    }
}

fn dotted_header(section: &str) -> String {
    section
        .split('.')
        .map(|s| Key::new(s).to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn write_entry(out: &mut String, flag: &Flag<'_>, leaf: &str) {
    for line in flag.description().trim().lines() {
        let _ = writeln!(out, "# {}", line.trim());
    }
    let _ = writeln!(
        out,
        "{} = {}",
        Key::new(leaf),
        typed_value(flag.kind(), flag.default())
    );
}

/// Render a commented TOML document holding every flag's default.
///
/// Plain names are written at the top level; a dotted name such as
/// `server.port` goes under a `[server]` section, sections in order of first
/// appearance.
pub fn template(prog_name: &str, flags: &FlagSet<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Configuration for {prog_name}");

    let mut sections: Vec<(&str, Vec<(&str, &Flag<'_>)>)> = Vec::new();
    for flag in flags.iter() {
        match flag.name().rsplit_once('.') {
            None => {
                out.push('\n');
                write_entry(&mut out, flag, flag.name());
            }
            Some((section, leaf)) => match sections.iter_mut().find(|(s, _)| *s == section) {
                Some((_, entries)) => entries.push((leaf, flag)),
                None => sections.push((section, vec![(leaf, flag)])),
            },
        }
    }

    for (section, entries) in sections {
        let _ = writeln!(out, "\n[{}]", dotted_header(section));
        for (i, (leaf, flag)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            write_entry(&mut out, flag, leaf);
        }
    }
    out
}

/// Set `dotted_key` in `doc`, creating intermediate tables as needed.
fn set_in_document(doc: &mut DocumentMut, dotted_key: &str, value: Value) -> Result<(), FlagfigError> {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let (leaf, path) = segments
        .split_last()
        .ok_or_else(|| FlagfigError::KeyNotFound(dotted_key.into()))?;

    let mut current: &mut Item = doc.as_item_mut();
    for segment in path {
        match current.get(segment).map(Item::is_table_like) {
            None => current[segment] = Item::Table(Table::new()),
            Some(false) => {
                return Err(FlagfigError::InvalidValue {
                    key: dotted_key.into(),
                    reason: format!("'{segment}' is not a table"),
                });
            }
            Some(true) => {}
        }
        current = &mut current[segment];
    }

    current[leaf] = toml_edit::value(value);
    Ok(())
}

/// Patch a TOML document with the current value of every flag.
///
/// `content` is the existing file, or `None` to start from [`template`].
pub fn render_config(
    prog_name: &str,
    flags: &FlagSet<'_>,
    content: Option<&str>,
    path: &Path,
) -> Result<String, FlagfigError> {
    let base = match content {
        Some(c) => c.to_string(),
        None => template(prog_name, flags),
    };
    let mut doc: DocumentMut = base.parse().map_err(|e| FlagfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    for flag in flags.iter() {
        set_in_document(&mut doc, flag.name(), typed_value(flag.kind(), &flag.value()))?;
    }
    Ok(doc.to_string())
}

/// Write the current configuration to `path`, creating parent directories.
pub fn write_config(
    prog_name: &str,
    flags: &FlagSet<'_>,
    path: &Path,
) -> Result<PathBuf, FlagfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(FlagfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let new_content = render_config(prog_name, flags, content.as_deref(), path)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| FlagfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, &new_content).map_err(|e| FlagfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("wrote configuration to {}", path.display());

    Ok(path.to_path_buf())
}
