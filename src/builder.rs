use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::assign;
use crate::binder::{Binder, Options};
use crate::cli;
use crate::error::FlagfigError;
use crate::file;
use crate::flag::FlagSet;
use crate::persist;
use crate::types::{Context, FlagInfo};
use crate::validate;

/// A configuration handle: the flag registry plus where to look for files.
///
/// `'a` is the lifetime of the option records passed to
/// [`add_options`](Self::add_options). Every flag writes through to its
/// field, so once the handle is done with, the records hold the resolved
/// values.
///
/// Layers, lowest to highest priority:
///
/// ```text
/// Tag defaults          "name,default,description"
///        ↑ overridden by
/// Config file           first match over search paths × file names
///        ↑ overridden by
/// Command line          --name=value
/// ```
pub struct Flagfig<'a> {
    context: Context,
    prog_name: String,
    flags: FlagSet<'a>,
    search_paths: Vec<PathBuf>,
    file_names: Vec<String>,
    args: Vec<String>,
}

impl<'a> Flagfig<'a> {
    /// Create a handle for `prog_name`, resolving the home directory from the
    /// running process.
    ///
    /// Candidate file names are `{prog_name}.conf` followed by `extra_file_names`.
    pub fn new(prog_name: &str, extra_file_names: &[&str]) -> Self {
        Self::with_context(Context::detect(), prog_name, extra_file_names)
    }

    /// Like [`new`](Self::new) with an explicit [`Context`].
    pub fn with_context(context: Context, prog_name: &str, extra_file_names: &[&str]) -> Self {
        Self {
            context,
            prog_name: prog_name.to_string(),
            flags: FlagSet::new(),
            search_paths: Vec::new(),
            file_names: file::file_names(prog_name, extra_file_names),
            args: Vec::new(),
        }
    }

    pub fn prog_name(&self) -> &str {
        &self.prog_name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Register every option of `options` as a flag.
    ///
    /// Defaults are written into the record immediately. Fails on the first
    /// name that is taken, reserved (`help`), unusable as a long option, or
    /// a table of another flag. Every other option is still registered; the
    /// rejected field keeps its value.
    pub fn add_options<O: Options + ?Sized>(&mut self, options: &'a mut O) -> Result<(), FlagfigError> {
        let mut binder = Binder::new(&mut self.flags, &self.context);
        options.bind(&mut binder);
        binder.finish()
    }

    /// Append a search directory, expanding a leading `~/`.
    ///
    /// The directory does not need to exist. Returns `false` (and appends
    /// nothing) only when `~/` cannot be expanded because no home directory
    /// is known.
    pub fn add_search_path(&mut self, path: impl AsRef<Path>) -> bool {
        match file::expand_home(path.as_ref(), self.context.home_dir.as_deref()) {
            Some(dir) => {
                self.search_paths.push(dir);
                true
            }
            None => false,
        }
    }

    /// Append a search directory only if it exists as a directory after `~/`
    /// expansion. Returns whether it was appended.
    pub fn add_existing_search_path(&mut self, path: impl AsRef<Path>) -> bool {
        match file::expand_home(path.as_ref(), self.context.home_dir.as_deref()) {
            Some(dir) if dir.is_dir() => {
                self.search_paths.push(dir);
                true
            }
            _ => false,
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    /// Every candidate config file, path-major.
    pub fn conf_file_list(&self) -> Vec<PathBuf> {
        file::conf_file_list(&self.search_paths, &self.file_names)
    }

    /// Resolve every layer using the process command line.
    pub fn load(&mut self) -> Result<(), FlagfigError> {
        self.load_with_args(std::env::args_os().skip(1))
    }

    /// Resolve every layer: config file, then `args` (without the program
    /// name), then check that no flag is left empty.
    ///
    /// A missing config file is not an error; defaults and the command line
    /// still apply.
    pub fn load_with_args<I, T>(&mut self, args: I) -> Result<(), FlagfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.load_file()?;
        self.parse_args(args)?;
        self.validate()
    }

    /// Apply values from a TOML buffer, skipping file discovery, then check
    /// that no flag is left empty.
    ///
    /// An empty flag is reported first. Otherwise the first key missing from
    /// the buffer (or value of the wrong type) is returned; every value that
    /// was found has been applied regardless.
    pub fn load_from_buffer(&mut self, bytes: &[u8]) -> Result<(), FlagfigError> {
        let tree = file::decode_bytes(bytes, "buffer")?;
        let assigned = assign::assign_tree(&mut self.flags, &tree);
        self.validate()?;
        assigned
    }

    /// Parse command-line arguments (without the program name) and apply them
    /// on top of the current values.
    pub fn parse_args<I, T>(&mut self, args: I) -> Result<(), FlagfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.args = cli::parse_args(&self.prog_name, &mut self.flags, args)?;
        Ok(())
    }

    /// Fail if any flag's current value is empty.
    pub fn validate(&self) -> Result<(), FlagfigError> {
        validate::validate_non_empty(&self.flags)
    }

    fn load_file(&mut self) -> Result<(), FlagfigError> {
        let candidates = self.conf_file_list();
        let Some(path) = file::find_config_file(&candidates) else {
            tracing::warn!(
                "no config file found for {} (searched {} candidates)",
                self.prog_name,
                candidates.len()
            );
            return Ok(());
        };

        let Some(content) = file::read_config_file(path)? else {
            tracing::warn!("config file {} disappeared before reading", path.display());
            return Ok(());
        };
        tracing::debug!("loading config from {}", path.display());

        let tree = file::decode_tree(&content, &path.display().to_string());
        if let Err(e) = assign::assign_tree(&mut self.flags, &tree) {
            tracing::debug!("config file {} left flags unset: {e}", path.display());
        }
        Ok(())
    }

    /// A snapshot of one flag.
    pub fn lookup(&self, name: &str) -> Option<FlagInfo> {
        self.flags.get(name).map(|f| f.info())
    }

    /// Snapshots of every flag, in registration order.
    pub fn flags(&self) -> Vec<FlagInfo> {
        self.flags.iter().map(|f| f.info()).collect()
    }

    /// `(name, current value)` for every flag.
    pub fn values(&self) -> Vec<(String, String)> {
        self.flags
            .iter()
            .map(|f| (f.name().to_string(), f.value()))
            .collect()
    }

    /// Positional arguments left after command-line parsing.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Usage text listing every flag and its description.
    pub fn render_help(&self) -> String {
        cli::render_help(&self.prog_name, &self.flags)
    }

    /// A commented TOML document with every flag's default.
    pub fn template(&self) -> String {
        persist::template(&self.prog_name, &self.flags)
    }

    /// Write the current values to `path`, keeping the comments and unrelated
    /// keys of an existing file.
    pub fn write_config(&self, path: impl AsRef<Path>) -> Result<PathBuf, FlagfigError> {
        persist::write_config(&self.prog_name, &self.flags, path.as_ref())
    }
}
