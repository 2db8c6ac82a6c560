//! Bind typed program options to config files and command-line flags.
//!
//! Describe your options as a plain struct, tell flagfig how each field is
//! named and defaulted, point it at a few directories, and load:
//!
//! ```ignore
//! #[derive(Default)]
//! struct ServerOptions {
//!     host: String,
//!     port: i64,
//!     verbose: bool,
//! }
//!
//! impl Options for ServerOptions {
//!     fn bind<'a>(&'a mut self, b: &mut Binder<'a, '_>) {
//!         b.field("host", &mut self.host, ",localhost,address to bind")
//!             .field("port", &mut self.port, "server.port,8080,port to listen on")
//!             .field("verbose", &mut self.verbose, ",false,chatty output");
//!     }
//! }
//!
//! let mut opts = ServerOptions::default();
//! let mut cfg = Flagfig::new("myserver", &["server.toml"]);
//! cfg.add_search_path("~/.config/myserver");
//! cfg.add_search_path("/etc/myserver");
//! cfg.add_options(&mut opts)?;
//! cfg.load()?;
//! ```
//!
//! After `load`, `opts` holds the resolved values. Every flag writes straight
//! through to its field; there is no intermediate map to copy out of.
//!
//! # Tags
//!
//! Each field carries a tag of the form `name,default,description`:
//!
//! - **name**: the flag and config key. Empty means the lowercased field
//!   name; `-` leaves the field unbound. A dotted name such as `server.port`
//!   is read from the `port` key of the `[server]` table. `help` is taken
//!   by `--help`, and a name cannot also be the table of another flag.
//! - **default**: the initial value, or `$VARNAME` to read it from the
//!   environment when the options are added. `\,` puts a literal comma in
//!   the name or the default.
//! - **description**: the rest of the tag, shown in `--help` and in
//!   generated config files.
//!
//! Supported field types are `String`, `bool` and `i64` (see [`Bindable`]).
//!
//! # Layer precedence
//!
//! ```text
//! Tag defaults          "name,default,description"
//!        ↑ overridden by
//! Config file           first existing file, TOML
//!        ↑ overridden by
//! Command line          --name=value, --name value, --flag
//! ```
//!
//! Only one config file is read. Candidates are every search path combined
//! with every file name, path-major: for each directory in the order it was
//! added, `{prog_name}.conf` is tried first and then the extra names.
//!
//! After all layers are applied, every flag must hold a non-empty value. A
//! field with no default that no source fills in is reported as
//! [`FlagfigError::EmptyValue`].
//!
//! # Writing config files
//!
//! [`Flagfig::template`] renders a commented TOML document with every
//! default, and [`Flagfig::write_config`] writes the current values to a
//! file. Writing patches an existing file with `toml_edit`, so its comments
//! and unrelated keys survive.
//!
//! # Error handling
//!
//! All fallible operations return [`FlagfigError`]. A missing or malformed
//! config file is logged through `tracing` and loading carries on with the
//! remaining layers. Anything else, such as an unreadable file or a bad
//! command-line value, is returned to the caller.

pub mod error;
pub mod tag;
pub mod types;

mod assign;
mod binder;
mod builder;
mod cli;
mod env;
mod file;
mod flag;
mod persist;
mod validate;

#[cfg(test)]
mod fixtures;

pub use binder::{Binder, Options};
pub use builder::Flagfig;
pub use env::EnvSource;
pub use error::FlagfigError;
pub use flag::{Bindable, Destination};
pub use tag::{TagDescriptor, parse_tag};
pub use types::{Context, FlagInfo, FlagKind};
