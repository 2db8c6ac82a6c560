//! Declarative registration of option records.
//!
//! A record describes its options by implementing [`Options`] and handing
//! each field to a [`Binder`] together with its annotation tag:
//!
//! ```ignore
//! struct Opts {
//!     host: String,
//!     verbose: bool,
//!     port: i64,
//! }
//!
//! impl Options for Opts {
//!     fn bind<'a>(&'a mut self, b: &mut Binder<'a, '_>) {
//!         b.field("host", &mut self.host, "host,localhost,address to bind")
//!             .field("verbose", &mut self.verbose, ",false,chatty output")
//!             .field("port", &mut self.port, "server.port,8080,listen port");
//!     }
//! }
//! ```
//!
//! The tag grammar is described in [`tag`](crate::tag). An empty name falls
//! back to the lowercased field name, and the name `-` leaves the field
//! unbound.

use crate::cli;
use crate::env;
use crate::error::FlagfigError;
use crate::flag::{Bindable, Flag, FlagSet};
use crate::tag;
use crate::types::Context;

/// Tag name that opts a field out of binding.
pub const SKIP: &str = "-";

/// An option record that can register its fields as flags.
pub trait Options {
    fn bind<'a>(&'a mut self, binder: &mut Binder<'a, '_>);
}

/// Collects flags for one record. The first registration error is kept and
/// reported by [`Flagfig::add_options`](crate::Flagfig::add_options).
pub struct Binder<'a, 'b> {
    flags: &'b mut FlagSet<'a>,
    context: &'b Context,
    error: Option<FlagfigError>,
}

impl<'a, 'b> Binder<'a, 'b> {
    pub(crate) fn new(flags: &'b mut FlagSet<'a>, context: &'b Context) -> Self {
        Self {
            flags,
            context,
            error: None,
        }
    }

    /// Register `dest` as a flag described by `tag`.
    ///
    /// `field` is the field's declared name, used when the tag leaves the
    /// name empty. A rejected name leaves `dest` untouched.
    pub fn field<T: Bindable>(&mut self, field: &str, dest: &'a mut T, tag: &str) -> &mut Self {
        let parsed = tag::parse_tag(tag);
        let Some(name) = flag_name(&parsed.name, field) else {
            return self;
        };
        if let Err(e) = cli::check_flag_name(&name).and_then(|()| self.flags.check_name(&name)) {
            self.error.get_or_insert(e);
            return self;
        }

        let default = env::resolve_default(&parsed.default, &self.context.env);
        let flag = Flag::new(name, default, parsed.description, dest.destination());
        if let Err(e) = self.flags.insert(flag) {
            self.error.get_or_insert(e);
        }
        self
    }

    pub(crate) fn finish(self) -> Result<(), FlagfigError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Derive the flag name from the tag name and the field name. `None` means
/// the field is skipped.
pub fn flag_name(tag_name: &str, field: &str) -> Option<String> {
    match tag_name {
        SKIP => None,
        "" => Some(field.to_lowercase()),
        explicit => Some(explicit.to_string()),
    }
}
