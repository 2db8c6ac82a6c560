use std::fmt;
use std::path::PathBuf;

use crate::env::EnvSource;

/// The value kind of a registered flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Bool,
    Int,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagKind::String => write!(f, "string"),
            FlagKind::Bool => write!(f, "bool"),
            FlagKind::Int => write!(f, "int"),
        }
    }
}

/// A read-only snapshot of one registered flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagInfo {
    pub name: String,
    pub kind: FlagKind,
    /// The default after `$VARNAME` substitution.
    pub default: String,
    pub description: String,
    /// The current value in its string form.
    pub value: String,
}

/// Process-level facts the handle needs, resolved once at startup and passed
/// in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Target of `~/` expansion. `None` if no home directory could be found.
    pub home_dir: Option<PathBuf>,
    /// Source of `$VARNAME` defaults.
    pub env: EnvSource,
}

impl Context {
    /// Resolve the current user's home directory and use the live process
    /// environment.
    pub fn detect() -> Self {
        let home_dir = directories::UserDirs::new().map(|u| u.home_dir().to_path_buf());
        Self {
            home_dir,
            env: EnvSource::Process,
        }
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }
}
