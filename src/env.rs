use std::collections::HashMap;

/// Where `$VARNAME` defaults are looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvSource {
    /// The live process environment, read when a flag is bound.
    #[default]
    Process,
    /// A fixed set of variables. Lets tests pass synthetic data instead of
    /// touching the process environment.
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    /// Build a fixed source from `(name, value)` pairs.
    pub fn fixed<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        EnvSource::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look a variable up. Unset and non-unicode variables are `None`.
    pub fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// Resolve a tag default. A default of the form `$VARNAME` is replaced by the
/// variable's value, or by the empty string when it is unset. Anything else
/// is returned unchanged.
pub fn resolve_default(raw: &str, env: &EnvSource) -> String {
    match raw.strip_prefix('$') {
        Some(var) => env.get(var).unwrap_or_default(),
        None => raw.to_string(),
    }
}
