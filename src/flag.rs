//! The flag registry: named, typed values that write through to the caller's
//! option record.

use crate::error::FlagfigError;
use crate::tag;
use crate::types::{FlagInfo, FlagKind};

/// A mutable reference into the caller's record.
#[derive(Debug)]
pub enum Destination<'a> {
    String(&'a mut String),
    Bool(&'a mut bool),
    Int(&'a mut i64),
}

impl Destination<'_> {
    pub fn kind(&self) -> FlagKind {
        match self {
            Destination::String(_) => FlagKind::String,
            Destination::Bool(_) => FlagKind::Bool,
            Destination::Int(_) => FlagKind::Int,
        }
    }
}

/// Field types that can back a flag.
pub trait Bindable {
    fn destination(&mut self) -> Destination<'_>;
}

impl Bindable for String {
    fn destination(&mut self) -> Destination<'_> {
        Destination::String(self)
    }
}

impl Bindable for bool {
    fn destination(&mut self) -> Destination<'_> {
        Destination::Bool(self)
    }
}

impl Bindable for i64 {
    fn destination(&mut self) -> Destination<'_> {
        Destination::Int(self)
    }
}

#[derive(Debug)]
pub struct Flag<'a> {
    name: String,
    default: String,
    description: String,
    dest: Destination<'a>,
}

impl<'a> Flag<'a> {
    /// Create a flag and store its default in the destination.
    ///
    /// Bool and int defaults that do not parse fall back to `false` and `0`.
    pub fn new(name: String, default: String, description: String, dest: Destination<'a>) -> Self {
        let mut flag = Flag {
            name,
            default,
            description,
            dest,
        };
        match &mut flag.dest {
            Destination::String(s) => **s = flag.default.clone(),
            Destination::Bool(b) => **b = tag::parse_bool(&flag.default).unwrap_or(false),
            Destination::Int(i) => **i = tag::parse_int(&flag.default).unwrap_or(0),
        }
        flag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FlagKind {
        self.dest.kind()
    }

    /// The default after `$VARNAME` substitution.
    pub fn default(&self) -> &str {
        &self.default
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current value in string form.
    pub fn value(&self) -> String {
        match &self.dest {
            Destination::String(s) => (**s).clone(),
            Destination::Bool(b) => b.to_string(),
            Destination::Int(i) => i.to_string(),
        }
    }

    /// Parse `raw` according to the flag's kind and store it.
    pub fn set(&mut self, raw: &str) -> Result<(), FlagfigError> {
        match &mut self.dest {
            Destination::String(s) => **s = raw.to_string(),
            Destination::Bool(b) => {
                **b = tag::parse_bool(raw).ok_or_else(|| invalid(&self.name, raw, "a boolean"))?;
            }
            Destination::Int(i) => {
                **i = tag::parse_int(raw).ok_or_else(|| invalid(&self.name, raw, "an integer"))?;
            }
        }
        Ok(())
    }

    pub fn info(&self) -> FlagInfo {
        FlagInfo {
            name: self.name.clone(),
            kind: self.kind(),
            default: self.default.clone(),
            description: self.description.clone(),
            value: self.value(),
        }
    }
}

fn invalid(name: &str, raw: &str, expected: &str) -> FlagfigError {
    FlagfigError::InvalidValue {
        key: name.to_string(),
        reason: format!("'{raw}' is not {expected}"),
    }
}

/// Whether `table` names a table that `key` lives under.
fn is_table_of(table: &str, key: &str) -> bool {
    key.strip_prefix(table)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Flags in registration order.
#[derive(Debug, Default)]
pub struct FlagSet<'a> {
    flags: Vec<Flag<'a>>,
}

impl<'a> FlagSet<'a> {
    pub fn new() -> Self {
        Self { flags: Vec::new() }
    }

    /// Check that `name` can join the set as a config key.
    ///
    /// Fails if the name is taken, has an empty dotted segment, or would
    /// make one flag a table holding another (`database` and `database.url`).
    pub fn check_name(&self, name: &str) -> Result<(), FlagfigError> {
        if name.split('.').any(str::is_empty) {
            return Err(FlagfigError::InvalidName {
                name: name.to_string(),
                reason: "empty segment in dotted name".to_string(),
            });
        }
        for other in self.flags.iter().map(|f| f.name()) {
            if other == name {
                return Err(FlagfigError::DuplicateFlag(name.to_string()));
            }
            if is_table_of(other, name) || is_table_of(name, other) {
                return Err(FlagfigError::NameConflict {
                    name: name.to_string(),
                    other: other.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, flag: Flag<'a>) -> Result<(), FlagfigError> {
        self.check_name(flag.name())?;
        self.flags.push(flag);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Flag<'a>> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Flag<'a>> {
        self.flags.iter_mut().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.flags.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Flag<'a>> {
        self.flags.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_default_written_to_destination() {
        let mut s = String::from("old");
        let flag = Flag::new("host".into(), "localhost".into(), String::new(), s.destination());
        assert_eq!(flag.value(), "localhost");
        drop(flag);
        assert_eq!(s, "localhost");
    }

    #[test]
    fn bad_bool_default_is_false() {
        let mut b = true;
        let flag = Flag::new("v".into(), "maybe".into(), String::new(), b.destination());
        assert_eq!(flag.value(), "false");
    }

    #[test]
    fn bad_int_default_is_zero() {
        let mut i = 42i64;
        let flag = Flag::new("n".into(), "ten".into(), String::new(), i.destination());
        assert_eq!(flag.value(), "0");
    }

    #[test]
    fn set_writes_through() {
        let mut i = 0i64;
        let mut flag = Flag::new("n".into(), "10".into(), String::new(), i.destination());
        flag.set("54").unwrap();
        drop(flag);
        assert_eq!(i, 54);
    }

    #[test]
    fn set_rejects_bad_int() {
        let mut i = 0i64;
        let mut flag = Flag::new("n".into(), "10".into(), String::new(), i.destination());
        let err = flag.set("abc").unwrap_err();
        assert!(matches!(err, FlagfigError::InvalidValue { key, .. } if key == "n"));
        assert_eq!(flag.value(), "10");
    }

    #[test]
    fn set_bool_permissive() {
        let mut b = false;
        let mut flag = Flag::new("v".into(), String::new(), String::new(), b.destination());
        flag.set("T").unwrap();
        assert_eq!(flag.value(), "true");
        assert!(flag.set("yes").is_err());
    }

    #[test]
    fn info_snapshot() {
        let mut s = String::new();
        let flag = Flag::new("a".into(), "x".into(), "desc".into(), s.destination());
        let info = flag.info();
        assert_eq!(info.kind, FlagKind::String);
        assert_eq!(info.default, "x");
        assert_eq!(info.description, "desc");
        assert_eq!(info.value, "x");
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut a = String::new();
        let mut b = String::new();
        let mut set = FlagSet::new();
        set.insert(Flag::new("x".into(), String::new(), String::new(), a.destination()))
            .unwrap();
        let err = set
            .insert(Flag::new("x".into(), String::new(), String::new(), b.destination()))
            .unwrap_err();
        assert!(matches!(err, FlagfigError::DuplicateFlag(name) if name == "x"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn parent_and_child_names_conflict() {
        let (mut a, mut b, mut c) = (String::new(), String::new(), String::new());
        let mut set = FlagSet::new();
        set.insert(Flag::new("database".into(), String::new(), String::new(), a.destination()))
            .unwrap();
        let err = set.check_name("database.url").unwrap_err();
        assert!(
            matches!(err, FlagfigError::NameConflict { name, other } if name == "database.url" && other == "database")
        );
        assert!(set.check_name("databases.url").is_ok());

        let mut set = FlagSet::new();
        set.insert(Flag::new("a.b.c".into(), String::new(), String::new(), b.destination()))
            .unwrap();
        assert!(matches!(set.check_name("a.b"), Err(FlagfigError::NameConflict { .. })));
        assert!(matches!(set.check_name("a"), Err(FlagfigError::NameConflict { .. })));
        assert!(set.check_name("a.bc").is_ok());
        let err = set
            .insert(Flag::new("a".into(), String::new(), String::new(), c.destination()))
            .unwrap_err();
        assert!(matches!(err, FlagfigError::NameConflict { .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_dotted_segment_rejected() {
        let set = FlagSet::new();
        for bad in ["a..b", ".a", "a."] {
            assert!(matches!(set.check_name(bad), Err(FlagfigError::InvalidName { .. })));
        }
    }

    #[test]
    fn registration_order_kept() {
        let (mut a, mut b, mut c) = (String::new(), String::new(), String::new());
        let mut set = FlagSet::new();
        for (name, dest) in [("z", &mut a), ("a", &mut b), ("m", &mut c)] {
            set.insert(Flag::new(name.into(), String::new(), String::new(), dest.destination()))
                .unwrap();
        }
        let names: Vec<&str> = set.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
