//! The `name,default,description` annotation grammar.
//!
//! Segments are separated by `,`. A comma preceded by a backslash (`\,`) is a
//! literal comma inside the current segment and is unescaped at parse time.
//! Any other backslash is kept as-is. Once the name and default are split off,
//! the description takes everything that remains, commas included.

/// The three segments of one parsed annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDescriptor {
    pub name: String,
    pub default: String,
    pub description: String,
}

/// Parse an annotation string into its name, default, and description.
///
/// Missing trailing segments are empty: `"port"` has an empty default and
/// description, `""` is entirely empty.
pub fn parse_tag(tag: &str) -> TagDescriptor {
    let (name, rest) = next_segment(tag);
    let (default, rest) = match rest {
        Some(rest) => next_segment(rest),
        None => (String::new(), None),
    };
    let description = rest.map(unescape).unwrap_or_default();

    TagDescriptor {
        name,
        default,
        description,
    }
}

/// Split off the first unescaped segment. Returns the unescaped segment and
/// the remainder after the separator, or `None` if no separator was found.
fn next_segment(s: &str) -> (String, Option<&str>) {
    let mut segment = String::new();
    let mut chars = s.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some((_, ','))) => {
                segment.push(',');
                chars.next();
            }
            ',' => return (segment, Some(&s[i + 1..])),
            other => segment.push(other),
        }
    }
    (segment, None)
}

fn unescape(s: &str) -> String {
    s.replace("\\,", ",")
}

/// Permissive boolean parsing: `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Base-10 integer parsing, leading sign allowed.
pub fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}
