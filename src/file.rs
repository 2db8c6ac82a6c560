//! Config file discovery and decoding.
//!
//! # Discovery
//!
//! Search directories and candidate file names are both ordered lists. The
//! candidate list is their cross product in **path-major** order: every file
//! name is tried in the first directory before moving on to the second. The
//! first file name is always `{prog_name}.conf`, followed by any extra names
//! in the order they were given.
//!
//! The first candidate that exists and is a regular file wins. Directories,
//! dangling entries, and missing files are skipped.
//!
//! # Decoding
//!
//! Files are TOML. A document that fails to parse is logged and treated as an
//! empty tree: the remaining layers (defaults, command line) still apply.

use std::path::{Path, PathBuf};

use toml::Table;

use crate::error::FlagfigError;

/// Expand a leading `~/` to `home`.
///
/// Paths without the prefix are returned unchanged. Returns `None` when the
/// path needs expanding but no home directory is known.
pub fn expand_home(path: &Path, home: Option<&Path>) -> Option<PathBuf> {
    if !path.as_os_str().as_encoded_bytes().starts_with(b"~/") {
        return Some(path.to_path_buf());
    }
    let home = home?;
    match path.strip_prefix("~") {
        Ok(rest) if !rest.as_os_str().is_empty() => Some(home.join(rest)),
        _ => Some(home.to_path_buf()),
    }
}

/// The fallback file names for a program: `{prog_name}.conf`, then `extra`.
pub fn file_names(prog_name: &str, extra: &[&str]) -> Vec<String> {
    std::iter::once(format!("{prog_name}.conf"))
        .chain(extra.iter().map(|s| s.to_string()))
        .collect()
}

/// Every `{dir}/{file_name}` combination, path-major.
pub fn conf_file_list(dirs: &[PathBuf], file_names: &[String]) -> Vec<PathBuf> {
    dirs.iter()
        .flat_map(|dir| file_names.iter().map(move |name| dir.join(name)))
        .collect()
}

/// The first candidate that is a regular file.
pub fn find_config_file(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates.iter().find(|p| p.is_file())
}

/// Read a discovered config file. I/O errors other than the file vanishing
/// are propagated.
pub fn read_config_file(path: &Path) -> Result<Option<String>, FlagfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FlagfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Decode TOML text into a generic tree. `origin` names the source in the
/// warning emitted for malformed input.
pub fn decode_tree(content: &str, origin: &str) -> Table {
    match content.parse::<Table>() {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("ignoring malformed config in {origin}: {e}");
            Table::new()
        }
    }
}

/// Decode raw bytes. Non-UTF-8 input cannot be a TOML mapping at all and is
/// an error; malformed TOML is tolerated as in [`decode_tree`].
pub fn decode_bytes(bytes: &[u8], origin: &str) -> Result<Table, FlagfigError> {
    let content = std::str::from_utf8(bytes)?;
    Ok(decode_tree(content, origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn expand_home_prefix() {
        let home = PathBuf::from("/home/prova");
        assert_eq!(
            expand_home(Path::new("~/bin"), Some(&home)),
            Some(PathBuf::from("/home/prova/bin"))
        );
    }

    #[test]
    fn expand_home_leaves_other_paths() {
        let home = PathBuf::from("/home/prova");
        assert_eq!(
            expand_home(Path::new("/test/prova/123"), Some(&home)),
            Some(PathBuf::from("/test/prova/123"))
        );
        assert_eq!(
            expand_home(Path::new("prova/123"), Some(&home)),
            Some(PathBuf::from("prova/123"))
        );
        assert_eq!(
            expand_home(Path::new("~other/x"), Some(&home)),
            Some(PathBuf::from("~other/x"))
        );
    }

    #[test]
    fn expand_home_bare_prefix_is_home() {
        let home = PathBuf::from("/home/u");
        assert_eq!(
            expand_home(Path::new("~/"), Some(&home)),
            Some(PathBuf::from("/home/u"))
        );
        assert_eq!(
            expand_home(Path::new("~"), Some(&home)),
            Some(PathBuf::from("~"))
        );
        assert_eq!(expand_home(Path::new("~/"), None), None);
    }

    #[test]
    fn expand_home_without_home() {
        assert_eq!(expand_home(Path::new("~/bin"), None), None);
        assert_eq!(
            expand_home(Path::new("/etc"), None),
            Some(PathBuf::from("/etc"))
        );
    }

    #[test]
    fn file_names_start_with_prog_name() {
        assert_eq!(
            file_names("prova2", &["t1.conf", "t2.yaml", "t3.toml"]),
            ["prova2.conf", "t1.conf", "t2.yaml", "t3.toml"]
        );
        assert_eq!(file_names("solo", &[]), ["solo.conf"]);
    }

    #[test]
    fn conf_file_list_is_path_major() {
        let dirs = vec![
            PathBuf::from("/home/prova/bin"),
            PathBuf::from("/test/prova/123"),
            PathBuf::from("prova/123"),
        ];
        let names = file_names("prova", &["test.conf"]);
        let list = conf_file_list(&dirs, &names);
        assert_eq!(
            list,
            [
                PathBuf::from("/home/prova/bin/prova.conf"),
                PathBuf::from("/home/prova/bin/test.conf"),
                PathBuf::from("/test/prova/123/prova.conf"),
                PathBuf::from("/test/prova/123/test.conf"),
                PathBuf::from("prova/123/prova.conf"),
                PathBuf::from("prova/123/test.conf"),
            ]
        );
    }

    #[test]
    fn conf_file_list_empty_without_dirs() {
        assert!(conf_file_list(&[], &file_names("x", &[])).is_empty());
    }

    #[test]
    fn find_first_regular_file() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();
        fs::write(dir2.path().join("app.conf"), "a = 1\n").unwrap();
        fs::write(dir2.path().join("other.conf"), "a = 2\n").unwrap();

        let candidates = vec![
            dir1.path().join("app.conf"),
            dir2.path().join("other.conf"),
            dir2.path().join("app.conf"),
        ];
        assert_eq!(
            find_config_file(&candidates),
            Some(&dir2.path().join("other.conf"))
        );
    }

    #[test]
    fn find_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("app.conf")).unwrap();
        fs::write(dir.path().join("fallback.conf"), "").unwrap();

        let candidates = vec![dir.path().join("app.conf"), dir.path().join("fallback.conf")];
        assert_eq!(
            find_config_file(&candidates),
            Some(&dir.path().join("fallback.conf"))
        );
    }

    #[test]
    fn find_none_when_nothing_exists() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![dir.path().join("a.conf"), dir.path().join("b.conf")];
        assert_eq!(find_config_file(&candidates), None);
    }

    #[test]
    fn read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_config_file(&dir.path().join("gone.conf")).unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_returns_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("app.conf");
        fs::write(&file_path, "port = 1\n").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits.
        if fs::read_to_string(&file_path).is_err() {
            let result = read_config_file(&file_path);
            assert!(matches!(result, Err(FlagfigError::IoError { .. })));
        }

        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn decode_nested_tree() {
        let tree = decode_tree("partest = \"hi\"\n[test]\nv = false\n", "test");
        assert_eq!(tree["partest"].as_str(), Some("hi"));
        assert_eq!(tree["test"]["v"].as_bool(), Some(false));
    }

    #[test]
    fn decode_malformed_is_empty() {
        let tree = decode_tree("partest = \"unterminated\n", "test");
        assert!(tree.is_empty());
    }

    #[test]
    fn decode_bytes_rejects_non_utf8() {
        let result = decode_bytes(&[0x66, 0xff, 0xfe], "buffer");
        assert!(matches!(result, Err(FlagfigError::Decode(_))));
    }

    #[test]
    fn decode_bytes_accepts_toml() {
        let tree = decode_bytes(b"testint = 11\n", "buffer").unwrap();
        assert_eq!(tree["testint"].as_integer(), Some(11));
    }
}
