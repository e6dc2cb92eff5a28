use std::{fs, io::ErrorKind, path::{Path, PathBuf}};

use tracing::{debug, warn};

use crate::error::AppError;

/// Name recorded when no identity has been configured
pub const DEFAULT_NAME: &str = "root";
/// Email recorded when no identity has been configured
pub const DEFAULT_EMAIL: &str = "example@mail.com";

/// Sections written after `[user]` on every save
const BOILERPLATE: &str = "\
[color]
 ui = true
 status = true
 branch = true
 diff = true
 interactive = true
[credential]
 helper = store
";

/// Git identity from the `[user]` section (user.name / user.email)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_EMAIL)
    }
}

/// Reads and rewrites the identity config file
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the identity, falling back to [`Identity::default`] when the
    /// file is missing, unreadable or has no complete `[user]` section
    pub fn load(&self) -> Identity {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no identity file, using defaults");
                return Identity::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read identity file, using defaults");
                return Identity::default();
            }
        };

        match parse_identity(&text) {
            Some(identity) => {
                debug!(path = %self.path.display(), name = %identity.name, "loaded identity");
                identity
            }
            None => {
                warn!(path = %self.path.display(), "identity file has no usable [user] section, using defaults");
                Identity::default()
            }
        }
    }

    /// Overwrites the file with `identity` and the fixed boilerplate sections
    ///
    /// Missing parent directories are created. No validation happens here.
    pub fn save(&self, identity: &Identity) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::write(parent, e))?;
        }
        fs::write(&self.path, render_identity(identity))
            .map_err(|e| AppError::write(&self.path, e))?;
        debug!(path = %self.path.display(), name = %identity.name, "saved identity");
        Ok(())
    }
}

/// Extracts `name` and `email` from the `[user]` section of a git-style config
///
/// Section and key names match case-insensitively, `#` and `;` start a
/// comment outside double quotes and the last occurrence of a key wins.
pub fn parse_identity(text: &str) -> Option<Identity> {
    let mut in_user = false;
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let section = header.split(']').next().unwrap_or_default().trim();
            in_user = section.eq_ignore_ascii_case("user");
            continue;
        }

        if !in_user {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = config_value(value);
        match key.trim() {
            k if k.eq_ignore_ascii_case("name") => name = Some(value),
            k if k.eq_ignore_ascii_case("email") => email = Some(value),
            _ => {}
        }
    }

    match (name, email) {
        (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
            Some(Identity::new(name, email))
        }
        _ => None,
    }
}

/// Reads a raw value the way git does: quotes removed, `\\` escapes applied,
/// inline comment dropped, surrounding whitespace trimmed
fn config_value(raw: &str) -> String {
    let mut value = String::new();
    let mut quoted = false;
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(other) => value.push(other),
                None => {}
            },
            '#' | ';' if !quoted => break,
            _ => value.push(c),
        }
    }
    value.trim().to_string()
}

/// Serializes `identity` in the exact on-disk layout
pub fn render_identity(identity: &Identity) -> String {
    format!(
        "[user]\n name = {}\n email = {}\n{BOILERPLATE}",
        identity.name, identity.email
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, IdentityStore) {
        let tmp = TempDir::new().unwrap();
        let store = IdentityStore::new(tmp.path().join(".gitconfig"));
        (tmp, store)
    }

    #[test]
    fn test_round_trip() {
        let (_tmp, store) = create_test_store();
        let identity = Identity::new("octocat", "octocat@github.com");

        store.save(&identity).unwrap();

        assert_eq!(store.load(), identity);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (_tmp, store) = create_test_store();

        let identity = store.load();

        assert_eq!(identity, Identity::new("root", "example@mail.com"));
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let (_tmp, store) = create_test_store();
        fs::write(store.path(), "this is not a config file\nat = all\n").unwrap();

        assert_eq!(store.load(), Identity::default());
    }

    #[test]
    fn test_partial_user_section_uses_defaults() {
        let (_tmp, store) = create_test_store();
        fs::write(store.path(), "[user]\n name = octocat\n").unwrap();

        assert_eq!(store.load(), Identity::default());
    }

    #[test]
    fn test_save_writes_exact_layout() {
        let (_tmp, store) = create_test_store();

        store.save(&Identity::new("dev", "dev@example.com")).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            text,
            "[user]\n name = dev\n email = dev@example.com\n[color]\n ui = true\n status = true\n branch = true\n diff = true\n interactive = true\n[credential]\n helper = store\n"
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = IdentityStore::new(tmp.path().join("nested/home/.gitconfig"));

        store.save(&Identity::default()).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn test_save_overwrites_foreign_content() {
        let (_tmp, store) = create_test_store();
        fs::write(store.path(), "[alias]\n co = checkout\n").unwrap();

        store.save(&Identity::new("dev", "dev@example.com")).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(!text.contains("alias"));
        assert_eq!(store.load(), Identity::new("dev", "dev@example.com"));
    }

    #[test]
    fn test_save_failure_is_write_error() {
        let (_tmp, store) = create_test_store();
        fs::create_dir(store.path()).unwrap();

        let err = store.save(&Identity::default()).unwrap_err();

        assert!(matches!(err, AppError::Write { .. }));
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_other_sections() {
        let text = "[core]\n\teditor = vim\n[User]\n\tName=  alice  \n\temail =alice@example.com\n";

        let identity = parse_identity(text).unwrap();

        assert_eq!(identity, Identity::new("alice", "alice@example.com"));
    }

    #[test]
    fn test_parse_ignores_keys_outside_user_section() {
        let text = "[user]\n name = alice\n[sendemail]\n email = other@example.com\n";

        assert_eq!(parse_identity(text), None);
    }

    #[test]
    fn test_parse_drops_inline_comments() {
        let text = "[user]\n name = alice # work account\n email = a#b@c.com\n";

        let identity = parse_identity(text).unwrap();

        assert_eq!(identity.name, "alice");
        assert_eq!(identity.email, "a");
    }

    #[test]
    fn test_parse_unquotes_values() {
        let text = "[user]\n name = \"alice; ops\"\n email = \"alice@example.com\" ; old\n";

        let identity = parse_identity(text).unwrap();

        assert_eq!(identity.name, "alice; ops");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn test_parse_skips_comments_and_last_key_wins() {
        let text = "# global config\n[user]\n; old\n name = first\n email = a@b.com\n name = second\n";

        let identity = parse_identity(text).unwrap();

        assert_eq!(identity.name, "second");
        assert_eq!(identity.email, "a@b.com");
    }
}
