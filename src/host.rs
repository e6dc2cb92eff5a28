/// Domain of the built-in hosted service
pub const DEFAULT_HOST: &str = "github.com";

/// Which host the credential is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSelection {
    pub use_default_host: bool,
    pub custom_host: String,
}

impl HostSelection {
    pub fn new(use_default_host: bool, custom_host: impl Into<String>) -> Self {
        Self {
            use_default_host,
            custom_host: custom_host.into(),
        }
    }

    pub fn active_host(&self) -> &str {
        resolve(self.use_default_host, &self.custom_host)
    }
}

/// Returns [`DEFAULT_HOST`] when `use_default_host` is set, otherwise `custom_host` as is
pub fn resolve(use_default_host: bool, custom_host: &str) -> &str {
    if use_default_host {
        DEFAULT_HOST
    } else {
        custom_host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(true, "anything"), "github.com");
        assert_eq!(resolve(false, "example.com"), "example.com");
        assert_eq!(resolve(false, ""), "");
    }

    #[test]
    fn test_selection_active_host() {
        let mut selection = HostSelection::new(true, "git.example.com");
        assert_eq!(selection.active_host(), DEFAULT_HOST);

        selection.use_default_host = false;
        assert_eq!(selection.active_host(), "git.example.com");
    }
}
