//! Run configuration.

use std::path::PathBuf;

use crate::codebase::PublishSettings;

/// Everything one codemod run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root of the project to sweep
    pub root: PathBuf,
    pub publish: PublishSettings,
}

impl RunConfig {
    /// Configuration for `root` with default publish settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            publish: PublishSettings::default(),
        }
    }

    pub fn with_publish(mut self, publish: PublishSettings) -> Self {
        self.publish = publish;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::DEFAULT_API_URL;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new(".");
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.publish.branch, "codemod/remove-unused-imports");
        assert_eq!(config.publish.remote, "origin");
        assert_eq!(config.publish.api_url, DEFAULT_API_URL);
        assert!(config.publish.token.is_none());
        assert!(config.publish.base.is_none());
    }

    #[test]
    fn test_with_publish() {
        let publish = PublishSettings {
            branch: "chore/imports".to_string(),
            ..PublishSettings::default()
        };
        let config = RunConfig::new("/repo").with_publish(publish.clone());
        assert_eq!(config.publish, publish);
    }
}
