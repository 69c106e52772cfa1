use serde::{Deserialize, Serialize};

/// What the data store does with an event naming an id it cannot accept:
/// an id it never issued, or one that already went terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalPolicy {
    /// Fail the emission with an `EventError`
    #[default]
    Reject,

    /// Drop the event and log a warning
    Ignore,
}

/// Configuration options for `MemoryDataStore`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataStoreOptions {
    /// Handling of events for unknown or closed ids
    pub terminal_policy: TerminalPolicy,

    /// Number of events kept in history, `None` keeps everything
    pub history_limit: Option<usize>,

    /// Validate components against the installed registry when they are
    /// stored
    pub validate_components: bool,
}

impl Default for DataStoreOptions {
    fn default() -> Self {
        Self {
            terminal_policy: TerminalPolicy::Reject,
            history_limit: Some(1024),
            validate_components: true,
        }
    }
}

impl DataStoreOptions {
    /// Reject protocol violations and validate every stored graph
    pub fn strict() -> Self {
        Self::default()
    }

    /// Drop protocol violations and store graphs unchecked
    pub fn lenient() -> Self {
        Self {
            terminal_policy: TerminalPolicy::Ignore,
            validate_components: false,
            ..Default::default()
        }
    }

    /// Keep every event, for tests and diagnostics
    pub fn unbounded_history(mut self) -> Self {
        self.history_limit = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let json = r#"{ "terminalPolicy": "ignore", "historyLimit": 16 }"#;
        let options: DataStoreOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.terminal_policy, TerminalPolicy::Ignore);
        assert_eq!(options.history_limit, Some(16));
        assert!(options.validate_components);
    }

    #[test]
    fn test_default_options() {
        let options = DataStoreOptions::default();
        assert_eq!(options.terminal_policy, TerminalPolicy::Reject);
        assert_eq!(options.history_limit, Some(1024));
        assert_eq!(DataStoreOptions::strict(), options);
    }

    #[test]
    fn test_lenient_options() {
        let options = DataStoreOptions::lenient().unbounded_history();
        assert_eq!(options.terminal_policy, TerminalPolicy::Ignore);
        assert!(!options.validate_components);
        assert_eq!(options.history_limit, None);
    }
}
