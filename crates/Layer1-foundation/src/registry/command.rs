//! Command Whitelist - the only programs the agent may spawn

use crate::core::CommandResolver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Static mapping of command name to executable path.
///
/// Loaded once from the `[commands]` table of the agent config and never
/// modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandWhitelist {
    commands: HashMap<String, PathBuf>,
}

impl CommandWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: allow `name` to run `executable`
    pub fn allow(mut self, name: impl Into<String>, executable: impl Into<PathBuf>) -> Self {
        self.commands.insert(name.into(), executable.into());
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Sorted command names (for startup logging)
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl CommandResolver for CommandWhitelist {
    fn resolve(&self, command_name: &str) -> Option<PathBuf> {
        self.commands.get(command_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let whitelist = CommandWhitelist::new()
            .allow("echo-test", "/bin/echo")
            .allow("sleep", "/bin/sleep");

        assert_eq!(whitelist.len(), 2);
        assert_eq!(
            whitelist.resolve("echo-test"),
            Some(PathBuf::from("/bin/echo"))
        );
        assert_eq!(whitelist.resolve("rm"), None);
        // Lookup is exact, no path or case folding
        assert_eq!(whitelist.resolve("ECHO-TEST"), None);
        assert_eq!(whitelist.resolve("/bin/echo"), None);
    }

    #[test]
    fn test_names_sorted() {
        let whitelist = CommandWhitelist::new()
            .allow("zz", "/bin/true")
            .allow("aa", "/bin/false");
        assert_eq!(whitelist.names(), vec!["aa", "zz"]);
    }
}
