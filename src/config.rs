//! Tunables for the scanner, persisted by embedding hosts via `serde`.

use serde::{Deserialize, Serialize};

/// Columns a tab advances to, per §2 of the indentation rules.
pub const TAB_WIDTH: u32 = 8;

/// Runtime configuration for a scanner instance.
///
/// These are soft caps: exceeding `max_indent_depth` or `max_delimiter_depth`
/// does not error, it just stops growing the stack and logs at `debug`
/// level, leaving recovery to the host grammar's error-recovery mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Maximum number of simultaneously open indentation levels.
    pub max_indent_depth: usize,
    /// Maximum number of simultaneously open string delimiters.
    pub max_delimiter_depth: usize,
    /// Whether the shell-command dictionary (§6/§9) may be extended by the
    /// host with additional entries at construction time.
    pub allow_shell_dictionary_extension: bool,
}

impl ScannerConfig {
    #[must_use]
    pub fn new(max_indent_depth: usize, max_delimiter_depth: usize) -> Self {
        Self {
            max_indent_depth,
            max_delimiter_depth,
            allow_shell_dictionary_extension: false,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_indent_depth: 128,
            max_delimiter_depth: 32,
            allow_shell_dictionary_extension: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_reasonable() {
        let config = ScannerConfig::default();
        assert!(config.max_indent_depth > 0);
        assert!(config.max_delimiter_depth > 0);
        assert!(!config.allow_shell_dictionary_extension);
    }

    #[test]
    fn clone_is_equal() {
        let config = ScannerConfig::new(16, 8);
        assert_eq!(config.clone(), config);
    }
}
