//! Configuration types for the clone detection engine.

use serde::{Deserialize, Serialize};

use crate::core::errors::{CloneSeekError, Result};
use crate::core::pdg::node::{DEFAULT_COMMENT_KINDS, DEFAULT_STATEMENT_KINDS};

/// Top-level configuration for a [`CloneAnalyzer`](crate::CloneAnalyzer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneConfig {
    /// Record wall-clock timings for discovery and selection in the report
    pub record_benchmarks: bool,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            record_benchmarks: true,
        }
    }
}

impl CloneConfig {
    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        // All current fields are self-validating flags.
        Ok(())
    }
}

/// AST-kind vocabulary used to classify PDG nodes at build time.
///
/// The defaults cover the Esprima AST kinds; producers working from a
/// different parser can supply their own vocabulary through
/// [`PdgBuilder::with_kinds`](crate::PdgBuilder::with_kinds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindConfig {
    /// AST kinds treated as statements
    pub statement_kinds: Vec<String>,

    /// AST kinds treated as comments
    pub comment_kinds: Vec<String>,
}

impl Default for KindConfig {
    fn default() -> Self {
        Self {
            statement_kinds: DEFAULT_STATEMENT_KINDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            comment_kinds: DEFAULT_COMMENT_KINDS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl KindConfig {
    /// Validate the kind vocabulary
    pub fn validate(&self) -> Result<()> {
        if self.statement_kinds.is_empty() {
            return Err(CloneSeekError::config_field(
                "statement kind vocabulary must not be empty",
                "statement_kinds",
            ));
        }

        if let Some(kind) = self
            .comment_kinds
            .iter()
            .find(|kind| self.statement_kinds.contains(kind))
        {
            return Err(CloneSeekError::config_field(
                format!("kind '{kind}' cannot be both a statement and a comment"),
                "comment_kinds",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_validate() {
        assert!(CloneConfig::default().validate().is_ok());
        assert!(KindConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_statement_kinds_rejected() {
        let config = KindConfig {
            statement_kinds: Vec::new(),
            ..KindConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overlapping_kinds_rejected() {
        let mut config = KindConfig::default();
        config.comment_kinds.push("IfStatement".to_string());
        assert!(config.validate().is_err());
    }
}
