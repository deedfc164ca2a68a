//! Name-based environment classification.
//!
//! Resource names are the only signal available without tagging metadata, so
//! a resource counts as production-like when its name matches one of the
//! configured patterns (case-insensitive, unanchored).

use regex::{Regex, RegexBuilder};

use crate::error::{AuditError, Result};

/// Patterns used when the configuration does not provide any.
pub const DEFAULT_PRODUCTION_PATTERNS: &[&str] = &["prod", "demo"];

/// Decides whether a resource name belongs to a production-like environment.
#[derive(Debug, Clone)]
pub struct EnvironmentClassifier {
    patterns: Vec<Regex>,
}

impl EnvironmentClassifier {
    /// Compile the given patterns.
    ///
    /// Fails with `AuditError::Classification` on the first pattern that is
    /// not a valid regular expression.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| AuditError::Classification {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn is_production_like(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }
}

impl Default for EnvironmentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCTION_PATTERNS).expect("Invalid default pattern")
    }
}
