//! ExplainOptions - per-call options for the explainer.

use serde::Deserialize;

use crate::domain::ExplanationLevel;

/// Default character budget for one input's content.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 500;

/// Missing fields fall back to `ExplainOptions::default()` when deserialized,
/// so a partial query string is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplainOptions {
    pub level: ExplanationLevel,

    /// Attach a verbatim copy of each source trace.
    pub include_raw: bool,

    /// Resolve actor ids through the entity resolver, when one is configured.
    pub resolve_entities: bool,

    /// Character budget for prompt and input contents (ignored at `full` level).
    pub max_content_length: usize,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            level: ExplanationLevel::Detailed,
            include_raw: false,
            resolve_entities: false,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

impl ExplainOptions {
    pub fn with_level(mut self, level: ExplanationLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    pub fn with_entities(mut self, resolve_entities: bool) -> Self {
        self.resolve_entities = resolve_entities;
        self
    }

    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    /// `None` means "do not truncate".
    pub fn content_limit(&self) -> Option<usize> {
        match self.level {
            ExplanationLevel::Full => None,
            ExplanationLevel::Summary | ExplanationLevel::Detailed => {
                Some(self.max_content_length)
            }
        }
    }
}
