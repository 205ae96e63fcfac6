//! Name matching used by the tree filter.
//!
//! Wraps the matching strategy so the filter does not care whether a plain
//! substring test or a fuzzy scorer decides a hit.

use std::fmt;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};

/// How a search query is matched against entry names.
///
/// 搜索匹配方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring containment.
    #[default]
    Substring,
    /// Case-insensitive fuzzy matching (non-consecutive characters allowed).
    Fuzzy,
}

/// Matcher for entry names.
pub struct NameMatcher {
    mode: SearchMode,
    fuzzy: SkimMatcherV2,
}

impl NameMatcher {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            fuzzy: SkimMatcherV2::default().ignore_case(),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Check whether `name` matches `needle`.
    ///
    /// `needle` must already be lowercased; the filter lowercases the query
    /// once per projection instead of once per node.
    pub fn matches(&self, name: &str, needle: &str) -> bool {
        match self.mode {
            SearchMode::Substring => name.to_lowercase().contains(needle),
            SearchMode::Fuzzy => self.fuzzy.fuzzy_match(name, needle).is_some(),
        }
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(SearchMode::default())
    }
}

impl fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameMatcher")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
