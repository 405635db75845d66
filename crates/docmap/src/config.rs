// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transcoder configuration.
//!
//! Defaults are compile-time constants; [`TranscodeConfig::from_env`] lets a
//! deployment override them without code changes.
//!
//! | Variable              | Meaning                              | Default |
//! |-----------------------|--------------------------------------|---------|
//! | `DOCMAP_MAX_DEPTH`    | recursion limit for encode/decode    | 128     |
//! | `DOCMAP_LOG_UNMAPPED` | log dropped fields/keys (`1`/`true`) | off     |

/// Default recursion limit for both engines.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Environment variable overriding [`TranscodeConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "DOCMAP_MAX_DEPTH";

/// Environment variable overriding [`TranscodeConfig::log_unmapped`].
pub const ENV_LOG_UNMAPPED: &str = "DOCMAP_LOG_UNMAPPED";

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeConfig {
    /// Maximum nesting of embedded instances (root is depth 0).
    pub max_depth: usize,
    /// Emit a debug log line for every unmapped field or key that is dropped.
    pub log_unmapped: bool,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_unmapped: false,
        }
    }
}

impl TranscodeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the environment, falling back to defaults for
    /// unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_depth: lookup(ENV_MAX_DEPTH)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_depth),
            log_unmapped: lookup(ENV_LOG_UNMAPPED)
                .map(|s| matches!(s.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(defaults.log_unmapped),
        }
    }

    /// Set the recursion limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable logging of dropped unmapped fields.
    pub fn with_log_unmapped(mut self, enabled: bool) -> Self {
        self.log_unmapped = enabled;
        self
    }
}
