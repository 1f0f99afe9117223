//! Identity keys for validated statistics.
//!
//! Keys follow the format `{namespace}:{id}` for debuggability, mirroring how
//! the cache and season collaborators log them.
//! Example: `player:545361`, `team:NYY`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace used for per-player statistics.
pub const PLAYER_NAMESPACE: &str = "player";

/// Namespace used for team-level aggregate statistics.
pub const TEAM_NAMESPACE: &str = "team";

/// Identity of the entity a statistic belongs to.
///
/// Per-player validation is the common case, but the same fallback chain is
/// reused for aggregate statistics, so the key is a namespaced string rather
/// than a bare player id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatKey(String);

impl StatKey {
    /// Key for a single player.
    pub fn player(id: impl AsRef<str>) -> Self {
        Self::namespaced(PLAYER_NAMESPACE, id)
    }

    /// Key for a team-level aggregate.
    pub fn team(abbreviation: impl AsRef<str>) -> Self {
        Self::namespaced(TEAM_NAMESPACE, abbreviation)
    }

    /// Key in an arbitrary namespace.
    pub fn namespaced(namespace: &str, id: impl AsRef<str>) -> Self {
        Self(format!("{}:{}", namespace, id.as_ref().trim()))
    }

    /// The full key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace portion of the key (`player`, `team`, ...).
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or("")
    }

    /// Identifier portion of the key, without the namespace.
    pub fn id(&self) -> &str {
        self.0.split_once(':').map(|(_, id)| id).unwrap_or(&self.0)
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
