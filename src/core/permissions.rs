//! Execution realm and target-permission metadata.
//!
//! Both are carried on commands as declarative metadata for the host to
//! evaluate; nothing in this crate enforces them.

/// The side a command is meant to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Realm {
    /// Runs on the calling client, after the server has verified access.
    Client,
    /// Runs on the server.
    Server,
    /// Runs on both the calling client and the server.
    #[default]
    Shared,
}

impl Realm {
    /// Get the display name for this realm.
    pub fn name(&self) -> &'static str {
        match self {
            Realm::Client => "Client",
            Realm::Server => "Server",
            Realm::Shared => "Shared",
        }
    }
}

impl std::fmt::Display for Realm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Restricts who a command may target relative to the caller.
///
/// Evaluated by the host's permission layer when a command targets another
/// player (kick, ban, teleport, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPermission {
    /// Only targets with a strictly lower permission level than the caller.
    LowerPermissionLevel,
    /// Targets with a lower or equal permission level.
    SamePermissionLevel,
    /// Any target regardless of permission level.
    All,
}

impl TargetPermission {
    /// Get the display name for this target rule.
    pub fn name(&self) -> &'static str {
        match self {
            TargetPermission::LowerPermissionLevel => "LowerPermissionLevel",
            TargetPermission::SamePermissionLevel => "SamePermissionLevel",
            TargetPermission::All => "All",
        }
    }
}

impl std::fmt::Display for TargetPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
