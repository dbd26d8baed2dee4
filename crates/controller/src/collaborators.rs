//! External collaborator contracts.
//!
//! The router and the auth backend are owned by the surrounding application;
//! the controller only needs these two capabilities from them.

/// Router collaborator: performs the actual navigation.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`. `replace` replaces the current history entry so a
    /// denied page is not reachable via "back".
    fn navigate(&self, path: &str, replace: bool);
}

/// Auth collaborator: the controller invokes `logout` when a session
/// integrity violation is detected. A corrupted session is never kept alive.
pub trait AuthGateway: Send + Sync {
    fn logout(&self);
}
