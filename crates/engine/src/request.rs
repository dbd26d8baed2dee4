use serde::Serialize;

use routegate_session::{Identity, Profile};

/// The sole input to one access evaluation.
///
/// One snapshot of everything the engine is allowed to look at. Identity and
/// profile load independently; while either is in flight the caller sets
/// `is_loading` instead of passing half-truths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRequest {
    pub path: String,
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub is_loading: bool,
}

impl AccessRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            identity: None,
            profile: None,
            is_loading: false,
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn loading(mut self) -> Self {
        self.is_loading = true;
        self
    }
}
