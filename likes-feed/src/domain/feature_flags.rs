//! Feature switches for staged rollout of feed behaviour.

/// Toggles consulted when building and filtering likes feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Allow listing another account's likes straight from its repository.
    pub other_profile_likes: bool,
    /// Apply the viewer's muted-reposts preference to fetched pages.
    pub mute_reposts_by_account: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            other_profile_likes: true,
            mute_reposts_by_account: true,
        }
    }
}
