//! # Profile Repository
//!
//! Stores the mock session's [`Profile`] under the `AUTH_CONTEXT` key.
//! An absent or unreadable slot means nobody is logged in.

use ecomlite_core::{Profile, PROFILE_STORAGE_KEY};
use tracing::warn;

use crate::error::StoreResult;
use crate::slot::KeyValueSlot;

/// Persistence for the logged-in profile.
pub trait ProfileRepository: Send + Sync {
    /// Reads the stored profile, `None` when logged out.
    fn load(&self) -> Option<Profile>;

    /// Replaces the stored profile.
    fn save(&self, profile: &Profile) -> StoreResult<()>;

    /// Deletes the stored profile.
    fn clear(&self) -> StoreResult<()>;
}

/// [`ProfileRepository`] over a [`KeyValueSlot`].
#[derive(Debug, Clone)]
pub struct SlotProfileRepository<S> {
    slot: S,
}

impl<S: KeyValueSlot> SlotProfileRepository<S> {
    pub fn new(slot: S) -> Self {
        SlotProfileRepository { slot }
    }
}

impl<S: KeyValueSlot> ProfileRepository for SlotProfileRepository<S> {
    fn load(&self) -> Option<Profile> {
        let raw = match self.slot.read(PROFILE_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored profile");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| warn!(error = %e, "Stored profile is corrupt, treating as logged out"))
            .ok()
    }

    fn save(&self, profile: &Profile) -> StoreResult<()> {
        let json = serde_json::to_string(profile)?;
        self.slot.write(PROFILE_STORAGE_KEY, &json)
    }

    fn clear(&self) -> StoreResult<()> {
        self.slot.remove(PROFILE_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;

    #[test]
    fn test_profile_round_trip() {
        let repo = SlotProfileRepository::new(MemorySlot::new());
        assert_eq!(repo.load(), None);

        let profile = Profile {
            username: "rina".to_string(),
            avatar: None,
        };
        repo.save(&profile).unwrap();
        assert_eq!(repo.load(), Some(profile));

        repo.clear().unwrap();
        assert_eq!(repo.load(), None);
    }

    #[test]
    fn test_corrupt_profile_is_logged_out() {
        let slot = MemorySlot::new();
        slot.seed(PROFILE_STORAGE_KEY, "[]");
        assert_eq!(SlotProfileRepository::new(slot).load(), None);
    }
}
