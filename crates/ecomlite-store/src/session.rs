//! # Mock Session
//!
//! Simulated login. There is no backend: logging in validates the form,
//! stores a [`Profile`] under `AUTH_CONTEXT`, and that is all.
//!
//! ## Session States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────────┐   login(username, password ≥ 6)   ┌─────────────┐     │
//! │   │ Logged out │ ─────────────────────────────────►│  Logged in  │     │
//! │   │ (no slot)  │◄───────────────────────────────── │  (profile)  │     │
//! │   └────────────┘             logout()              └─────────────┘     │
//! │                                                        │    ▲          │
//! │                                                        └────┘          │
//! │                                                   update_profile()     │
//! │                                                                         │
//! │  The password is checked for length and then dropped.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use ecomlite_core::validation::{validate_password, validate_username};
use ecomlite_core::{Profile, ProfilePatch};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::profile::ProfileRepository;

/// The login form.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginRequest {
            username: username.into(),
            password: password.into(),
            avatar: None,
        }
    }
}

/// The mock session.
pub struct MockSession {
    profile: Mutex<Option<Profile>>,
    repository: Box<dyn ProfileRepository>,
}

impl MockSession {
    /// Restores the session saved by a previous run, if any.
    pub fn open(repository: impl ProfileRepository + 'static) -> Self {
        let profile = repository.load();
        if let Some(profile) = &profile {
            info!(username = %profile.username, "Session restored");
        }

        MockSession {
            profile: Mutex::new(profile),
            repository: Box::new(repository),
        }
    }

    /// Validates the form and stores the profile.
    ///
    /// ## Errors
    /// - `StoreError::Validation` for a blank username or a password shorter
    ///   than six characters
    /// - Any error from saving the profile
    pub fn login(&self, request: LoginRequest) -> StoreResult<Profile> {
        validate_username(&request.username)?;
        validate_password(&request.password)?;

        let profile = Profile {
            username: request.username.trim().to_string(),
            avatar: request.avatar.filter(|a| !a.trim().is_empty()),
        };

        let mut current = self.lock();
        self.repository.save(&profile)?;
        *current = Some(profile.clone());

        info!(username = %profile.username, "Logged in");
        Ok(profile)
    }

    /// Forgets the profile. Logging out twice is fine.
    pub fn logout(&self) -> StoreResult<()> {
        let mut current = self.lock();
        self.repository.clear()?;
        if let Some(profile) = current.take() {
            info!(username = %profile.username, "Logged out");
        }
        Ok(())
    }

    /// Merges `patch` into the logged-in profile.
    ///
    /// Returns `None` and stores nothing when nobody is logged in.
    ///
    /// ## Errors
    /// - `StoreError::Validation` when the patch blanks the username
    pub fn update_profile(&self, patch: ProfilePatch) -> StoreResult<Option<Profile>> {
        if let Some(username) = &patch.username {
            validate_username(username)?;
        }

        let mut current = self.lock();
        let Some(profile) = current.clone() else {
            debug!("Profile update ignored, not logged in");
            return Ok(None);
        };
        let profile = profile.merged(patch);

        self.repository.save(&profile)?;
        *current = Some(profile.clone());

        info!(username = %profile.username, "Profile updated");
        Ok(Some(profile))
    }

    /// The logged-in profile, if any.
    pub fn profile(&self) -> Option<Profile> {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// The profile, or `NotAuthenticated`.
    pub fn require_login(&self) -> StoreResult<Profile> {
        self.profile().ok_or(StoreError::NotAuthenticated)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Profile>> {
        self.profile.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
