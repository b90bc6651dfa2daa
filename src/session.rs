//! Per-client session state machine
//!
//! A session walks a strict forward order of stages: Anonymous →
//! Authenticated → LocationSelected → Ready. Each stage is a precondition
//! for the next; logout is the only transition backward and resets the
//! session completely.
//!
//! The stage is derived from which fields are populated rather than stored
//! separately, so a half-reset session (region bound, user cleared) is not
//! representable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assessment::AssessmentResult;
use crate::error::SessionError;

/// Workflow stage a session has reached.
///
/// Ordered: a capability gated at stage S is available from S and every
/// later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// No user bound.
    Anonymous,
    /// User bound via successful authentication.
    Authenticated,
    /// Region bound (both state and city non-empty).
    LocationSelected,
    /// At least one assessment recorded; re-submission stays here.
    Ready,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Anonymous => "Anonymous",
            Stage::Authenticated => "Authenticated",
            Stage::LocationSelected => "LocationSelected",
            Stage::Ready => "Ready",
        };
        write!(f, "{name}")
    }
}

/// Selected region: state and city, both non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub state: String,
    pub city: String,
}

/// One client's workflow state. Owned exclusively by the interacting
/// client; nothing here is shared across sessions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    user: Option<String>,
    region: Option<Region>,
    last_result: Option<AssessmentResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage derived from the populated fields.
    pub fn stage(&self) -> Stage {
        match (&self.user, &self.region, &self.last_result) {
            (None, _, _) => Stage::Anonymous,
            (Some(_), None, _) => Stage::Authenticated,
            (Some(_), Some(_), None) => Stage::LocationSelected,
            (Some(_), Some(_), Some(_)) => Stage::Ready,
        }
    }

    /// Fail with `PreconditionNotMet` unless the session has reached
    /// `required`.
    pub fn require(&self, required: Stage) -> Result<(), SessionError> {
        if self.stage() >= required {
            Ok(())
        } else {
            Err(SessionError::PreconditionNotMet { required })
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn last_result(&self) -> Option<&AssessmentResult> {
        self.last_result.as_ref()
    }

    /// Bind an authenticated user. Re-binding while already authenticated
    /// is allowed (a fresh login); region and last result are untouched.
    pub fn bind_user(&mut self, identifier: impl Into<String>) {
        self.user = Some(identifier.into());
    }

    /// Select or re-select a region.
    ///
    /// Requires authentication. An empty state or city is a reported
    /// failure with no state change; re-selection overwrites the region
    /// but keeps any prior assessment result.
    pub fn select_region(&mut self, state: &str, city: &str) -> Result<(), SessionError> {
        self.require(Stage::Authenticated)?;
        if state.is_empty() || city.is_empty() {
            return Err(SessionError::RegionIncomplete);
        }
        self.region = Some(Region {
            state: state.to_string(),
            city: city.to_string(),
        });
        Ok(())
    }

    /// Record an assessment result, overwriting any prior one. Moves the
    /// session to Ready on first arrival; later calls stay in Ready.
    pub(crate) fn record_result(&mut self, result: AssessmentResult) {
        self.last_result = Some(result);
    }

    /// Full reset back to Anonymous: clears user, region and last result.
    pub fn logout(&mut self) {
        *self = Session::default();
    }
}

/// Shared session store, keyed by session id.
///
/// Constructed once at process start and injected wherever sessions are
/// read or mutated; the lock serializes mutations for a given session.
pub type SessionStore = Arc<RwLock<HashMap<Uuid, Session>>>;

/// Create a new empty session store.
pub fn new_session_store() -> SessionStore {
    Arc::new(RwLock::new(HashMap::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::classify;

    #[test]
    fn test_stage_order_is_strict() {
        assert!(Stage::Anonymous < Stage::Authenticated);
        assert!(Stage::Authenticated < Stage::LocationSelected);
        assert!(Stage::LocationSelected < Stage::Ready);
    }

    #[test]
    fn test_forward_walk() {
        let mut session = Session::new();
        assert_eq!(session.stage(), Stage::Anonymous);

        session.bind_user("alice");
        assert_eq!(session.stage(), Stage::Authenticated);

        session.select_region("CA", "Springfield").unwrap();
        assert_eq!(session.stage(), Stage::LocationSelected);

        session.record_result(classify(0.5));
        assert_eq!(session.stage(), Stage::Ready);

        // Re-submission is a self-loop.
        session.record_result(classify(0.1));
        assert_eq!(session.stage(), Stage::Ready);
    }

    #[test]
    fn test_region_selection_requires_authentication() {
        let mut session = Session::new();
        let err = session.select_region("CA", "Springfield").unwrap_err();
        assert!(matches!(
            err,
            SessionError::PreconditionNotMet {
                required: Stage::Authenticated
            }
        ));
        assert_eq!(session.stage(), Stage::Anonymous);
    }

    #[test]
    fn test_empty_region_field_is_a_self_loop() {
        let mut session = Session::new();
        session.bind_user("alice");

        assert!(matches!(
            session.select_region("", "Springfield"),
            Err(SessionError::RegionIncomplete)
        ));
        assert!(matches!(
            session.select_region("CA", ""),
            Err(SessionError::RegionIncomplete)
        ));
        // No state change either way.
        assert_eq!(session.stage(), Stage::Authenticated);
        assert!(session.region().is_none());
    }

    #[test]
    fn test_region_reselection_keeps_last_result() {
        let mut session = Session::new();
        session.bind_user("alice");
        session.select_region("CA", "Springfield").unwrap();
        session.record_result(classify(0.82));

        session.select_region("NV", "Ely").unwrap();
        assert_eq!(session.stage(), Stage::Ready);
        assert_eq!(session.region().unwrap().city, "Ely");
        assert!(session.last_result().is_some());
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut session = Session::new();
        session.bind_user("alice");
        session.select_region("CA", "Springfield").unwrap();
        session.record_result(classify(0.82));

        session.logout();
        assert_eq!(session.stage(), Stage::Anonymous);
        assert!(session.user().is_none());
        assert!(session.region().is_none());
        assert!(session.last_result().is_none());

        // Everything above Anonymous is gated again.
        assert!(session.require(Stage::LocationSelected).is_err());
    }
}
