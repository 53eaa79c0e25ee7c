//! Page guard

use rbac_models::{Permission, SessionUser};

use crate::context::SessionState;

/// What a guarded page should do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardOutcome<'a> {
    /// Show a spinner until the session check finishes
    Loading,
    /// No session; go to the login page
    RedirectToLogin,
    /// Logged in, but a required permission is missing
    Forbidden,
    Render(&'a SessionUser),
}

/// Guard for a page that needs every permission in `required`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthGate {
    required: Vec<Permission>,
}

impl AuthGate {
    pub fn new(required: &[Permission]) -> Self {
        Self {
            required: required.to_vec(),
        }
    }

    /// A gate that only needs a session
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn required(&self) -> &[Permission] {
        &self.required
    }

    pub fn evaluate<'a>(&self, state: &'a SessionState) -> GuardOutcome<'a> {
        match state {
            SessionState::Loading => GuardOutcome::Loading,
            SessionState::Anonymous => GuardOutcome::RedirectToLogin,
            SessionState::Authenticated(user) => {
                if user.permissions.allows_all(&self.required) {
                    GuardOutcome::Render(user)
                } else {
                    tracing::debug!(
                        username = %user.username,
                        required = ?self.required,
                        "Page forbidden for session"
                    );
                    GuardOutcome::Forbidden
                }
            }
        }
    }
}
