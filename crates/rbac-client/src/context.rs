//! Session state shared by every page

use rbac_models::{Permission, SessionUser};

use crate::api::{ApiClient, ClientError, ClientResult};

/// Where the session stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// The session has not been checked yet
    #[default]
    Loading,
    Anonymous,
    Authenticated(SessionUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// Membership of `permission` in the session's permission list.
    /// Always false without a session.
    pub fn can(&self, permission: Permission) -> bool {
        self.user().is_some_and(|u| u.can(permission))
    }
}

/// The client plus the session it belongs to
#[derive(Debug, Clone)]
pub struct AuthContext {
    client: ApiClient,
    state: SessionState,
}

impl AuthContext {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.state.user()
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.state.can(permission)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Ask the server who we are. Any failure ends as `Anonymous` and
    /// drops the stored token.
    pub async fn refresh(&mut self) -> &SessionState {
        self.state = match self.client.check().await {
            Ok(user) => SessionState::Authenticated(user),
            Err(e) => {
                tracing::debug!(error = %e, "Session check failed");
                self.client.clear_token();
                SessionState::Anonymous
            }
        };
        &self.state
    }

    /// Log in and load the session
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<SessionUser> {
        if let Err(e) = self.client.login(username, password).await {
            self.state = SessionState::Anonymous;
            return Err(e);
        }

        self.refresh().await;
        match self.state.user() {
            Some(user) => Ok(user.clone()),
            None => Err(ClientError::Api {
                status: 401,
                message: "Session could not be established".to_string(),
            }),
        }
    }

    /// Log out. The local session ends even if the server call fails.
    pub async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            tracing::warn!(error = %e, "Logout request failed");
        }
        self.state = SessionState::Anonymous;
    }
}
