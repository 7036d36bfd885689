// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{LoginResponse, UserRole};

/// Signed-in user details kept next to the tokens
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub user_type: i64,
    pub roles: Vec<UserRole>,
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    token: Option<String>,
    refresh_token: Option<String>,
    user: Option<SessionUser>,
}

/// Auth state shared by the HTTP client and its callers
#[derive(Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session resumed from stored tokens, user unknown until the next login
    pub fn with_tokens(token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                token,
                refresh_token,
                user: None,
            })),
        }
    }

    pub async fn sign_in(&self, login: &LoginResponse) {
        let mut state = self.state.write().await;
        state.token = Some(login.token.clone());
        state.refresh_token = Some(login.refresh_token.clone());
        state.user = Some(SessionUser {
            id: login.id.clone(),
            email: login.email.clone(),
            user_name: login.user_name.clone(),
            user_type: login.user_type,
            roles: login.roles.clone(),
        });
    }

    pub async fn set_tokens(&self, token: String, refresh_token: String) {
        let mut state = self.state.write().await;
        state.token = Some(token);
        state.refresh_token = Some(refresh_token);
    }

    /// Drop tokens and user; used by logout and failed refresh
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = SessionState::default();
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    pub async fn set_roles(&self, roles: Vec<UserRole>) {
        let mut state = self.state.write().await;
        state.user.get_or_insert_with(SessionUser::default).roles = roles;
    }

    pub async fn roles(&self) -> Vec<UserRole> {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .map(|u| u.roles.clone())
            .unwrap_or_default()
    }

    pub async fn has_role(&self, role: UserRole) -> bool {
        self.roles().await.contains(&role)
    }

    pub async fn has_any_role(&self, roles: &[UserRole]) -> bool {
        let held = self.roles().await;
        roles.iter().any(|r| held.contains(r))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }
}
