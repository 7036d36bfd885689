// SPDX-License-Identifier: MIT

//! Authentication and self-service registration endpoints

use async_trait::async_trait;
use serde_json::Value;

use super::client::ApiClient;
use super::models::auth::{
    ConfirmEmailRequest, CreatedId, ForgotPasswordRequest, IdentityValidationRequest,
    IdentityValidationResponse, LoginRequest, OrgInfoRequest, PreRegisterRequest,
    RegisterRequest, ResetPasswordRequest,
};
use super::models::{GeneralResponse, LoginResponse};
use crate::error::Result;

/// Endpoints the registration wizard talks to
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn identity_validation(
        &self,
        body: &IdentityValidationRequest,
    ) -> Result<GeneralResponse<IdentityValidationResponse>>;

    async fn org_info(&self, body: &OrgInfoRequest) -> Result<GeneralResponse<CreatedId>>;

    async fn register(&self, body: &RegisterRequest) -> Result<GeneralResponse<Value>>;
}

#[async_trait]
impl RegistrationApi for ApiClient {
    async fn identity_validation(
        &self,
        body: &IdentityValidationRequest,
    ) -> Result<GeneralResponse<IdentityValidationResponse>> {
        self.post("Registration/IdentityValidation", body).await
    }

    async fn org_info(&self, body: &OrgInfoRequest) -> Result<GeneralResponse<CreatedId>> {
        self.post("Registration/organization/info", body).await
    }

    async fn register(&self, body: &RegisterRequest) -> Result<GeneralResponse<Value>> {
        self.post("Registration/Register", body).await
    }
}

impl ApiClient {
    /// Log in and store the returned tokens and roles in the session
    pub async fn login(&self, email: &str, password: &str) -> Result<GeneralResponse<LoginResponse>> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: GeneralResponse<LoginResponse> = self.post("auth/login", &body).await?;
        self.session().sign_in(&resp.data).await;
        log::info!("Signed in as {} ({:?})", resp.data.email, resp.data.roles);
        Ok(resp)
    }

    /// Server-side logout; the local session is cleared even if the call fails
    pub async fn logout(&self) -> Result<()> {
        let result: Result<Value> = self.post_empty("auth/logout").await;
        self.session().clear().await;
        result.map(|_| ())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<GeneralResponse<Value>> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post("auth/forgot-password", &body).await
    }

    pub async fn reset_password(
        &self,
        body: &ResetPasswordRequest,
    ) -> Result<GeneralResponse<Value>> {
        self.post("auth/reset-password", body).await
    }

    pub async fn confirm_email(&self, body: &ConfirmEmailRequest) -> Result<GeneralResponse<Value>> {
        self.post("auth/confirm-email", body).await
    }

    pub async fn resend_email_confirmation(&self, email: &str) -> Result<GeneralResponse<Value>> {
        let email: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
        let path = format!("auth/resend-email-confirmation?email={}", email);
        self.post_empty(&path).await
    }

    pub async fn pre_register(&self, body: &PreRegisterRequest) -> Result<GeneralResponse<CreatedId>> {
        self.post("Registration/PreRegisteration", body).await
    }

    /// Organization admins create sub-users with the same body as self registration
    pub async fn register_subuser(&self, body: &RegisterRequest) -> Result<GeneralResponse<Value>> {
        self.post("Registration/subuser", body).await
    }
}
