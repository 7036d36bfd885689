// SPDX-License-Identifier: MIT

//! Self-service registration
//!
//! The user first picks a registration type; that choice fixes the ordered
//! stage list. Organization registration adds one leading stage that
//! creates a temporary organization record. All stages share a single
//! [`RegistrationDraft`] so that identity data and the organization id flow
//! into the final `Registration/Register` call.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::flow::{Flow, Stage};
use super::notify::Notifier;
use super::orchestrator::Wizard;
use super::step::{LoadOutcome, StepFactory, StepResult, WizardStep};
use super::terminal::Terminal;
use super::transition::{RefetchPolicy, Transition};
use crate::api::models::auth::IdentityValidationResponse;
use crate::api::models::UserType;
use crate::api::RegistrationApi;
use crate::error::{NavigationError, PortalError, Result};
use crate::forms::registration::{AccountForm, IdentityForm, OrganizationDetailsForm};
use crate::forms::validation::ValidationErrors;
use crate::forms::{apply_change, Form};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationUserType {
    Individual,
    Organization,
}

impl RegistrationUserType {
    /// Account type sent with `Registration/Register`
    pub fn user_type(&self) -> UserType {
        match self {
            RegistrationUserType::Individual => UserType::Individual,
            RegistrationUserType::Organization => UserType::OrgAdmin,
        }
    }
}

impl fmt::Display for RegistrationUserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationUserType::Individual => f.write_str("individual"),
            RegistrationUserType::Organization => f.write_str("organization"),
        }
    }
}

impl FromStr for RegistrationUserType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" | "1" => Ok(RegistrationUserType::Individual),
            "organization" | "org" | "2" => Ok(RegistrationUserType::Organization),
            other => Err(PortalError::other(format!(
                "Unknown registration type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStage {
    OrganizationDetails,
    VerifyIdentity,
    PersonalDetails,
    CreateAccount,
}

impl Stage for RegistrationStage {
    fn key(&self) -> &'static str {
        match self {
            RegistrationStage::OrganizationDetails => "organization_details",
            RegistrationStage::VerifyIdentity => "verify_identity",
            RegistrationStage::PersonalDetails => "personal_details",
            RegistrationStage::CreateAccount => "create_account",
        }
    }
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RegistrationStage::OrganizationDetails => "Org details",
            RegistrationStage::VerifyIdentity => "Verify identity",
            RegistrationStage::PersonalDetails => "Personal details",
            RegistrationStage::CreateAccount => "Create account",
        };
        f.write_str(label)
    }
}

impl FromStr for RegistrationStage {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        [
            RegistrationStage::OrganizationDetails,
            RegistrationStage::VerifyIdentity,
            RegistrationStage::PersonalDetails,
            RegistrationStage::CreateAccount,
        ]
        .into_iter()
        .find(|stage| stage.key() == s.trim())
        .ok_or_else(|| PortalError::other(format!("Unknown registration stage: {}", s)))
    }
}

impl Flow<RegistrationStage> {
    pub fn registration(user_type: RegistrationUserType) -> Self {
        let mut stages = vec![
            RegistrationStage::VerifyIdentity,
            RegistrationStage::PersonalDetails,
            RegistrationStage::CreateAccount,
        ];
        if user_type == RegistrationUserType::Organization {
            stages.insert(0, RegistrationStage::OrganizationDetails);
        }
        Flow::new(
            format!("registration-{}", user_type),
            stages,
            RefetchPolicy::Never,
            "/otp",
        )
    }
}

/// State carried across registration stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub organization: OrganizationDetailsForm,
    pub organization_id: Option<String>,
    pub identity: Option<IdentityValidationResponse>,
    pub account: AccountForm,
}

pub type SharedDraft = Arc<Mutex<RegistrationDraft>>;

fn no_drafts(stage: RegistrationStage) -> PortalError {
    NavigationError::DraftsUnsupported(stage.key().to_string()).into()
}

// --- Organization details ---

pub struct OrganizationDetailsStep {
    api: Arc<dyn RegistrationApi>,
    draft: SharedDraft,
    form: OrganizationDetailsForm,
}

#[async_trait]
impl WizardStep<RegistrationStage> for OrganizationDetailsStep {
    fn stage(&self) -> RegistrationStage {
        RegistrationStage::OrganizationDetails
    }

    async fn enter(&mut self, _transition: &Transition<RegistrationStage>) -> Result<()> {
        self.form = self.draft.lock().await.organization.clone();
        Ok(())
    }

    async fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn values(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.form)?)
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<bool> {
        apply_change(&mut self.form, field, value)
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.form.validate()
    }

    async fn save_draft(&mut self) -> Result<String> {
        Err(no_drafts(self.stage()))
    }

    async fn submit(&mut self) -> Result<StepResult> {
        self.form.validate()?;
        let resp = self.api.org_info(&self.form.to_request()).await?;
        log::info!("Temporary organization {} created", resp.data.id);
        let mut draft = self.draft.lock().await;
        draft.organization = self.form.clone();
        draft.organization_id = Some(resp.data.id).filter(|id| !id.is_empty());
        draft.account.organization_id = draft.organization_id.clone();
        Ok(StepResult::Saved(resp.message))
    }
}

// --- Identity verification ---

pub struct VerifyIdentityStep {
    api: Arc<dyn RegistrationApi>,
    draft: SharedDraft,
    form: IdentityForm,
}

#[async_trait]
impl WizardStep<RegistrationStage> for VerifyIdentityStep {
    fn stage(&self) -> RegistrationStage {
        RegistrationStage::VerifyIdentity
    }

    async fn enter(&mut self, _transition: &Transition<RegistrationStage>) -> Result<()> {
        let draft = self.draft.lock().await;
        self.form.id_number = draft.account.id_number.clone();
        self.form.dateofbirth = draft.account.dob;
        Ok(())
    }

    async fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn values(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.form)?)
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<bool> {
        apply_change(&mut self.form, field, value)
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.form.validate()
    }

    async fn save_draft(&mut self) -> Result<String> {
        Err(no_drafts(self.stage()))
    }

    async fn submit(&mut self) -> Result<StepResult> {
        self.form.validate()?;
        let resp = self.api.identity_validation(&self.form.to_request()).await?;

        let mut draft = self.draft.lock().await;
        draft.account.id_number = self.form.id_number.clone();
        draft.account.dob = self.form.dateofbirth;
        draft.account.prefill_identity(&resp.data);
        draft.identity = Some(resp.data);
        Ok(StepResult::Saved(resp.message))
    }
}

// --- Personal details (two sub-steps) ---

pub struct PersonalDetailsStep {
    draft: SharedDraft,
    form: AccountForm,
    sub_step: u8,
}

impl PersonalDetailsStep {
    pub fn sub_step(&self) -> u8 {
        self.sub_step
    }
}

#[async_trait]
impl WizardStep<RegistrationStage> for PersonalDetailsStep {
    fn stage(&self) -> RegistrationStage {
        RegistrationStage::PersonalDetails
    }

    async fn enter(&mut self, _transition: &Transition<RegistrationStage>) -> Result<()> {
        self.form = self.draft.lock().await.account.clone();
        self.sub_step = 1;
        Ok(())
    }

    async fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn values(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.form)?)
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<bool> {
        apply_change(&mut self.form, field, value)
    }

    /// Names first, then address, job and contact details
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        if self.sub_step == 1 {
            self.form.validate_names().into_result()
        } else {
            self.form.validate_details().into_result()
        }
    }

    async fn save_draft(&mut self) -> Result<String> {
        Err(no_drafts(self.stage()))
    }

    async fn submit(&mut self) -> Result<StepResult> {
        self.validate()?;
        self.draft.lock().await.account = self.form.clone();
        if self.sub_step == 1 {
            self.sub_step = 2;
            return Ok(StepResult::Continued);
        }
        Ok(StepResult::Saved(String::new()))
    }
}

// --- Account creation ---

pub struct CreateAccountStep {
    api: Arc<dyn RegistrationApi>,
    draft: SharedDraft,
    form: AccountForm,
}

#[async_trait]
impl WizardStep<RegistrationStage> for CreateAccountStep {
    fn stage(&self) -> RegistrationStage {
        RegistrationStage::CreateAccount
    }

    async fn enter(&mut self, _transition: &Transition<RegistrationStage>) -> Result<()> {
        self.form = self.draft.lock().await.account.clone();
        Ok(())
    }

    async fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn values(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.form)?)
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<bool> {
        apply_change(&mut self.form, field, value)
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.form.validate()
    }

    async fn save_draft(&mut self) -> Result<String> {
        Err(no_drafts(self.stage()))
    }

    async fn submit(&mut self) -> Result<StepResult> {
        self.form.validate()?;
        self.draft.lock().await.account = self.form.clone();

        let resp = self.api.register(&self.form.to_request()).await?;
        let email = self.form.email.trim();
        log::info!("Registered {}", email);
        Ok(StepResult::Finished {
            message: resp.message,
            terminal: Terminal::registered(email),
        })
    }
}

pub struct RegistrationStepFactory {
    api: Arc<dyn RegistrationApi>,
    draft: SharedDraft,
}

impl RegistrationStepFactory {
    pub fn new(api: Arc<dyn RegistrationApi>, draft: SharedDraft) -> Self {
        Self { api, draft }
    }
}

impl StepFactory<RegistrationStage> for RegistrationStepFactory {
    fn build(&self, stage: RegistrationStage, _is_last: bool) -> Box<dyn WizardStep<RegistrationStage>> {
        match stage {
            RegistrationStage::OrganizationDetails => Box::new(OrganizationDetailsStep {
                api: self.api.clone(),
                draft: self.draft.clone(),
                form: OrganizationDetailsForm::default(),
            }),
            RegistrationStage::VerifyIdentity => Box::new(VerifyIdentityStep {
                api: self.api.clone(),
                draft: self.draft.clone(),
                form: IdentityForm::default(),
            }),
            RegistrationStage::PersonalDetails => Box::new(PersonalDetailsStep {
                draft: self.draft.clone(),
                form: AccountForm::default(),
                sub_step: 1,
            }),
            RegistrationStage::CreateAccount => Box::new(CreateAccountStep {
                api: self.api.clone(),
                draft: self.draft.clone(),
                form: AccountForm::default(),
            }),
        }
    }
}

/// Registration entry point: type selection, then the chosen flow
pub struct RegistrationWizard {
    api: Arc<dyn RegistrationApi>,
    notifier: Arc<dyn Notifier>,
    draft: SharedDraft,
    selected: Option<RegistrationUserType>,
    wizard: Option<Wizard<RegistrationStage>>,
}

impl RegistrationWizard {
    pub fn new(api: Arc<dyn RegistrationApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            draft: Arc::new(Mutex::new(RegistrationDraft::default())),
            selected: None,
            wizard: None,
        }
    }

    pub fn user_type(&self) -> Option<RegistrationUserType> {
        self.selected
    }

    /// Fix the registration type and mount the first stage
    pub async fn select(&mut self, user_type: RegistrationUserType) -> Result<LoadOutcome> {
        if self.selected.is_some() {
            return Err(NavigationError::FlowAlreadySelected.into());
        }
        log::info!("Registration type selected: {}", user_type);

        {
            let mut draft = self.draft.lock().await;
            *draft = RegistrationDraft::default();
            draft.account.user_type = Some(user_type.user_type().code());
        }

        let factory = RegistrationStepFactory::new(self.api.clone(), self.draft.clone());
        let mut wizard = Wizard::new(
            Flow::registration(user_type),
            factory,
            self.notifier.clone(),
        );
        let outcome = wizard.start().await?;
        self.selected = Some(user_type);
        self.wizard = Some(wizard);
        Ok(outcome)
    }

    pub fn wizard(&self) -> Result<&Wizard<RegistrationStage>> {
        self.wizard
            .as_ref()
            .ok_or_else(|| NavigationError::NoFlowSelected.into())
    }

    pub fn wizard_mut(&mut self) -> Result<&mut Wizard<RegistrationStage>> {
        self.wizard
            .as_mut()
            .ok_or_else(|| NavigationError::NoFlowSelected.into())
    }

    pub async fn draft(&self) -> RegistrationDraft {
        self.draft.lock().await.clone()
    }
}
