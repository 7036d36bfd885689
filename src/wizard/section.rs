// SPDX-License-Identifier: MIT

//! Study-creation steps: one editable section form per stage

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::flow::Flow;
use super::notify::Notifier;
use super::orchestrator::Wizard;
use super::step::{StepFactory, StepResult, WizardStep};
use super::terminal::Terminal;
use crate::api::models::{Section, StudyInitialData};
use crate::api::{Attachment, StudyApi};
use crate::error::{PortalError, Result};
use crate::forms::validation::ValidationErrors;
use crate::forms::{
    apply_change, section_from_draft, section_payload, CollaborationsForm, CroForm,
    EligibilityForm, EthicalApprovalForm, FundersForm, PlainSummaryForm, SectionForm,
    SharingStatementForm, SiteInformationForm, SponsorsForm, StudyBriefForm,
    StudyInformationForm,
};

pub const DRAFT_SAVED: &str = "Draft saved";

/// Identifiers handed out by `Study/Initiate`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyContext {
    pub study_id: String,
    pub record_number: String,
    pub registration_number: String,
    pub registration_date: String,
}

impl StudyContext {
    /// Resume an existing draft
    pub fn existing(study_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            ..Self::default()
        }
    }
}

impl From<StudyInitialData> for StudyContext {
    fn from(data: StudyInitialData) -> Self {
        Self {
            study_id: data.study_id,
            record_number: data.record_number,
            registration_number: data.registration_number,
            registration_date: data.registration_date,
        }
    }
}

pub struct SectionStep<F: SectionForm> {
    api: Arc<dyn StudyApi>,
    study_id: String,
    form: F,
    finalize: bool,
    exit_route: String,
}

impl<F: SectionForm> SectionStep<F> {
    /// `finalize` makes a successful submit also submit the whole study
    pub fn new(api: Arc<dyn StudyApi>, study_id: &str, finalize: bool, exit_route: &str) -> Self {
        Self {
            api,
            study_id: study_id.to_string(),
            form: F::default(),
            finalize,
            exit_route: exit_route.to_string(),
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    fn require_study(&self) -> Result<String> {
        if self.study_id.trim().is_empty() {
            return Err(PortalError::MissingStudyId);
        }
        Ok(self.study_id.clone())
    }
}

#[async_trait]
impl<F: SectionForm> WizardStep<Section> for SectionStep<F> {
    fn stage(&self) -> Section {
        F::SECTION
    }

    async fn load(&mut self) -> Result<()> {
        let study_id = self.require_study()?;
        let resp = self.api.get_section(F::SECTION, &study_id).await?;
        self.form = section_from_draft(resp.data)?;
        log::debug!("Loaded {} for study {}", F::SECTION, study_id);
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
        let study_id = self.require_study()?;
        let payload = section_payload(&self.form, &study_id, true)?;
        let resp = self.api.save_section(F::SECTION, payload).await?;
        Ok(resp.message_or(DRAFT_SAVED))
    }

    async fn submit(&mut self) -> Result<StepResult> {
        self.form.validate()?;
        let study_id = self.require_study()?;

        let payload = section_payload(&self.form, &study_id, false)?;
        let resp = self.api.save_section(F::SECTION, payload).await?;

        if let Some(path) = self.form.pending_upload().map(str::to_string) {
            let attachment = Attachment::from_path(&path)?;
            self.api
                .upload_ethical_attachment(&study_id, &attachment)
                .await?;
            log::info!("Uploaded {} for study {}", attachment.file_name, study_id);
        }

        if !self.finalize {
            return Ok(StepResult::Saved(resp.message));
        }

        self.api.submit(&study_id).await?;
        log::info!("Study {} submitted", study_id);
        Ok(StepResult::Finished {
            message: resp.message,
            terminal: Terminal::submitted(&self.exit_route),
        })
    }
}

pub struct StudyStepFactory {
    api: Arc<dyn StudyApi>,
    context: StudyContext,
    exit_route: String,
}

impl StudyStepFactory {
    pub fn new(api: Arc<dyn StudyApi>, context: StudyContext, exit_route: &str) -> Self {
        Self {
            api,
            context,
            exit_route: exit_route.to_string(),
        }
    }

    fn step<F: SectionForm>(&self, is_last: bool) -> Box<dyn WizardStep<Section>> {
        Box::new(SectionStep::<F>::new(
            self.api.clone(),
            &self.context.study_id,
            is_last,
            &self.exit_route,
        ))
    }
}

impl StepFactory<Section> for StudyStepFactory {
    fn build(&self, stage: Section, is_last: bool) -> Box<dyn WizardStep<Section>> {
        match stage {
            Section::StudyBrief => self.step::<StudyBriefForm>(is_last),
            Section::PlainSummary => self.step::<PlainSummaryForm>(is_last),
            Section::SiteInformation => self.step::<SiteInformationForm>(is_last),
            Section::EthicalApproval => self.step::<EthicalApprovalForm>(is_last),
            Section::StudyInformation => self.step::<StudyInformationForm>(is_last),
            Section::Eligibility => self.step::<EligibilityForm>(is_last),
            Section::Sponsors => self.step::<SponsorsForm>(is_last),
            Section::Cro => self.step::<CroForm>(is_last),
            Section::Collaborations => self.step::<CollaborationsForm>(is_last),
            Section::Funders => self.step::<FundersForm>(is_last),
            Section::SharingStatement => self.step::<SharingStatementForm>(is_last),
        }
    }
}

/// `Study/Initiate`; a response without a study id is unusable
pub async fn initiate_study(api: &dyn StudyApi) -> Result<StudyContext> {
    let resp = api.initiate().await?;
    if resp.data.study_id.trim().is_empty() {
        return Err(PortalError::MissingStudyId);
    }
    log::info!(
        "Initiated study {} (record {})",
        resp.data.study_id,
        resp.data.record_number
    );
    Ok(resp.data.into())
}

/// Study-creation wizard for an initiated (or resumed) study
pub fn study_wizard(
    api: Arc<dyn StudyApi>,
    context: StudyContext,
    notifier: Arc<dyn Notifier>,
) -> Wizard<Section> {
    let flow = Flow::study_creation();
    let factory = StudyStepFactory::new(api, context, flow.exit_route());
    Wizard::new(flow, factory, notifier)
}
