//! Workflow transition orchestration.
//!
//! Published and archived variants cannot be edited in place. Each pending
//! variant therefore runs a fixed pipeline: a precondition step that makes it
//! editable, the field upsert, and a postcondition step that puts it back in
//! the workflow classification it started in.
//!
//! | Original  | Pipeline                                             |
//! |-----------|------------------------------------------------------|
//! | Published | create new version, upsert, publish                  |
//! | Archived  | change step to Draft, upsert, change step to original |
//! | Draft     | upsert, change step to original                      |
//! | Custom    | upsert, change step to original                      |
//!
//! Variants are processed one at a time and every step is awaited before the
//! next one starts. The first failure aborts the request. Nothing is rolled
//! back: variants transitioned before the failure stay where they are, and
//! the new item stays created.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{
    LanguageVariant, Reference, WorkflowCatalog, WorkflowClassification, WorkflowNames,
    WorkflowStep,
};
use crate::services::{ContentRepository, UsageTracker};

/// One remote operation in a variant's transition pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionStep {
    CreateNewVersion,
    ChangeStep(Reference),
    Upsert,
    Publish,
}

impl TransitionStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateNewVersion => "create-new-version",
            Self::ChangeStep(_) => "change-step",
            Self::Upsert => "upsert",
            Self::Publish => "publish",
        }
    }
}

/// Pipeline for a variant currently in `original` with the given
/// classification.
pub fn transition_plan(
    classification: &WorkflowClassification,
    original: &Reference,
    draft: &Reference,
) -> Vec<TransitionStep> {
    match classification {
        WorkflowClassification::Published => vec![
            TransitionStep::CreateNewVersion,
            TransitionStep::Upsert,
            TransitionStep::Publish,
        ],
        WorkflowClassification::Archived => vec![
            TransitionStep::ChangeStep(draft.clone()),
            TransitionStep::Upsert,
            TransitionStep::ChangeStep(original.clone()),
        ],
        WorkflowClassification::Draft | WorkflowClassification::Custom(_) => vec![
            TransitionStep::Upsert,
            TransitionStep::ChangeStep(original.clone()),
        ],
    }
}

/// The project's workflow with the Draft, Published and Archived steps
/// located.
#[derive(Debug, Clone)]
pub struct ResolvedWorkflow {
    catalog: WorkflowCatalog,
    draft: WorkflowStep,
    published: WorkflowStep,
}

impl ResolvedWorkflow {
    /// Locate the significant steps by name. Missing any of them is
    /// `NotFound`, raised before the migration mutates anything.
    pub fn resolve(steps: Vec<WorkflowStep>, names: &WorkflowNames) -> Result<Self> {
        let catalog = WorkflowCatalog::new(steps, names.clone());

        let lookup = |step: Option<&WorkflowStep>, name: &str| {
            step.cloned().ok_or_else(|| {
                Error::NotFound(format!("Workflow step named '{}' does not exist", name))
            })
        };

        let draft = lookup(catalog.draft(), &names.draft)?;
        let published = lookup(catalog.published(), &names.published)?;
        lookup(catalog.archived(), &names.archived)?;

        Ok(Self {
            catalog,
            draft,
            published,
        })
    }

    pub fn classify(&self, step: &Reference) -> WorkflowClassification {
        self.catalog.classify(step)
    }

    pub fn plan(&self, variant: &LanguageVariant) -> Vec<TransitionStep> {
        transition_plan(
            &self.classify(&variant.workflow_step),
            &variant.workflow_step,
            &self.draft.reference(),
        )
    }

    /// Step a variant ends in once its pipeline has run.
    pub fn final_step(&self, variant: &LanguageVariant) -> Reference {
        match self.classify(&variant.workflow_step) {
            WorkflowClassification::Published => self.published.reference(),
            _ => variant.workflow_step.clone(),
        }
    }
}

/// Runs transition pipelines against a repository for one request.
pub struct WorkflowOrchestrator<'a> {
    repo: &'a dyn ContentRepository,
    ctx: &'a UsageTracker,
    workflow: &'a ResolvedWorkflow,
}

impl<'a> WorkflowOrchestrator<'a> {
    pub fn new(
        repo: &'a dyn ContentRepository,
        ctx: &'a UsageTracker,
        workflow: &'a ResolvedWorkflow,
    ) -> Self {
        Self {
            repo,
            ctx,
            workflow,
        }
    }

    /// Transition every pending variant in order, stopping at the first
    /// failure.
    pub async fn transition_all(&self, variants: &[LanguageVariant]) -> Result<Vec<LanguageVariant>> {
        let mut done = Vec::with_capacity(variants.len());

        for variant in variants {
            match self.transition(variant).await {
                Ok(updated) => done.push(updated),
                Err(e) => {
                    warn!(
                        language = %variant.language,
                        completed = done.len(),
                        remaining = variants.len() - done.len(),
                        error = %e,
                        "Migration aborted mid-sequence; completed variants are not rolled back"
                    );
                    return Err(e);
                }
            }
        }

        Ok(done)
    }

    /// Run one variant's pipeline.
    ///
    /// Returns the variant as written by the upsert, reporting the workflow
    /// step the pipeline left it in.
    pub async fn transition(&self, variant: &LanguageVariant) -> Result<LanguageVariant> {
        let classification = self.workflow.classify(&variant.workflow_step);
        let plan = self.workflow.plan(variant);
        let (item, language) = (&variant.item, &variant.language);

        info!(
            item = %item,
            language = %language,
            classification = %classification,
            steps = plan.len(),
            "Transitioning variant"
        );

        let mut written = None;
        for step in &plan {
            debug!(language = %language, step = step.name(), "Workflow step");
            match step {
                TransitionStep::CreateNewVersion => {
                    self.repo.create_new_version(self.ctx, item, language).await?
                }
                TransitionStep::ChangeStep(target) => {
                    self.repo
                        .change_workflow_step(self.ctx, item, language, target)
                        .await?
                }
                TransitionStep::Upsert => {
                    written = Some(
                        self.repo
                            .upsert_variant(self.ctx, item, language, &variant.elements)
                            .await?,
                    );
                }
                TransitionStep::Publish => self.repo.publish(self.ctx, item, language).await?,
            }
        }

        let mut written = written.ok_or_else(|| {
            Error::Internal("Transition pipeline did not write the variant".to_string())
        })?;
        written.workflow_step = self.workflow.final_step(variant);
        Ok(written)
    }
}
