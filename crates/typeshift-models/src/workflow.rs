//! Workflow steps and their structural classification.
//!
//! Three steps are structurally significant for editing: Draft, Published
//! and Archived. They are recognized by step *name*, so renaming or
//! localizing them in the CMS makes them classify as custom steps.

use serde::{Deserialize, Serialize};

use crate::Reference;

/// A named stage a language variant can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
}

impl WorkflowStep {
    pub fn reference(&self) -> Reference {
        Reference::Id(self.id.clone())
    }

    pub fn is_addressed_by(&self, reference: &Reference) -> bool {
        reference.matches(&self.id, self.codename.as_deref())
    }
}

/// Step names that mark the structurally significant steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowNames {
    pub draft: String,
    pub published: String,
    pub archived: String,
}

impl Default for WorkflowNames {
    fn default() -> Self {
        Self {
            draft: "Draft".to_string(),
            published: "Published".to_string(),
            archived: "Archived".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowClassification {
    Draft,
    Published,
    Archived,
    /// Any other step, kept by reference so it can be restored.
    Custom(Reference),
}

impl WorkflowClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Display for WorkflowClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The project's workflow steps together with the names used to classify
/// them.
#[derive(Debug, Clone)]
pub struct WorkflowCatalog {
    steps: Vec<WorkflowStep>,
    names: WorkflowNames,
}

impl WorkflowCatalog {
    pub fn new(steps: Vec<WorkflowStep>, names: WorkflowNames) -> Self {
        Self { steps, names }
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn names(&self) -> &WorkflowNames {
        &self.names
    }

    /// First step carrying exactly this name.
    pub fn step_named(&self, name: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.name == name)
    }

    pub fn draft(&self) -> Option<&WorkflowStep> {
        self.step_named(&self.names.draft)
    }

    pub fn published(&self) -> Option<&WorkflowStep> {
        self.step_named(&self.names.published)
    }

    pub fn archived(&self) -> Option<&WorkflowStep> {
        self.step_named(&self.names.archived)
    }

    pub fn find(&self, reference: &Reference) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.is_addressed_by(reference))
    }

    /// Classify the step a variant sits in. Unknown steps are custom.
    pub fn classify(&self, reference: &Reference) -> WorkflowClassification {
        let Some(step) = self.find(reference) else {
            return WorkflowClassification::Custom(reference.clone());
        };

        if step.name == self.names.published {
            WorkflowClassification::Published
        } else if step.name == self.names.archived {
            WorkflowClassification::Archived
        } else if step.name == self.names.draft {
            WorkflowClassification::Draft
        } else {
            WorkflowClassification::Custom(reference.clone())
        }
    }
}
