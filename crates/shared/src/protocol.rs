use serde::{Deserialize, Serialize};

use crate::error::EventError;

pub const NEW_ARTEFACT: &str = "sh.keptn.events.new-artefact";
pub const DEPLOYMENT_FINISHED: &str = "sh.keptn.events.deployment-finished";
pub const TESTS_FINISHED: &str = "sh.keptn.events.tests-finished";
pub const EVALUATION_DONE: &str = "sh.keptn.events.evaluation-done";

/// Inbound CloudEvents envelope as posted by Keptn. Only `type`, `data.stage`
/// and `data.evaluationpassed` drive behaviour; the rest is log context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeptnEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shkeptncontext: Option<String>,
    #[serde(default)]
    pub data: Option<EnvelopeData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeData {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub evaluationpassed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl KeptnEnvelope {
    pub fn decode(bytes: &[u8]) -> Result<Self, EventError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn stage(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|data| data.stage.as_deref())
            .unwrap_or_default()
    }

    pub fn project(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.project.as_deref())
    }

    pub fn service(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.service.as_deref())
    }

    pub fn to_event(&self) -> PipelineEvent {
        let stage = self.stage().to_string();
        match self.kind.as_str() {
            NEW_ARTEFACT => PipelineEvent::NewArtifact { stage },
            DEPLOYMENT_FINISHED => PipelineEvent::DeploymentFinished { stage },
            TESTS_FINISHED => PipelineEvent::TestsFinished { stage },
            EVALUATION_DONE => PipelineEvent::EvaluationDone {
                stage,
                passed: self
                    .data
                    .as_ref()
                    .and_then(|data| data.evaluationpassed)
                    .unwrap_or(false),
            },
            other => PipelineEvent::Other {
                kind: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    NewArtifact { stage: String },
    DeploymentFinished { stage: String },
    TestsFinished { stage: String },
    EvaluationDone { stage: String, passed: bool },
    Other { kind: String },
}

impl PipelineEvent {
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineEvent::NewArtifact { stage }
            | PipelineEvent::DeploymentFinished { stage }
            | PipelineEvent::TestsFinished { stage }
            | PipelineEvent::EvaluationDone { stage, .. } => Some(stage),
            PipelineEvent::Other { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PipelineEvent::NewArtifact { .. } => "new_artifact",
            PipelineEvent::DeploymentFinished { .. } => "deployment_finished",
            PipelineEvent::TestsFinished { .. } => "tests_finished",
            PipelineEvent::EvaluationDone { .. } => "evaluation_done",
            PipelineEvent::Other { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntakeResponse {
    Dispatched { command: crate::domain::Command },
    Ignored { kind: String },
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
