use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{Color, Command, Ring},
    protocol::PipelineEvent,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingPolicy {
    #[default]
    StageDerived,
    /// Bug-compat mode: reproduces the historical hard-coded rings and ignores
    /// the stage. Artifact, deployment and test events light `top`;
    /// evaluations light `bottom`.
    Legacy,
}

#[derive(Debug, Error)]
#[error("unknown ring policy '{0}', expected 'stage' or 'legacy'")]
pub struct UnknownRingPolicy(pub String);

impl FromStr for RingPolicy {
    type Err = UnknownRingPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stage" | "stage_derived" | "stage-derived" => Ok(RingPolicy::StageDerived),
            "legacy" => Ok(RingPolicy::Legacy),
            _ => Err(UnknownRingPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for RingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingPolicy::StageDerived => f.write_str("stage"),
            RingPolicy::Legacy => f.write_str("legacy"),
        }
    }
}

/// Only `PROD*` reaches the bottom ring. The stage is matched as given, so
/// leading whitespace keeps it on top.
pub fn ring_for_stage(stage: &str) -> Ring {
    let stage = stage.to_ascii_uppercase();
    if stage.starts_with("PROD") {
        Ring::Bottom
    } else {
        Ring::Top
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    policy: RingPolicy,
}

impl Translator {
    pub fn new(policy: RingPolicy) -> Self {
        Self { policy }
    }

    pub fn translate(&self, event: &PipelineEvent) -> Option<Command> {
        let command = match event {
            PipelineEvent::NewArtifact { stage } => {
                Command::whirl(self.ring(stage, Ring::Top), Color::BLUE)
            }
            PipelineEvent::DeploymentFinished { stage } => {
                Command::whirl(self.ring(stage, Ring::Top), Color::PURPLE)
            }
            PipelineEvent::TestsFinished { stage } => {
                Command::morph(self.ring(stage, Ring::Top), Color::GREEN)
            }
            PipelineEvent::EvaluationDone { stage, passed } => {
                let color = if *passed { Color::GREEN } else { Color::RED };
                Command::solid(self.ring(stage, Ring::Bottom), color)
            }
            PipelineEvent::Other { .. } => return None,
        };
        debug!(
            event = event.name(),
            ring = %command.ring,
            color = %command.color,
            policy = %self.policy,
            "translated event"
        );
        Some(command)
    }

    fn ring(&self, stage: &str, legacy: Ring) -> Ring {
        match self.policy {
            RingPolicy::StageDerived => ring_for_stage(stage),
            RingPolicy::Legacy => legacy,
        }
    }
}

pub fn translate(event: &PipelineEvent) -> Option<Command> {
    Translator::default().translate(event)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
