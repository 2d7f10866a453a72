use serde::Serialize;
use std::fmt;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Uploading,
    Persisting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn can_advance_to(self, next: SubmissionPhase) -> bool {
        use SubmissionPhase::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Uploading)
                | (Uploading, Persisting)
                | (Persisting, Succeeded)
                | (Validating | Uploading | Persisting, Failed)
                | (Succeeded | Failed, Idle)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionPhase::Succeeded | SubmissionPhase::Failed)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::Uploading => "uploading",
            SubmissionPhase::Persisting => "persisting",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Records the phases one submission walks through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTracker {
    phase: SubmissionPhase,
    history: Vec<SubmissionPhase>,
}

impl Default for SubmissionTracker {
    fn default() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            history: Vec::new(),
        }
    }
}

impl SubmissionTracker {
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Phases entered so far, excluding the starting `Idle`.
    pub fn history(&self) -> &[SubmissionPhase] {
        &self.history
    }

    pub fn advance(&mut self, next: SubmissionPhase) -> Result<()> {
        if !self.phase.can_advance_to(next) {
            return Err(AppError::InternalError(format!(
                "Invalid submission transition from {} to {}",
                self.phase, next
            )));
        }

        tracing::debug!(from = %self.phase, to = %next, "Submission phase changed");
        self.phase = next;
        self.history.push(next);
        Ok(())
    }

    /// Moves to `Failed` unless the submission already settled.
    pub fn fail(&mut self) {
        if self.phase.can_advance_to(SubmissionPhase::Failed) {
            self.phase = SubmissionPhase::Failed;
            self.history.push(SubmissionPhase::Failed);
        }
    }
}
