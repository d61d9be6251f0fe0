//! Run summary types.

/// Outcome of one migration step, for the run summary.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// Human-readable step name.
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Optional detail (counts, skip reason, error text).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed.
    Ok,
    /// Step was not needed (probing disabled, nothing to clear).
    Skipped,
    /// Step ran in dry-run mode; nothing was changed.
    DryRun,
    /// Step failed; later steps did not run.
    Failed,
}

impl StepStatus {
    const ALL: [Self; 4] = [Self::Ok, Self::Skipped, Self::DryRun, Self::Failed];

    /// Value of the `status` field on summary events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }

    /// Inverse of [`Self::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Summary marker.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }
}
