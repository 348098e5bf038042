use crate::CandidateStage;

/// Ticks a toast stays visible before it expires.
pub const TOAST_TTL_TICKS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn stage_changed(candidate_name: &str, stage: CandidateStage) -> Self {
        Self::success(
            "Candidate moved",
            format!("{candidate_name} moved to {}", stage.label()),
        )
    }

    pub fn stage_change_failed(candidate_name: &str) -> Self {
        Self::error(
            "Failed to move candidate",
            format!("Could not move {candidate_name}. Please try again."),
        )
    }

    pub fn jobs_reordered(title: &str) -> Self {
        Self::success("Jobs reordered", format!("{title} moved to its new position"))
    }

    pub fn reorder_failed(message: &str) -> Self {
        Self::error(
            "Reorder failed",
            format!("{message}. The previous order has been restored."),
        )
    }

    pub fn note_added(candidate_name: &str) -> Self {
        Self::success("Note added", format!("Note added to {candidate_name}"))
    }

    pub fn note_failed(candidate_name: &str, message: &str) -> Self {
        Self::error(
            "Failed to add note",
            format!("Could not add note to {candidate_name}: {message}"),
        )
    }
}

/// A toast waiting to expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToast {
    pub id: u64,
    pub toast: Toast,
    pub remaining_ticks: u32,
}
