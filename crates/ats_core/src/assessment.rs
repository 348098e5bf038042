//! Assessment trees: an assessment owns ordered sections, each section owns
//! ordered questions. Trees are only ever replaced whole on save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AssessmentId, JobId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub job_id: JobId,
    pub title: String,
    pub description: String,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }

    /// Conditions must point at an earlier question in document order.
    pub fn dangling_conditions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut dangling = Vec::new();
        for question in self.questions() {
            if let Some(condition) = &question.show_if {
                if !seen.contains(&condition.question_id.as_str()) {
                    dangling.push(question.id.as_str());
                }
            }
            seen.push(question.id.as_str());
        }
        dangling
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }
}

/// Shows a question only when an earlier answer equals `equals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub question_id: String,
    pub equals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub description: Option<String>,
    pub required: bool,
    pub show_if: Option<Condition>,
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            description: None,
            required: false,
            show_if: None,
            kind,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn shown_if(mut self, question_id: impl Into<String>, equals: impl Into<String>) -> Self {
        self.show_if = Some(Condition {
            question_id: question_id.into(),
            equals: equals.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice { options: Vec<String> },
    MultiChoice { options: Vec<String> },
    ShortText { max_length: Option<u32> },
    LongText { max_length: Option<u32> },
    Numeric { min: Option<f64>, max: Option<f64> },
    FileUpload { accepted_types: Vec<String>, max_size_mb: Option<u32> },
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "Single choice",
            QuestionKind::MultiChoice { .. } => "Multiple choice",
            QuestionKind::ShortText { .. } => "Short text",
            QuestionKind::LongText { .. } => "Long text",
            QuestionKind::Numeric { .. } => "Numeric",
            QuestionKind::FileUpload { .. } => "File upload",
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                options
            }
            _ => &[],
        }
    }
}
