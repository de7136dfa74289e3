//! Exercises embedded in a section.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::ids::{ExerciseId, SectionId};

/// Validation errors for exercise content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExerciseValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Question was blank.
    #[error("question must not be empty")]
    EmptyQuestion,
}

fn non_blank(
    raw: impl Into<String>,
    err: ExerciseValidationError,
) -> Result<String, ExerciseValidationError> {
    let value = raw.into();
    if value.trim().is_empty() {
        return Err(err);
    }
    Ok(value)
}

/// Content supplied when creating an exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDraft {
    title: String,
    question: String,
    answers: Vec<String>,
}

impl ExerciseDraft {
    /// Validate content for a new exercise.
    pub fn new(
        title: impl Into<String>,
        question: impl Into<String>,
        answers: Vec<String>,
    ) -> Result<Self, ExerciseValidationError> {
        Ok(Self {
            title: non_blank(title, ExerciseValidationError::EmptyTitle)?,
            question: non_blank(question, ExerciseValidationError::EmptyQuestion)?,
            answers,
        })
    }
}

/// Content changes for an existing exercise. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseChanges {
    title: Option<String>,
    question: Option<String>,
    answers: Option<Vec<String>>,
}

impl ExerciseChanges {
    /// Validate a partial update.
    pub fn new(
        title: Option<String>,
        question: Option<String>,
        answers: Option<Vec<String>>,
    ) -> Result<Self, ExerciseValidationError> {
        Ok(Self {
            title: title
                .map(|t| non_blank(t, ExerciseValidationError::EmptyTitle))
                .transpose()?,
            question: question
                .map(|q| non_blank(q, ExerciseValidationError::EmptyQuestion))
                .transpose()?,
            answers,
        })
    }

    /// True when no content field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.question.is_none() && self.answers.is_none()
    }
}

/// A stored exercise.
///
/// `parent_section` is fixed at creation; updates only touch content and
/// `date_updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    id: ExerciseId,
    parent_section: SectionId,
    title: String,
    question: String,
    answers: Vec<String>,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

impl Exercise {
    /// New exercise owned by `parent`, stamped with `now` twice.
    pub fn create(id: ExerciseId, parent: SectionId, draft: ExerciseDraft, now: DateTime<Utc>) -> Self {
        let ExerciseDraft {
            title,
            question,
            answers,
        } = draft;
        Self {
            id,
            parent_section: parent,
            title,
            question,
            answers,
            date_created: now,
            date_updated: now,
        }
    }

    /// Rebuild from stored columns.
    pub fn from_parts(
        id: ExerciseId,
        parent_section: SectionId,
        title: String,
        question: String,
        answers: Vec<String>,
        date_created: DateTime<Utc>,
        date_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            parent_section,
            title,
            question,
            answers,
            date_created,
            date_updated,
        }
    }

    /// Apply content changes and refresh `date_updated`.
    pub fn apply_changes(&mut self, changes: ExerciseChanges, now: DateTime<Utc>) {
        let ExerciseChanges {
            title,
            question,
            answers,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(question) = question {
            self.question = question;
        }
        if let Some(answers) = answers {
            self.answers = answers;
        }
        self.date_updated = now;
    }

    pub fn id(&self) -> &ExerciseId {
        &self.id
    }

    pub fn parent_section(&self) -> &SectionId {
        &self.parent_section
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn question(&self) -> &str {
        self.question.as_str()
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn date_updated(&self) -> DateTime<Utc> {
        self.date_updated
    }
}
