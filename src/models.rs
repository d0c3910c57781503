use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scale::LetterGrade;

fn default_weight() -> Option<f64> {
    Some(1.0)
}

fn default_true() -> bool {
    true
}

/// One scored unit of work fed to the GPA calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedItem {
    pub points: f64,
    pub max_points: f64,
    #[serde(default = "default_weight")]
    pub weight: Option<f64>,
    #[serde(default = "default_true")]
    pub is_graded: bool,
}

impl GradedItem {
    pub fn new(points: f64, max_points: f64) -> Self {
        Self {
            points,
            max_points,
            weight: Some(1.0),
            is_graded: true,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn ungraded(mut self) -> Self {
        self.is_graded = false;
        self
    }

    /// Weight used by the weighted calculator; a missing weight counts as 1.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpaResult {
    pub percentage: f64,
    pub gpa: f64,
    pub letter_grade: LetterGrade,
    pub graded_count: usize,
    pub total_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookAssignment {
    pub id: Uuid,
    pub title: String,
    pub max_points: u32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl GradebookAssignment {
    /// Whether the due date is strictly before `now`. No due date never passes.
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date.map(|due| due < now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Graded,
    Pending,
    Late,
    Missing,
}

impl CellStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Graded => "graded",
            CellStatus::Pending => "pending",
            CellStatus::Late => "late",
            CellStatus::Missing => "missing",
        }
    }
}

impl std::fmt::Display for CellStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (student, assignment) cell. `score` is set only for graded cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookCell {
    pub assignment_id: Uuid,
    pub score: Option<f64>,
    pub status: CellStatus,
}

impl GradebookCell {
    pub fn graded(assignment_id: Uuid, score: f64) -> Self {
        Self {
            assignment_id,
            score: Some(score),
            status: CellStatus::Graded,
        }
    }

    pub fn ungraded(assignment_id: Uuid, status: CellStatus) -> Self {
        debug_assert!(status != CellStatus::Graded);
        Self {
            assignment_id,
            score: None,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub grades: Vec<GradebookCell>,
    pub total_points: f64,
    pub percentage: f64,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookMatrix {
    pub students: Vec<GradebookStudent>,
    pub assignments: Vec<GradebookAssignment>,
    pub course_code: String,
    pub course_title: String,
}

/// Sum of `max_points` over a list of assignments.
pub fn max_points_total(assignments: &[GradebookAssignment]) -> u64 {
    assignments
        .iter()
        .map(|assignment| u64::from(assignment.max_points))
        .sum()
}

impl GradebookMatrix {
    /// Sum of `max_points` over every assignment in the matrix.
    pub fn assignment_max_total(&self) -> u64 {
        max_points_total(&self.assignments)
    }
}

/// Per-status cell tally for a matrix legend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub graded: usize,
    pub pending: usize,
    pub late: usize,
    pub missing: usize,
}

/// Roster entry supplied by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// What the data store knows about one student's work on one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SubmissionState {
    NoSubmission,
    Submitted { at: DateTime<Utc> },
    Graded { at: DateTime<Utc>, score: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub student_id: Uuid,
    pub assignment_id: Uuid,
    #[serde(flatten)]
    pub state: SubmissionState,
}

/// Everything needed to build one course's matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookInput {
    pub course_code: String,
    pub course_title: String,
    pub assignments: Vec<GradebookAssignment>,
    pub students: Vec<StudentRecord>,
    #[serde(default)]
    pub records: Vec<SubmissionRecord>,
}
