//! Student x assignment matrix assembly.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{GradingError, GradingResult};
use crate::gpa::{calculate_overall_gpa, calculate_simple_gpa};
use crate::models::{
    max_points_total, CellStatus, GradebookAssignment, GradebookCell, GradebookInput,
    GradebookMatrix, GradebookStudent, GradedItem, StatusCounts, StudentRecord, SubmissionState,
};
use crate::scale::{round2, GradeScale};

/// Classifies one cell. A grade always wins; otherwise the due date decides
/// between pending, late and missing.
pub fn classify_cell(
    assignment: &GradebookAssignment,
    state: &SubmissionState,
    now: DateTime<Utc>,
) -> GradebookCell {
    let past_due = assignment.is_past_due(now);
    match state {
        SubmissionState::Graded { score, .. } => GradebookCell::graded(assignment.id, *score),
        SubmissionState::Submitted { .. } if past_due => {
            GradebookCell::ungraded(assignment.id, CellStatus::Late)
        }
        SubmissionState::Submitted { .. } => {
            GradebookCell::ungraded(assignment.id, CellStatus::Pending)
        }
        SubmissionState::NoSubmission if past_due => {
            GradebookCell::ungraded(assignment.id, CellStatus::Missing)
        }
        SubmissionState::NoSubmission => {
            GradebookCell::ungraded(assignment.id, CellStatus::Pending)
        }
    }
}

type RecordIndex<'a> = HashMap<(Uuid, Uuid), &'a SubmissionState>;

fn index_records(input: &GradebookInput) -> GradingResult<RecordIndex<'_>> {
    let mut assignment_ids = HashSet::new();
    for assignment in &input.assignments {
        if !assignment_ids.insert(assignment.id) {
            return Err(GradingError::DuplicateAssignment {
                assignment_id: assignment.id,
            });
        }
    }

    let mut student_ids = HashSet::new();
    for student in &input.students {
        if !student_ids.insert(student.id) {
            return Err(GradingError::DuplicateStudent {
                student_id: student.id,
            });
        }
    }

    let mut index = HashMap::with_capacity(input.records.len());
    for record in &input.records {
        if !student_ids.contains(&record.student_id) {
            return Err(GradingError::UnknownStudent {
                student_id: record.student_id,
            });
        }
        if !assignment_ids.contains(&record.assignment_id) {
            return Err(GradingError::UnknownAssignment {
                student_id: record.student_id,
                assignment_id: record.assignment_id,
            });
        }
        let key = (record.student_id, record.assignment_id);
        if index.insert(key, &record.state).is_some() {
            return Err(GradingError::DuplicateRecord {
                student_id: record.student_id,
                assignment_id: record.assignment_id,
            });
        }
    }

    Ok(index)
}

fn build_student(
    student: &StudentRecord,
    assignments: &[GradebookAssignment],
    records: &RecordIndex<'_>,
    max_total: u64,
    now: DateTime<Utc>,
    scale: &GradeScale,
) -> GradebookStudent {
    let grades: Vec<GradebookCell> = assignments
        .iter()
        .map(|assignment| {
            let state = records
                .get(&(student.id, assignment.id))
                .copied()
                .unwrap_or(&SubmissionState::NoSubmission);
            classify_cell(assignment, state, now)
        })
        .collect();

    let graded_items: Vec<GradedItem> = grades
        .iter()
        .zip(assignments)
        .filter_map(|(cell, assignment)| {
            cell.score
                .map(|score| GradedItem::new(score, f64::from(assignment.max_points)))
        })
        .collect();

    let total_points: f64 = graded_items.iter().map(|item| item.points).sum();
    let percentage = if max_total > 0 {
        round2(total_points / max_total as f64 * 100.0)
    } else {
        0.0
    };

    GradebookStudent {
        id: student.id,
        name: student.name.clone(),
        email: student.email.clone(),
        grades,
        total_points,
        percentage,
        gpa: calculate_simple_gpa(&graded_items, scale),
    }
}

/// Builds the matrix for one course as of `now`. Inputs are only read.
pub fn build_matrix(
    input: &GradebookInput,
    now: DateTime<Utc>,
    scale: &GradeScale,
) -> GradingResult<GradebookMatrix> {
    let records = index_records(input)?;
    let max_total = max_points_total(&input.assignments);

    let students: Vec<GradebookStudent> = input
        .students
        .iter()
        .map(|student| build_student(student, &input.assignments, &records, max_total, now, scale))
        .collect();

    debug!(
        course = %input.course_code,
        students = students.len(),
        assignments = input.assignments.len(),
        "built gradebook matrix"
    );

    Ok(GradebookMatrix {
        students,
        assignments: input.assignments.clone(),
        course_code: input.course_code.clone(),
        course_title: input.course_title.clone(),
    })
}

impl GradebookMatrix {
    /// Checks that every student row has exactly one cell per assignment, in
    /// the order of `assignments`, and that no cell names an unknown assignment.
    pub fn check_integrity(&self) -> GradingResult<()> {
        let known: HashSet<Uuid> = self.assignments.iter().map(|a| a.id).collect();

        for student in &self.students {
            if let Some(stray) = student
                .grades
                .iter()
                .find(|cell| !known.contains(&cell.assignment_id))
            {
                return Err(GradingError::UnknownAssignment {
                    student_id: student.id,
                    assignment_id: stray.assignment_id,
                });
            }
            if student.grades.len() != self.assignments.len() {
                return Err(GradingError::RaggedRow {
                    student_id: student.id,
                    expected: self.assignments.len(),
                    found: student.grades.len(),
                });
            }
            for (column, (cell, assignment)) in
                student.grades.iter().zip(&self.assignments).enumerate()
            {
                if cell.assignment_id != assignment.id {
                    return Err(GradingError::MisorderedCell {
                        student_id: student.id,
                        column,
                        expected: assignment.id,
                        found: cell.assignment_id,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for cell in self.students.iter().flat_map(|student| &student.grades) {
            match cell.status {
                CellStatus::Graded => counts.graded += 1,
                CellStatus::Pending => counts.pending += 1,
                CellStatus::Late => counts.late += 1,
                CellStatus::Missing => counts.missing += 1,
            }
        }
        counts
    }

    /// Class-average GPA over students who have one.
    pub fn course_gpa_summary(&self) -> Option<f64> {
        let values: Vec<Option<f64>> = self.students.iter().map(|student| student.gpa).collect();
        calculate_overall_gpa(&values)
    }
}
