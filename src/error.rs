//! Error types for the grading core.
//!
//! Only integrity and configuration problems are errors here. Missing data
//! (no graded items, no GPA values, unknown letter codes) is reported as
//! `None` by the computation functions instead.

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by the grading core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GradingError {
    /// A GPA scale maximum that is zero, negative, or not finite.
    #[error("invalid GPA scale {value}: must be a finite number greater than zero")]
    InvalidScale { value: f64 },

    /// A submission record or matrix cell points at an assignment the matrix
    /// does not list.
    #[error("student {student_id} references unknown assignment {assignment_id}")]
    UnknownAssignment {
        student_id: Uuid,
        assignment_id: Uuid,
    },

    /// A submission record points at a student missing from the roster.
    #[error("record references unknown student {student_id}")]
    UnknownStudent { student_id: Uuid },

    /// The roster lists the same student twice.
    #[error("student {student_id} appears more than once in the roster")]
    DuplicateStudent { student_id: Uuid },

    /// The assignment list contains the same id twice.
    #[error("assignment {assignment_id} appears more than once")]
    DuplicateAssignment { assignment_id: Uuid },

    /// A student's row does not hold one cell per assignment.
    #[error("student {student_id} has {found} cells but the matrix lists {expected} assignments")]
    RaggedRow {
        student_id: Uuid,
        expected: usize,
        found: usize,
    },

    /// A cell sits in a column that belongs to a different assignment.
    #[error("student {student_id} column {column} holds assignment {found}, expected {expected}")]
    MisorderedCell {
        student_id: Uuid,
        column: usize,
        expected: Uuid,
        found: Uuid,
    },

    /// Two submission records exist for the same (student, assignment) pair.
    #[error("more than one record for student {student_id} on assignment {assignment_id}")]
    DuplicateRecord {
        student_id: Uuid,
        assignment_id: Uuid,
    },
}

/// Convenience result alias.
pub type GradingResult<T> = std::result::Result<T, GradingError>;
