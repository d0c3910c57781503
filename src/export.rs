//! Gradebook CSV export.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::GradingResult;
use crate::models::{GradebookMatrix, GradebookStudent};

const BOM: char = '\u{FEFF}';
const FIXED_COLUMNS: usize = 5;
const BYTES_PER_CELL: usize = 10;

/// A value headed for a CSV field.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvField {
    Absent,
    Number(f64),
    Text(String),
}

impl From<&str> for CsvField {
    fn from(value: &str) -> Self {
        CsvField::Text(value.to_string())
    }
}

impl From<String> for CsvField {
    fn from(value: String) -> Self {
        CsvField::Text(value)
    }
}

impl From<f64> for CsvField {
    fn from(value: f64) -> Self {
        CsvField::Number(value)
    }
}

impl From<u32> for CsvField {
    fn from(value: u32) -> Self {
        CsvField::Number(f64::from(value))
    }
}

impl<T: Into<CsvField>> From<Option<T>> for CsvField {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CsvField::Absent)
    }
}

/// Renders one field. Absent values become `N/A`; text containing a comma,
/// quote, or line break is quoted with inner quotes doubled.
pub fn escape_csv(value: impl Into<CsvField>) -> String {
    match value.into() {
        CsvField::Absent => "N/A".to_string(),
        CsvField::Number(n) => n.to_string(),
        CsvField::Text(s) => {
            if s.contains(&[',', '"', '\n', '\r'][..]) {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s
            }
        }
    }
}

fn join_row(fields: Vec<CsvField>) -> String {
    fields
        .into_iter()
        .map(escape_csv)
        .collect::<Vec<_>>()
        .join(",")
}

fn header_row(matrix: &GradebookMatrix) -> Vec<CsvField> {
    let mut fields: Vec<CsvField> = vec!["Student Name".into(), "Email".into()];
    fields.extend(
        matrix
            .assignments
            .iter()
            .map(|assignment| format!("{} ({})", assignment.title, assignment.max_points).into()),
    );
    fields.extend(["Total Points".into(), "Percentage".into(), "GPA".into()]);
    fields
}

fn student_row(student: &GradebookStudent, max_total: u64) -> Vec<CsvField> {
    let mut fields: Vec<CsvField> = vec![
        student.name.as_str().into(),
        student.email.as_str().into(),
    ];
    fields.extend(student.grades.iter().map(|cell| match cell.score {
        Some(score) => CsvField::Number(score),
        None => cell.status.as_str().into(),
    }));
    fields.push(format!("{}/{}", student.total_points, max_total).into());
    fields.push(format!("{}%", student.percentage).into());
    fields.push(student.gpa.map(|gpa| format!("{gpa:.2}")).into());
    fields
}

/// The full export body: BOM, header, then one row per student, `\n` joined.
/// Output depends only on the matrix. Rows that do not line up with the
/// assignment columns are an error.
pub fn generate_gradebook_csv(matrix: &GradebookMatrix) -> GradingResult<String> {
    matrix.check_integrity()?;
    let max_total = matrix.assignment_max_total();
    let mut rows = Vec::with_capacity(matrix.students.len() + 1);
    rows.push(join_row(header_row(matrix)));
    rows.extend(
        matrix
            .students
            .iter()
            .map(|student| join_row(student_row(student, max_total))),
    );

    let mut output = String::new();
    output.push(BOM);
    output.push_str(&rows.join("\n"));
    Ok(output)
}

fn is_filename_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// `<sanitized code>_grades_<YYYY-MM-DD>.csv`. Each run of characters outside
/// `[A-Za-z0-9_-]` collapses to a single underscore.
pub fn generate_csv_filename(course_code: &str, today: NaiveDate) -> String {
    let mut sanitized = String::with_capacity(course_code.len());
    let mut in_unsafe_run = false;
    for ch in course_code.chars() {
        if is_filename_safe(ch) {
            sanitized.push(ch);
            in_unsafe_run = false;
        } else if !in_unsafe_run {
            sanitized.push('_');
            in_unsafe_run = true;
        }
    }
    format!("{}_grades_{}.csv", sanitized, today.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn validate_export_data(matrix: &GradebookMatrix) -> ExportValidation {
    if matrix.students.is_empty() {
        return ExportValidation {
            is_valid: false,
            error: Some("No students enrolled in this course".to_string()),
        };
    }
    ExportValidation {
        is_valid: true,
        error: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub student_count: usize,
    pub assignment_count: usize,
    pub total_cells: usize,
    /// Rough byte count for progress display.
    pub estimated_size: usize,
}

pub fn get_export_stats(matrix: &GradebookMatrix) -> ExportStats {
    let student_count = matrix.students.len();
    let assignment_count = matrix.assignments.len();
    let total_cells = student_count * (assignment_count + FIXED_COLUMNS);
    ExportStats {
        student_count,
        assignment_count,
        total_cells,
        estimated_size: total_cells * BYTES_PER_CELL,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub filename: String,
    pub content: String,
    pub stats: ExportStats,
}

/// Validates and serializes in one step. `Ok(None)` when there is nothing to
/// export; a malformed matrix is an error.
pub fn export_gradebook(
    matrix: &GradebookMatrix,
    today: NaiveDate,
) -> GradingResult<Option<ExportBundle>> {
    matrix.check_integrity()?;
    let validation = validate_export_data(matrix);
    if !validation.is_valid {
        warn!(
            course = %matrix.course_code,
            reason = validation.error.as_deref().unwrap_or_default(),
            "skipping gradebook export"
        );
        return Ok(None);
    }

    let bundle = ExportBundle {
        filename: generate_csv_filename(&matrix.course_code, today),
        content: generate_gradebook_csv(matrix)?,
        stats: get_export_stats(matrix),
    };
    debug!(
        filename = %bundle.filename,
        bytes = bundle.content.len(),
        "generated gradebook export"
    );
    Ok(Some(bundle))
}
