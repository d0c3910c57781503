//! Grading computation core: percentage to GPA conversion, course and
//! cross-course GPA aggregation, gradebook matrix assembly and CSV export.
//!
//! Every computation is a pure function over its inputs. The only clock
//! readings are the `now`/`today` values callers pass in.

pub mod config;
pub mod error;
pub mod export;
pub mod gpa;
pub mod gradebook;
pub mod input;
pub mod models;
pub mod scale;
pub mod telemetry;

pub use config::GradingConfig;
pub use error::{GradingError, GradingResult};
pub use export::{
    escape_csv, export_gradebook, generate_csv_filename, generate_gradebook_csv,
    get_export_stats, validate_export_data, CsvField, ExportBundle, ExportStats,
    ExportValidation,
};
pub use gpa::{calculate_gpa, calculate_overall_gpa, calculate_simple_gpa};
pub use gradebook::{build_matrix, classify_cell};
pub use models::{
    CellStatus, GpaResult, GradebookAssignment, GradebookCell, GradebookInput, GradebookMatrix,
    GradebookStudent, GradedItem, StatusCounts, StudentRecord, SubmissionRecord, SubmissionState,
};
pub use scale::{percentage_to_letter_grade, round2, GradeScale, LetterGrade};
