//! File loaders standing in for the application's data store.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::models::{GradebookInput, GradedItem};

#[derive(Deserialize)]
struct GradedItemRow {
    points: f64,
    max_points: f64,
    weight: Option<f64>,
    is_graded: Option<bool>,
}

impl From<GradedItemRow> for GradedItem {
    fn from(row: GradedItemRow) -> Self {
        GradedItem {
            points: row.points,
            max_points: row.max_points,
            weight: row.weight,
            is_graded: row.is_graded.unwrap_or(true),
        }
    }
}

/// Reads `points,max_points[,weight][,is_graded]` rows. Blank optional
/// columns take their defaults.
pub fn read_graded_items<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<GradedItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut items = Vec::new();

    for (index, result) in reader.deserialize::<GradedItemRow>().enumerate() {
        let row = result.with_context(|| format!("invalid graded item on row {}", index + 1))?;
        items.push(GradedItem::from(row));
    }

    Ok(items)
}

pub fn load_graded_items(csv_path: &Path) -> anyhow::Result<Vec<GradedItem>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let items = read_graded_items(file)
        .with_context(|| format!("failed to read graded items from {}", csv_path.display()))?;
    debug!(count = items.len(), path = %csv_path.display(), "loaded graded items");
    Ok(items)
}

pub fn load_gradebook_input(json_path: &Path) -> anyhow::Result<GradebookInput> {
    let raw = std::fs::read_to_string(json_path)
        .with_context(|| format!("failed to read {}", json_path.display()))?;
    let input: GradebookInput = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid gradebook document", json_path.display()))?;
    debug!(
        course = %input.course_code,
        students = input.students.len(),
        assignments = input.assignments.len(),
        records = input.records.len(),
        "loaded gradebook input"
    );
    Ok(input)
}

/// Parses course GPA arguments; `-`, `null` and `n/a` mean no GPA.
pub fn parse_gpa_values(raw: &[String]) -> anyhow::Result<Vec<Option<f64>>> {
    raw.iter()
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "-" | "null" | "n/a" | "" => Ok(None),
            other => other
                .parse::<f64>()
                .map(Some)
                .with_context(|| format!("'{value}' is not a GPA value")),
        })
        .collect()
}
