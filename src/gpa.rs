//! Course-level and cross-course GPA aggregation.

use tracing::{debug, warn};

use crate::models::{GpaResult, GradedItem};
use crate::scale::{percentage_to_letter_grade, round2, GradeScale};

fn counts_toward_grade(item: &GradedItem) -> bool {
    item.is_graded && item.max_points > 0.0
}

struct Weighted {
    percentage: f64,
    graded_count: usize,
    total_weight: f64,
}

fn weighted_percentage<F>(items: &[GradedItem], weight_of: F) -> Option<Weighted>
where
    F: Fn(&GradedItem) -> f64,
{
    let mut earned = 0.0;
    let mut possible = 0.0;
    let mut graded_count = 0usize;
    let mut total_weight = 0.0;

    for item in items.iter().filter(|item| counts_toward_grade(item)) {
        let weight = weight_of(item);
        earned += item.points * weight;
        possible += item.max_points * weight;
        total_weight += weight;
        graded_count += 1;
    }

    let skipped = items.len() - graded_count;
    if skipped > 0 {
        debug!(skipped, "ignoring ungraded or zero-point items");
    }

    if graded_count == 0 {
        return None;
    }
    if possible <= 0.0 {
        warn!(graded_count, total_weight, "weighted points possible is not positive");
        return None;
    }

    Some(Weighted {
        percentage: round2(earned / possible * 100.0),
        graded_count,
        total_weight,
    })
}

/// Weighted GPA for one course. `None` when nothing counts toward the grade.
pub fn calculate_gpa(items: &[GradedItem], scale: &GradeScale) -> Option<GpaResult> {
    let weighted = weighted_percentage(items, GradedItem::effective_weight)?;
    let letter = percentage_to_letter_grade(weighted.percentage);

    debug!(
        graded_count = weighted.graded_count,
        percentage = weighted.percentage,
        "calculated course GPA"
    );

    Some(GpaResult {
        percentage: weighted.percentage,
        gpa: scale.percentage_to_gpa(weighted.percentage),
        letter_grade: letter,
        graded_count: weighted.graded_count,
        total_weight: round2(weighted.total_weight),
    })
}

/// Same as [`calculate_gpa`] with every weight forced to 1, returning only the GPA.
pub fn calculate_simple_gpa(items: &[GradedItem], scale: &GradeScale) -> Option<f64> {
    weighted_percentage(items, |_| 1.0).map(|weighted| scale.percentage_to_gpa(weighted.percentage))
}

/// Unweighted mean of the present course GPAs. Every course counts once.
pub fn calculate_overall_gpa(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    Some(round2(mean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LetterGrade;

    #[test]
    fn empty_and_ungraded_inputs_have_no_result() {
        let scale = GradeScale::default();
        assert_eq!(calculate_gpa(&[], &scale), None);
        assert_eq!(
            calculate_gpa(&[GradedItem::new(0.0, 100.0).ungraded()], &scale),
            None
        );
        assert_eq!(calculate_gpa(&[GradedItem::new(5.0, 0.0)], &scale), None);
        assert_eq!(calculate_simple_gpa(&[], &scale), None);
    }

    #[test]
    fn weights_shift_the_percentage() {
        let items = vec![
            GradedItem::new(93.0, 100.0).with_weight(1.0),
            GradedItem::new(85.0, 100.0).with_weight(2.0),
        ];
        let result = calculate_gpa(&items, &GradeScale::default()).unwrap();
        assert!((result.percentage - 87.67).abs() < 1e-9);
        assert_eq!(result.letter_grade, LetterGrade::BPlus);
        assert_eq!(result.gpa, 3.3);
        assert_eq!(result.total_weight, 3.0);
        assert_eq!(result.graded_count, 2);
    }

    #[test]
    fn simple_gpa_ignores_supplied_weights() {
        let items = vec![
            GradedItem::new(93.0, 100.0).with_weight(1.0),
            GradedItem::new(85.0, 100.0).with_weight(2.0),
        ];
        // (93 + 85) / 200 = 89% -> B+
        assert_eq!(calculate_simple_gpa(&items, &GradeScale::default()), Some(3.3));

        let items = vec![
            GradedItem::new(100.0, 100.0).with_weight(0.1),
            GradedItem::new(80.0, 100.0).with_weight(5.0),
        ];
        // 90% -> A-
        assert_eq!(calculate_simple_gpa(&items, &GradeScale::default()), Some(3.7));
    }

    #[test]
    fn missing_weight_counts_as_one() {
        let mut item = GradedItem::new(45.0, 50.0);
        item.weight = None;
        let result = calculate_gpa(&[item, GradedItem::new(9.0, 10.0)], &GradeScale::default())
            .unwrap();
        assert_eq!(result.total_weight, 2.0);
        assert_eq!(result.percentage, 90.0);
    }

    #[test]
    fn ungraded_items_are_skipped_not_counted() {
        let items = vec![
            GradedItem::new(18.0, 20.0),
            GradedItem::new(0.0, 20.0).ungraded(),
        ];
        let result = calculate_gpa(&items, &GradeScale::default()).unwrap();
        assert_eq!(result.graded_count, 1);
        assert_eq!(result.percentage, 90.0);
        assert_eq!(result.letter_grade, LetterGrade::AMinus);
    }

    #[test]
    fn zero_weights_leave_nothing_to_divide_by() {
        let items = vec![GradedItem::new(10.0, 10.0).with_weight(0.0)];
        assert_eq!(calculate_gpa(&items, &GradeScale::default()), None);
    }

    #[test]
    fn course_gpa_uses_configured_scale() {
        let scale = GradeScale::new(5.0).unwrap();
        let result = calculate_gpa(&[GradedItem::new(91.0, 100.0)], &scale).unwrap();
        assert_eq!(result.gpa, 4.63);
        assert_eq!(result.letter_grade, LetterGrade::AMinus);
    }

    #[test]
    fn overall_gpa_skips_missing_courses() {
        assert_eq!(
            calculate_overall_gpa(&[Some(4.0), None, Some(3.0), None, Some(2.0)]),
            Some(3.0)
        );
        assert_eq!(calculate_overall_gpa(&[]), None);
        assert_eq!(calculate_overall_gpa(&[None, None]), None);
        assert_eq!(calculate_overall_gpa(&[Some(4.0), Some(3.7), Some(3.3)]), Some(3.67));
    }
}
