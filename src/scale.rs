//! Percentage, letter grade and GPA conversion on the 12-point scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GradingError, GradingResult};

/// Base the letter-grade table is expressed on.
pub const BASE_SCALE: f64 = 4.0;

/// Rounds to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 12] = [
        LetterGrade::A,
        LetterGrade::AMinus,
        LetterGrade::BPlus,
        LetterGrade::B,
        LetterGrade::BMinus,
        LetterGrade::CPlus,
        LetterGrade::C,
        LetterGrade::CMinus,
        LetterGrade::DPlus,
        LetterGrade::D,
        LetterGrade::DMinus,
        LetterGrade::F,
    ];

    /// Bucket lookup with inclusive lower bounds. Anything below 60, including
    /// negatives and NaN, is an F; anything at or above 93 is an A.
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 93.0 => LetterGrade::A,
            p if p >= 90.0 => LetterGrade::AMinus,
            p if p >= 87.0 => LetterGrade::BPlus,
            p if p >= 83.0 => LetterGrade::B,
            p if p >= 80.0 => LetterGrade::BMinus,
            p if p >= 77.0 => LetterGrade::CPlus,
            p if p >= 73.0 => LetterGrade::C,
            p if p >= 70.0 => LetterGrade::CMinus,
            p if p >= 67.0 => LetterGrade::DPlus,
            p if p >= 63.0 => LetterGrade::D,
            p if p >= 60.0 => LetterGrade::DMinus,
            _ => LetterGrade::F,
        }
    }

    /// Grade points on the 4.0 base.
    pub fn base_points(&self) -> f64 {
        match self {
            LetterGrade::A => 4.0,
            LetterGrade::AMinus => 3.7,
            LetterGrade::BPlus => 3.3,
            LetterGrade::B => 3.0,
            LetterGrade::BMinus => 2.7,
            LetterGrade::CPlus => 2.3,
            LetterGrade::C => 2.0,
            LetterGrade::CMinus => 1.7,
            LetterGrade::DPlus => 1.3,
            LetterGrade::D => 1.0,
            LetterGrade::DMinus => 0.7,
            LetterGrade::F => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown letter grade '{0}'")]
pub struct UnknownLetterGrade(pub String);

impl FromStr for LetterGrade {
    type Err = UnknownLetterGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LetterGrade::ALL
            .into_iter()
            .find(|grade| grade.as_str() == s)
            .ok_or_else(|| UnknownLetterGrade(s.to_string()))
    }
}

/// Letter grade for a percentage. Scale independent.
pub fn percentage_to_letter_grade(percentage: f64) -> LetterGrade {
    LetterGrade::from_percentage(percentage)
}

/// A GPA scale with a fixed maximum (4.0, 5.0, ...). Grade points are the
/// 4.0-base table scaled proportionally to the maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeScale {
    max: f64,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self { max: BASE_SCALE }
    }
}

impl GradeScale {
    pub fn new(max: f64) -> GradingResult<Self> {
        if !max.is_finite() || max <= 0.0 {
            return Err(GradingError::InvalidScale { value: max });
        }
        Ok(Self { max })
    }

    /// The scale's maximum GPA.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Unrounded grade points for a letter code. Unknown codes are worth 0.
    pub fn letter_grade_to_gpa(&self, letter: &str) -> f64 {
        match letter.parse::<LetterGrade>() {
            Ok(grade) => self.points_for(grade),
            Err(_) => 0.0,
        }
    }

    pub fn points_for(&self, grade: LetterGrade) -> f64 {
        grade.base_points() * self.max / BASE_SCALE
    }

    /// GPA for a percentage, rounded to two decimals. The percentage is
    /// clamped into `[0, 100]` only for the bucket lookup.
    pub fn percentage_to_gpa(&self, percentage: f64) -> f64 {
        let grade = LetterGrade::from_percentage(percentage.clamp(0.0, 100.0));
        round2(self.points_for(grade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_bucket_covers_93_through_100() {
        let scale = GradeScale::default();
        for pct in [93.0, 95.5, 99.99, 100.0] {
            assert_eq!(scale.percentage_to_gpa(pct), 4.0);
            assert_eq!(percentage_to_letter_grade(pct), LetterGrade::A);
        }
    }

    #[test]
    fn boundaries_belong_to_upper_bucket() {
        let scale = GradeScale::default();
        assert_eq!(scale.percentage_to_gpa(92.9), 3.7);
        assert_eq!(scale.percentage_to_gpa(93.0), 4.0);

        let expected = [
            (90.0, "A-"),
            (89.99, "B+"),
            (87.0, "B+"),
            (83.0, "B"),
            (80.0, "B-"),
            (77.0, "C+"),
            (73.0, "C"),
            (70.0, "C-"),
            (67.0, "D+"),
            (63.0, "D"),
            (60.0, "D-"),
            (59.99, "F"),
        ];
        for (pct, letter) in expected {
            assert_eq!(percentage_to_letter_grade(pct).as_str(), letter, "pct {pct}");
        }
    }

    #[test]
    fn out_of_range_percentages_are_clamped() {
        let scale = GradeScale::default();
        assert_eq!(scale.percentage_to_gpa(-10.0), 0.0);
        assert_eq!(scale.percentage_to_gpa(150.0), 4.0);
        assert_eq!(percentage_to_letter_grade(-10.0), LetterGrade::F);
        assert_eq!(percentage_to_letter_grade(150.0), LetterGrade::A);
    }

    #[test]
    fn custom_scale_is_proportional() {
        let five = GradeScale::new(5.0).unwrap();
        assert_eq!(five.percentage_to_gpa(91.0), 4.63);
        assert_eq!(five.percentage_to_gpa(88.0), 4.13);
        assert_eq!(five.percentage_to_gpa(95.0), 5.0);
        assert_eq!(five.max(), 5.0);
    }

    #[test]
    fn letter_lookup_scales_and_ignores_unknown_codes() {
        let scale = GradeScale::default();
        assert_eq!(scale.letter_grade_to_gpa("B-"), 2.7);
        assert_eq!(scale.letter_grade_to_gpa("E"), 0.0);
        assert_eq!(scale.letter_grade_to_gpa(""), 0.0);

        let ten = GradeScale::new(10.0).unwrap();
        assert!((ten.letter_grade_to_gpa("C") - 5.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_scales_are_rejected() {
        assert!(GradeScale::new(0.0).is_err());
        assert!(GradeScale::new(-4.0).is_err());
        assert!(GradeScale::new(f64::NAN).is_err());
        assert_eq!(GradeScale::default().max(), BASE_SCALE);
    }

    #[test]
    fn letter_codes_round_trip_through_strings() {
        for grade in LetterGrade::ALL {
            assert_eq!(grade.as_str().parse::<LetterGrade>(), Ok(grade));
        }
        let err = "a".parse::<LetterGrade>().unwrap_err();
        assert_eq!(err.to_string(), "unknown letter grade 'a'");
    }

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(4.625), 4.63);
        assert_eq!(round2(-4.625), -4.63);
        assert_eq!(round2(87.666_666), 87.67);
    }
}
