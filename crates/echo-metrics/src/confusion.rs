//! Binary confusion counts and the rates derived from them.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use echo_knn::Label;
use echo_validation::Trial;

/// True/false positive/negative counts for a two-class problem.
///
/// [`Label::POSITIVE`] (1) is the positive class and [`Label::NEGATIVE`] (0)
/// the negative class. Pairs involving any other label are not counted.
/// Every rate is 0.0 when its denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryConfusion {
    /// Positive rows predicted positive.
    pub true_positives: usize,
    /// Negative rows predicted negative.
    pub true_negatives: usize,
    /// Negative rows predicted positive.
    pub false_positives: usize,
    /// Positive rows predicted negative.
    pub false_negatives: usize,
}

impl BinaryConfusion {
    /// Count outcomes over aligned (ground truth, predicted) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Label, Label)>) -> Self {
        let mut counts = Self::default();
        for (truth, predicted) in pairs {
            match (truth, predicted) {
                (Label::POSITIVE, Label::POSITIVE) => counts.true_positives += 1,
                (Label::NEGATIVE, Label::NEGATIVE) => counts.true_negatives += 1,
                (Label::NEGATIVE, Label::POSITIVE) => counts.false_positives += 1,
                (Label::POSITIVE, Label::NEGATIVE) => counts.false_negatives += 1,
                _ => {}
            }
        }
        counts
    }

    /// Count outcomes for one trial.
    #[must_use]
    pub fn from_trial(trial: &Trial) -> Self {
        Self::from_pairs(trial.pairs())
    }

    /// TP + TN + FP + FN.
    #[must_use]
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// (TP + TN) / total.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// (FP + FN) / total.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        ratio(self.false_positives + self.false_negatives, self.total())
    }

    /// TP / (TP + FN), the true positive rate.
    #[must_use]
    pub fn sensitivity(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// TN / (TN + FP), the true negative rate.
    #[must_use]
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }

    /// sqrt(sensitivity * specificity).
    #[must_use]
    pub fn geometric_mean(&self) -> f64 {
        (self.sensitivity() * self.specificity()).sqrt()
    }

    /// Single-threshold AUC: (sensitivity + specificity) / 2.
    ///
    /// Hard labels give one ROC point; this is the area under the two
    /// segments joining (0,0), that point and (1,1).
    #[must_use]
    pub fn auc(&self) -> f64 {
        (self.sensitivity() + self.specificity()) / 2.0
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Add for BinaryConfusion {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for BinaryConfusion {
    fn add_assign(&mut self, rhs: Self) {
        self.true_positives += rhs.true_positives;
        self.true_negatives += rhs.true_negatives;
        self.false_positives += rhs.false_positives;
        self.false_negatives += rhs.false_negatives;
    }
}

impl Sum for BinaryConfusion {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for BinaryConfusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>8} {:>7} {:>7}", "", "pred_1", "pred_0")?;
        writeln!(
            f,
            "{:>8} {:>7} {:>7}",
            "true_1", self.true_positives, self.false_negatives
        )?;
        writeln!(
            f,
            "{:>8} {:>7} {:>7}",
            "true_0", self.false_positives, self.true_negatives
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(truth: &[i64], predicted: &[i64]) -> BinaryConfusion {
        BinaryConfusion::from_trial(&Trial::from_values(truth, predicted).unwrap())
    }

    #[test]
    fn known_counts_and_rates() {
        let c = counts(&[1, 0, 1, 1, 0], &[1, 0, 1, 0, 0]);
        assert_eq!(
            c,
            BinaryConfusion {
                true_positives: 2,
                true_negatives: 2,
                false_positives: 0,
                false_negatives: 1,
            }
        );
        assert!((c.accuracy() - 0.8).abs() < 1e-12);
        assert!((c.error_rate() - 0.2).abs() < 1e-12);
        assert!((c.sensitivity() - 2.0 / 3.0).abs() < 1e-12);
        assert!((c.specificity() - 1.0).abs() < 1e-12);
        assert!((c.geometric_mean() - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((c.auc() - (2.0 / 3.0 + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_denominators_give_zero() {
        let c = BinaryConfusion::default();
        assert_eq!(c.accuracy(), 0.0);
        assert_eq!(c.error_rate(), 0.0);
        assert_eq!(c.sensitivity(), 0.0);
        assert_eq!(c.specificity(), 0.0);
        assert_eq!(c.geometric_mean(), 0.0);
        assert_eq!(c.auc(), 0.0);
    }

    #[test]
    fn no_positives_has_zero_sensitivity() {
        let c = counts(&[0, 0, 0], &[0, 1, 0]);
        assert_eq!(c.sensitivity(), 0.0);
        assert!((c.specificity() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn unmapped_labels_are_ignored() {
        let c = counts(&[2, 4, 1], &[2, 4, 1]);
        assert_eq!(c.total(), 1);
        assert_eq!(c.true_positives, 1);
    }

    #[test]
    fn sum_pools_counts() {
        let pooled: BinaryConfusion = [counts(&[1], &[1]), counts(&[1, 0], &[0, 0])]
            .into_iter()
            .sum();
        assert_eq!(pooled.true_positives, 1);
        assert_eq!(pooled.false_negatives, 1);
        assert_eq!(pooled.true_negatives, 1);
        assert_eq!(pooled.total(), 3);
    }

    #[test]
    fn display_formatting() {
        let output = format!("{}", counts(&[1, 0], &[1, 0]));
        assert!(output.contains("pred_1"));
        assert!(output.contains("true_0"));
    }
}
