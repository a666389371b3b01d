//! Mapping of raw two-class label domains onto `{0, 1}`.

use std::collections::BTreeSet;
use std::fmt;

use echo_knn::Label;
use tracing::{debug, instrument};

use crate::IoError;
use crate::domain::PreparedDataset;

/// A mapping from a raw two-class label domain to negative (0) / positive (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMapping {
    /// Labels are already `0` (negative) and `1` (positive).
    Identity,
    /// `2` (benign) maps to negative, `4` (malignant) to positive.
    BenignMalignant,
}

impl LabelMapping {
    /// Pick the mapping whose domain covers every observed label.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownLabelDomain`] if the labels fit neither
    /// `{0, 1}` nor `{2, 4}`.
    pub fn infer(labels: &[Label]) -> Result<Self, IoError> {
        let distinct: BTreeSet<i64> = labels.iter().map(|l| l.value()).collect();
        if distinct.iter().all(|v| matches!(v, 0 | 1)) {
            Ok(Self::Identity)
        } else if distinct.iter().all(|v| matches!(v, 2 | 4)) {
            Ok(Self::BenignMalignant)
        } else {
            Err(IoError::UnknownLabelDomain {
                labels: distinct.into_iter().collect(),
            })
        }
    }

    /// Map one label.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownLabel`] if `label` is outside this mapping's domain.
    pub fn map(self, label: Label) -> Result<Label, IoError> {
        match (self, label.value()) {
            (Self::Identity, 0) | (Self::BenignMalignant, 2) => Ok(Label::NEGATIVE),
            (Self::Identity, 1) | (Self::BenignMalignant, 4) => Ok(Label::POSITIVE),
            (_, label) => Err(IoError::UnknownLabel { label }),
        }
    }

    /// Map every label of `dataset` in place.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownLabel`] on the first label outside the domain;
    /// `dataset` is left unchanged.
    #[instrument(skip_all, fields(mapping = %self))]
    pub fn apply(self, dataset: &mut PreparedDataset) -> Result<(), IoError> {
        let mapped = dataset
            .labels
            .iter()
            .map(|&l| self.map(l))
            .collect::<Result<Vec<_>, _>>()?;
        let n_positive = mapped.iter().filter(|&&l| l == Label::POSITIVE).count();
        debug!(n_positive, n_negative = mapped.len() - n_positive, "labels mapped");
        dataset.labels = mapped;
        Ok(())
    }
}

impl fmt::Display for LabelMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identity => "identity",
            Self::BenignMalignant => "benign-malignant",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[i64]) -> Vec<Label> {
        values.iter().copied().map(Label::new).collect()
    }

    #[test]
    fn infer_benign_malignant() {
        assert_eq!(
            LabelMapping::infer(&labels(&[2, 4, 2])).unwrap(),
            LabelMapping::BenignMalignant
        );
    }

    #[test]
    fn infer_identity() {
        assert_eq!(
            LabelMapping::infer(&labels(&[0, 1, 1])).unwrap(),
            LabelMapping::Identity
        );
        // A single observed class still resolves.
        assert_eq!(
            LabelMapping::infer(&labels(&[4, 4])).unwrap(),
            LabelMapping::BenignMalignant
        );
    }

    #[test]
    fn infer_unknown_domain() {
        let err = LabelMapping::infer(&labels(&[1, 2, 4])).unwrap_err();
        assert!(matches!(err, IoError::UnknownLabelDomain { ref labels } if labels == &[1, 2, 4]));
    }

    #[test]
    fn map_values() {
        let m = LabelMapping::BenignMalignant;
        assert_eq!(m.map(Label::new(2)).unwrap(), Label::NEGATIVE);
        assert_eq!(m.map(Label::new(4)).unwrap(), Label::POSITIVE);
        assert!(matches!(
            m.map(Label::new(3)),
            Err(IoError::UnknownLabel { label: 3 })
        ));
        assert!(matches!(
            LabelMapping::Identity.map(Label::new(2)),
            Err(IoError::UnknownLabel { label: 2 })
        ));
    }

    #[test]
    fn apply_rewrites_dataset_labels() {
        let mut ds = PreparedDataset {
            feature_names: vec!["a".into()],
            sample_ids: None,
            rows: vec![vec![1.0], vec![2.0]],
            labels: labels(&[4, 2]),
        };
        LabelMapping::BenignMalignant.apply(&mut ds).unwrap();
        assert_eq!(ds.labels(), &[Label::POSITIVE, Label::NEGATIVE]);

        let err = LabelMapping::BenignMalignant.apply(&mut ds).unwrap_err();
        assert!(matches!(err, IoError::UnknownLabel { label: 1 }));
        assert_eq!(ds.labels(), &[Label::POSITIVE, Label::NEGATIVE]);
    }
}
