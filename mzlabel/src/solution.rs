//! The assignment records produced by the labeling pipeline
use std::cmp::Ordering;
use std::ops::Range;

/// A labeled peak assigned to an unlabeled anchor peak with a number of labels
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// The m/z of the background anchor peak
    pub unlabeled_mz: f64,
    /// The m/z of the labeled peak matched to the anchor
    pub labeled_mz: f64,
    /// The number of label mass shifts separating the two
    pub label_count: u32,
    pub labeled_intensity: f64,
    pub unlabeled_intensity: f64,
}

impl Assignment {
    pub fn new(
        unlabeled_mz: f64,
        labeled_mz: f64,
        label_count: u32,
        labeled_intensity: f64,
        unlabeled_intensity: f64,
    ) -> Self {
        Self {
            unlabeled_mz,
            labeled_mz,
            label_count,
            labeled_intensity,
            unlabeled_intensity,
        }
    }

    /// Whether this assignment is of the unlabeled monoisotopic peak
    pub fn is_monoisotopic(&self) -> bool {
        self.label_count == 0
    }

    /// A total ordering over all fields, in declaration order
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.unlabeled_mz
            .total_cmp(&other.unlabeled_mz)
            .then_with(|| self.labeled_mz.total_cmp(&other.labeled_mz))
            .then_with(|| self.label_count.cmp(&other.label_count))
            .then_with(|| self.labeled_intensity.total_cmp(&other.labeled_intensity))
            .then_with(|| {
                self.unlabeled_intensity
                    .total_cmp(&other.unlabeled_intensity)
            })
    }
}

/// Sort assignments into their final reporting order
pub fn sort_assignments(assignments: &mut [Assignment]) {
    assignments.sort_by(|a, b| a.total_cmp(b));
}

/// Find the runs of `assignments` that share exactly the same anchor m/z.
///
/// `assignments` should already be ordered by `unlabeled_mz`.
pub fn anchor_groups(assignments: &[Assignment]) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=assignments.len() {
        if i == assignments.len() || assignments[i].unlabeled_mz != assignments[start].unlabeled_mz
        {
            if start < i {
                groups.push(start..i);
            }
            start = i;
        }
    }
    groups
}
