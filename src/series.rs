//! Labeled numeric series.
//!
//! A [`Series`] pairs every value with a [`Label`]. Reordering moves labels
//! together with their values, so a label keeps pointing at the value it was
//! constructed with.

use crate::describe::{Description, describe};
use crate::error::StatsError;
use crate::stats::Accumulator;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    ops::{Bound, RangeBounds},
};

/// Identifier of one entry of a [`Series`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(untagged)]
pub enum Label {
    /// Integer label; implicit labels are the construction positions.
    #[display("{_0}")]
    Index(usize),
    #[display("{_0}")]
    Name(String),
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Ordered sequence of values, each paired with a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    labels: Vec<Label>,
    values: Vec<f64>,
}

impl Series {
    /// Create a series whose labels are the value positions.
    pub fn new(values: Vec<f64>) -> Self {
        let labels = (0..values.len()).map(Label::Index).collect();
        Self { labels, values }
    }

    /// Create a series pairing each value with the label at the same position.
    pub fn with_labels<I, L>(values: Vec<f64>, labels: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        if labels.len() != values.len() {
            return Err(StatsError::LengthMismatch {
                n_values: values.len(),
                n_labels: labels.len(),
            });
        }
        Ok(Self { labels, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, f64)> + '_ {
        self.labels.iter().zip(self.values.iter().copied())
    }

    /// Return a copy sorted by value in ascending order.
    ///
    /// The sort is stable: entries with equal values keep their relative
    /// order. `NaN` values go last.
    pub fn sort_values(&self) -> Self {
        self.sort_values_by(SortOrder::Ascending)
    }

    /// Return a copy sorted by value in the given order, keeping equal
    /// values in their original relative order. `NaN` values go last.
    pub fn sort_values_by(&self, order: SortOrder) -> Self {
        let mut idxs: Vec<usize> = (0..self.len()).collect();
        idxs.sort_by(|&a, &b| {
            let (val_a, val_b) = (self.values[a], self.values[b]);
            // NaN goes last in both orders, whatever its sign bit.
            match (val_a.is_nan(), val_b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => match order {
                    SortOrder::Ascending => val_a.total_cmp(&val_b),
                    SortOrder::Descending => val_b.total_cmp(&val_a),
                },
            }
        });
        self.take(&idxs)
    }

    /// Entry at `index`, ignoring labels. Negative indices count from the end.
    pub fn iloc(&self, index: isize) -> Result<(&Label, f64), StatsError> {
        let pos = self.resolve_elem(index)?;
        Ok((&self.labels[pos], self.values[pos]))
    }

    /// Contiguous sub-series by position, keeping labels with their values.
    ///
    /// Endpoints may be negative. The start and an inclusive end must name an
    /// entry (`[-len, len-1]`); an exclusive end may also equal `len`. An
    /// empty or inverted range yields an empty series.
    pub fn iloc_slice<R: RangeBounds<isize>>(&self, range: R) -> Result<Self, StatsError> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&index) => self.resolve_elem(index)?,
            Bound::Excluded(&index) => self.resolve_elem(index)? + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&index) => self.resolve_elem(index)? + 1,
            Bound::Excluded(&index) => self.resolve_pos(index)?,
            Bound::Unbounded => len,
        };

        if start >= end {
            return Ok(Self {
                labels: Vec::new(),
                values: Vec::new(),
            });
        }
        Ok(Self {
            labels: self.labels[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Value of the first entry carrying `label`.
    pub fn loc<L: Into<Label>>(&self, label: L) -> Result<f64, StatsError> {
        let label = label.into();
        self.iter()
            .find_map(|(lbl, val)| (*lbl == label).then_some(val))
            .ok_or(StatsError::LabelNotFound { label })
    }

    /// Values of every entry carrying `label`, in positional order.
    pub fn loc_all<L: Into<Label>>(&self, label: L) -> Vec<f64> {
        let label = label.into();
        self.iter()
            .filter_map(|(lbl, val)| (*lbl == label).then_some(val))
            .collect()
    }

    pub fn describe(&self) -> Result<Description, StatsError> {
        describe(&self.values)
    }

    /// Streaming statistics over the values.
    pub fn accumulator(&self) -> Accumulator {
        self.values.iter().copied().collect()
    }

    fn take(&self, idxs: &[usize]) -> Self {
        Self {
            labels: idxs.iter().map(|&i| self.labels[i].clone()).collect(),
            values: idxs.iter().map(|&i| self.values[i]).collect(),
        }
    }

    /// Map `index` into `0..=len`, counting negative indices from the end.
    fn resolve_pos(&self, index: isize) -> Result<usize, StatsError> {
        let len = self.len() as isize;
        let pos = if index < 0 { index + len } else { index };
        if !(0..=len).contains(&pos) {
            return Err(self.out_of_range(index));
        }
        Ok(pos as usize)
    }

    /// Like [`Self::resolve_pos`], but the position must hold an entry.
    fn resolve_elem(&self, index: isize) -> Result<usize, StatsError> {
        let pos = self.resolve_pos(index)?;
        if pos == self.len() {
            return Err(self.out_of_range(index));
        }
        Ok(pos)
    }

    fn out_of_range(&self, index: isize) -> StatsError {
        StatsError::IndexOutOfRange {
            index,
            len: self.len(),
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.labels.iter().map(ToString::to_string).collect();
        let vals: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        let label_width = labels.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        let val_width = vals.iter().map(String::len).max().unwrap_or(0);
        for (label, val) in labels.iter().zip(&vals) {
            writeln!(f, "{label:<label_width$}    {val:>val_width$}")?;
        }
        write!(f, "Length: {}", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use rand_distr::{Distribution, Uniform};

    const NAMES: [&str; 9] = [
        "Tapioca",
        "Marceline",
        "Frida",
        "Bambu",
        "Jennie",
        "Stacy",
        "Frodo",
        "Naniquinha",
        "Mon Cherri",
    ];
    const AGES: [f64; 9] = [3.0, 1.0, 8.0, 9.0, 3.0, 1.0, 8.0, 2.0, 1.0];

    fn cats() -> Series {
        Series::with_labels(AGES.to_vec(), NAMES).unwrap()
    }

    fn names(series: &Series) -> Vec<String> {
        series.labels().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn sort_keeps_labels_with_values() {
        let series = cats().sort_values();
        assert_eq!(
            names(&series),
            [
                "Marceline",
                "Stacy",
                "Mon Cherri",
                "Naniquinha",
                "Tapioca",
                "Jennie",
                "Frida",
                "Frodo",
                "Bambu",
            ]
        );
        assert_eq!(
            series.values(),
            [1.0, 1.0, 1.0, 2.0, 3.0, 3.0, 8.0, 8.0, 9.0]
        );
    }

    #[test]
    fn sort_descending_is_stable() {
        let series = cats().sort_values_by(SortOrder::Descending);
        assert_eq!(names(&series)[..3], ["Bambu", "Frida", "Frodo"]);
        assert_eq!(names(&series)[6..], ["Marceline", "Stacy", "Mon Cherri"]);
    }

    #[test]
    fn sort_puts_nan_last_in_both_orders() {
        let series = Series::with_labels(
            vec![2.0, -f64::NAN, 1.0, f64::NAN, 3.0],
            ["a", "neg-nan", "b", "nan", "c"],
        )
        .unwrap();

        let asc = series.sort_values();
        assert_eq!(asc.values()[..3], [1.0, 2.0, 3.0]);
        assert!(asc.values()[3..].iter().all(|val| val.is_nan()));
        assert_eq!(names(&asc)[3..], ["neg-nan", "nan"]);

        let desc = series.sort_values_by(SortOrder::Descending);
        assert_eq!(desc.values()[..3], [3.0, 2.0, 1.0]);
        assert!(desc.values()[3..].iter().all(|val| val.is_nan()));
        assert_eq!(names(&desc)[3..], ["neg-nan", "nan"]);
    }

    #[test]
    fn sort_does_not_mutate_original() {
        let series = cats();
        let _sorted = series.sort_values();
        assert_eq!(series.values(), AGES);
    }

    #[test]
    fn loc_is_independent_of_order() {
        let series = cats();
        assert_eq!(series.loc("Tapioca"), Ok(3.0));
        let series = series.sort_values();
        assert_eq!(series.loc("Tapioca"), Ok(3.0));
        assert_eq!(series.loc("Bambu"), Ok(9.0));
    }

    #[test]
    fn loc_missing_label() {
        assert_eq!(
            cats().loc("Garfield"),
            Err(StatsError::LabelNotFound {
                label: Label::from("Garfield")
            })
        );
    }

    #[test]
    fn loc_duplicate_labels_first_match() {
        let series = Series::with_labels(vec![1.0, 2.0, 3.0], ["a", "b", "a"]).unwrap();
        assert_eq!(series.loc("a"), Ok(1.0));
        assert_eq!(series.loc_all("a"), [1.0, 3.0]);
        assert!(series.loc_all("z").is_empty());
    }

    #[test]
    fn iloc_ignores_labels() {
        let series = cats().sort_values();
        let (label, val) = series.iloc(0).unwrap();
        assert_eq!(label, &Label::from("Marceline"));
        assert_eq!(val, 1.0);

        let (label, val) = series.iloc(-1).unwrap();
        assert_eq!(label, &Label::from("Bambu"));
        assert_eq!(val, 9.0);

        let (label, _) = series.iloc(-9).unwrap();
        assert_eq!(label, &Label::from("Marceline"));
    }

    #[test]
    fn iloc_out_of_range() {
        let series = cats();
        assert_eq!(
            series.iloc(100),
            Err(StatsError::IndexOutOfRange {
                index: 100,
                len: 9
            })
        );
        assert!(series.iloc(9).is_err());
        assert!(series.iloc(-10).is_err());
        assert!(Series::new(Vec::new()).iloc(0).is_err());
    }

    #[test]
    fn iloc_slice_head() {
        let series = cats().sort_values();
        let first = series.iloc_slice(..3).unwrap();
        assert_eq!(names(&first), ["Marceline", "Stacy", "Mon Cherri"]);
        assert_eq!(first.values(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn iloc_slice_bounds() {
        let series = cats();
        assert_eq!(series.iloc_slice(..).unwrap(), series);
        assert_eq!(series.iloc_slice(..9).unwrap().len(), 9);
        assert_eq!(series.iloc_slice(-2..).unwrap().values(), [2.0, 1.0]);
        assert_eq!(series.iloc_slice(1..=2).unwrap().values(), [1.0, 8.0]);
        assert!(series.iloc_slice(5..2).unwrap().is_empty());
        assert_eq!(
            series.iloc_slice(..100),
            Err(StatsError::IndexOutOfRange {
                index: 100,
                len: 9
            })
        );
        assert!(series.iloc_slice(-10..).is_err());
        assert!(series.iloc_slice(..=9).is_err());
        assert_eq!(
            series.iloc_slice(9..),
            Err(StatsError::IndexOutOfRange { index: 9, len: 9 })
        );
        assert_eq!(series.iloc_slice(8..).unwrap().values(), [1.0]);
        assert_eq!(series.iloc_slice(-9..0).unwrap().len(), 0);
        assert!(Series::new(Vec::new()).iloc_slice(0..).is_err());
        assert!(Series::new(Vec::new()).iloc_slice(..).unwrap().is_empty());
    }

    #[test]
    fn implicit_labels_are_positions() {
        let series = Series::new(vec![5.0, 4.0, 6.0]).sort_values();
        assert_eq!(
            series.labels(),
            [Label::Index(1), Label::Index(0), Label::Index(2)]
        );
        assert_eq!(series.loc(0_usize), Ok(5.0));
        assert_eq!(series.iloc(0).unwrap().1, 4.0);
    }

    #[test]
    fn construct_length_mismatch() {
        assert_eq!(
            Series::with_labels(vec![1.0, 2.0], ["a"]),
            Err(StatsError::LengthMismatch {
                n_values: 2,
                n_labels: 1
            })
        );
    }

    #[test]
    fn collaborator_statistics() {
        let series = cats();
        let acc = series.accumulator();
        assert!((acc.mean() - 4.0).abs() < 1e-12);
        assert!((acc.sample_variance() - 11.25).abs() < 1e-9);
        assert_eq!(series.describe().unwrap().count, 9);
        assert!(Series::new(vec![1.0]).accumulator().sample_variance().is_nan());
    }

    #[test]
    fn display_aligns_columns() {
        let text = cats().iloc_slice(..2).unwrap().to_string();
        assert_eq!(text, "Tapioca      3\nMarceline    1\nLength: 2");
    }

    #[test]
    fn label_deserializes_untagged() {
        let labels: Vec<Label> = serde_json::from_str(r#"[3, "Frida"]"#).unwrap();
        assert_eq!(labels, [Label::Index(3), Label::from("Frida")]);
    }

    #[test]
    fn sort_properties_on_random_series() {
        let mut rng = ChaCha12Rng::seed_from_u64(0xca7);
        let age_dist = Uniform::new(0, 12).unwrap();

        for _ in 0..200 {
            let n_vals = rng.random_range(0..60);
            let values: Vec<f64> = (0..n_vals)
                .map(|_| f64::from(age_dist.sample(&mut rng)))
                .collect();
            let labels: Vec<String> = (0..n_vals).map(|i| format!("cat-{i}")).collect();
            let series = Series::with_labels(values, labels).unwrap();
            let sorted = series.sort_values();

            assert!(sorted.values().is_sorted_by(|a, b| a <= b));
            for i in 1..sorted.len() as isize {
                assert!(sorted.iloc(i - 1).unwrap().1 <= sorted.iloc(i).unwrap().1);
            }

            let mut before: Vec<(Label, u64)> =
                series.iter().map(|(l, v)| (l.clone(), v.to_bits())).collect();
            let mut after: Vec<(Label, u64)> =
                sorted.iter().map(|(l, v)| (l.clone(), v.to_bits())).collect();
            before.sort();
            after.sort();
            assert_eq!(before, after);

            for (label, val) in series.iter() {
                assert_eq!(sorted.loc(label.clone()), Ok(val));
            }

            // Equal values keep construction order.
            for pair in sorted.iter().collect::<Vec<_>>().windows(2) {
                let ((la, va), (lb, vb)) = (pair[0], pair[1]);
                if va == vb {
                    let pos = |l: &Label| series.labels().iter().position(|x| x == l);
                    assert!(pos(la) < pos(lb));
                }
            }
        }
    }
}
