use std::{collections::BTreeMap, fmt};

use tracing::debug;

use crate::errors::StatsError;
use crate::ledger::CategoryRecord;

use super::dataset::{DataRow, Dataset};
use super::{Column, GroupKey};

/// A distinct value of the grouping column. Text sorts lexicographically,
/// months numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Text(String),
    Month(u32),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Text(text) => f.write_str(text),
            GroupValue::Month(month) => write!(f, "{month}"),
        }
    }
}

/// Neumaier compensated running sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    pub(crate) fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Sorts first so the result does not depend on the order of `values`.
fn stable_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mut acc = CompensatedSum::default();
    for value in values {
        acc.add(value);
    }
    acc.value()
}

/// Summed `amount` per distinct key value, ascending by key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTotals {
    key: GroupKey,
    groups: Vec<(GroupValue, f64)>,
}

impl GroupedTotals {
    fn from_parts(key: GroupKey, parts: BTreeMap<GroupValue, Vec<f64>>) -> Self {
        Self {
            key,
            groups: parts
                .into_iter()
                .map(|(value, amounts)| (value, stable_sum(amounts)))
                .collect(),
        }
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn groups(&self) -> &[(GroupValue, f64)] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total(&self) -> f64 {
        stable_sum(self.groups.iter().map(|(_, amount)| *amount).collect())
    }

    /// `(label, total)` pairs in group order.
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.groups
            .iter()
            .map(|(value, amount)| (value.to_string(), *amount))
            .collect()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|(value, _)| value.to_string() == label)
            .map(|(_, amount)| *amount)
    }

    /// Adds partial totals of the same grouping together.
    pub fn merge(&self, other: &GroupedTotals) -> GroupedTotals {
        let mut parts: BTreeMap<GroupValue, Vec<f64>> = BTreeMap::new();
        for (value, amount) in self.groups.iter().chain(&other.groups) {
            parts.entry(value.clone()).or_default().push(*amount);
        }
        Self::from_parts(self.key, parts)
    }
}

fn group_value(row: &DataRow, key: GroupKey) -> Option<GroupValue> {
    match key {
        GroupKey::Category => Some(GroupValue::Text(row.category.clone())),
        GroupKey::Date => Some(GroupValue::Text(row.date.clone())),
        GroupKey::Month => row.month.map(GroupValue::Month),
    }
}

pub fn sum_by(dataset: &Dataset, key: GroupKey) -> Result<GroupedTotals, StatsError> {
    if dataset.is_empty() {
        return Err(StatsError::EmptyDataset);
    }
    if !dataset.has_column(key.column()) {
        return Err(StatsError::MissingColumn(key.column()));
    }
    let mut parts: BTreeMap<GroupValue, Vec<f64>> = BTreeMap::new();
    for row in dataset.rows() {
        let value = group_value(row, key).ok_or(StatsError::MissingColumn(Column::Month))?;
        parts.entry(value).or_default().push(row.amount);
    }
    debug!(rows = dataset.len(), groups = parts.len(), column = %key.column(), "dataset grouped");
    Ok(GroupedTotals::from_parts(key, parts))
}

/// Flattens month-level `records` and groups them by `key`.
pub fn sum_records_by<'a, I>(records: I, key: GroupKey) -> Result<GroupedTotals, StatsError>
where
    I: IntoIterator<Item = &'a CategoryRecord>,
{
    sum_by(&Dataset::from_records(records), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CategoryRegistry, Entry};

    fn month() -> CategoryRegistry {
        let mut registry = CategoryRegistry::default();
        let food = registry.create("food").unwrap();
        let rent = registry.create("rent").unwrap();
        registry
            .add_entry(food, Entry::new(10.0).unwrap().with_date("02"))
            .unwrap();
        registry
            .add_entry(food, Entry::new(5.0).unwrap().with_date("01"))
            .unwrap();
        registry
            .add_entry(rent, Entry::new(3.0).unwrap().with_date("02"))
            .unwrap();
        registry
    }

    #[test]
    fn sums_per_category() {
        let registry = month();
        let totals = sum_records_by(registry.records(), GroupKey::Category).unwrap();
        assert_eq!(
            totals.pairs(),
            vec![("food".to_string(), 15.0), ("rent".to_string(), 3.0)]
        );
    }

    #[test]
    fn sums_per_date_ascending() {
        let registry = month();
        let totals = sum_by(&Dataset::from_registry(&registry), GroupKey::Date).unwrap();
        assert_eq!(
            totals.pairs(),
            vec![("01".to_string(), 5.0), ("02".to_string(), 13.0)]
        );
        assert_eq!(totals.total(), 18.0);
    }

    #[test]
    fn empty_dataset_rejected() {
        let mut registry = CategoryRegistry::default();
        registry.create("food").unwrap();
        assert_eq!(
            sum_records_by(registry.records(), GroupKey::Category),
            Err(StatsError::EmptyDataset)
        );
    }

    #[test]
    fn month_grouping_needs_month_column() {
        let registry = month();
        assert_eq!(
            sum_by(&Dataset::from_registry(&registry), GroupKey::Month),
            Err(StatsError::MissingColumn(Column::Month))
        );
    }

    #[test]
    fn inexact_amounts_sum_the_same_in_any_order() {
        let rows = |amounts: [f64; 3]| {
            Dataset::from_rows(
                amounts
                    .iter()
                    .map(|amount| DataRow {
                        category: "food".to_string(),
                        date: "01".to_string(),
                        month: None,
                        amount: *amount,
                    })
                    .collect(),
            )
        };
        let forward = sum_by(&rows([0.1, 0.2, 0.3]), GroupKey::Category).unwrap();
        let reversed = sum_by(&rows([0.3, 0.2, 0.1]), GroupKey::Category).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward.get("food"), Some(0.6));
    }

    #[test]
    fn compensation_recovers_lost_low_bits() {
        let mut acc = CompensatedSum::default();
        for value in [1.0, 1e100, 1.0, -1e100] {
            acc.add(value);
        }
        assert_eq!(acc.value(), 2.0);
    }

    #[test]
    fn merge_adds_matching_groups() {
        let dataset = Dataset::from_registry(&month());
        let (head, tail) = dataset.split_at(1);
        let merged = sum_by(&head, GroupKey::Category)
            .unwrap()
            .merge(&sum_by(&tail, GroupKey::Category).unwrap());
        assert_eq!(merged, sum_by(&dataset, GroupKey::Category).unwrap());
    }
}
