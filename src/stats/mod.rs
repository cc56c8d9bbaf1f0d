//! Aggregation of month ledgers into grouped totals and their bar charts.

pub mod aggregate;
pub mod chart;
pub mod dataset;
pub mod view;

use std::fmt;

pub use aggregate::{sum_by, sum_records_by, GroupValue, GroupedTotals};
pub use chart::{ChartRenderer, ChartSize, ChartSpec, RenderedChart, TextBarChart};
pub use dataset::{DataRow, Dataset, UNKNOWN_DATE};
pub use view::{StatisticsView, StatsScope};

/// Columns of a [`Dataset`]. The keys double as localization keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Category,
    Date,
    Month,
    Amount,
}

impl Column {
    pub fn key(self) -> &'static str {
        match self {
            Column::Category => "category",
            Column::Date => "date",
            Column::Month => "month",
            Column::Amount => "amount",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Columns that [`sum_by`] can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Category,
    Date,
    Month,
}

impl GroupKey {
    pub fn column(self) -> Column {
        match self {
            GroupKey::Category => Column::Category,
            GroupKey::Date => Column::Date,
            GroupKey::Month => Column::Month,
        }
    }
}
