use crate::ledger::{CategoryRecord, CategoryRegistry, YearBook};

use super::Column;

/// Placeholder stored in the `date` column for entries without a date.
pub const UNKNOWN_DATE: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub category: String,
    pub date: String,
    pub month: Option<u32>,
    pub amount: f64,
}

/// Flat table of entries ready for grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<DataRow>,
    has_month: bool,
}

fn date_or_unknown(date: &str) -> String {
    if date.is_empty() {
        UNKNOWN_DATE.to_string()
    } else {
        date.to_string()
    }
}

fn record_rows<'a>(
    record: &'a CategoryRecord,
    month: Option<u32>,
) -> impl Iterator<Item = DataRow> + 'a {
    record.fields.iter().map(move |entry| DataRow {
        category: record.name.clone(),
        date: date_or_unknown(&entry.date),
        month,
        amount: entry.amount,
    })
}

impl Dataset {
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let has_month = !rows.is_empty() && rows.iter().all(|row| row.month.is_some());
        Self { rows, has_month }
    }

    /// Month-level table: one row per entry, `category` is the record name.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CategoryRecord>,
    {
        let rows = records
            .into_iter()
            .flat_map(|record| record_rows(record, None))
            .collect();
        Self {
            rows,
            has_month: false,
        }
    }

    pub fn from_registry(registry: &CategoryRegistry) -> Self {
        Self::from_records(registry.records())
    }

    /// Single-category table: `category` is each entry's subcategory.
    pub fn from_category(record: &CategoryRecord) -> Self {
        let rows = record
            .fields
            .iter()
            .map(|entry| DataRow {
                category: entry.subcategory.clone(),
                date: date_or_unknown(&entry.date),
                month: None,
                amount: entry.amount,
            })
            .collect();
        Self {
            rows,
            has_month: false,
        }
    }

    /// Year table: month-level rows of every month plus the `month` column.
    pub fn from_year(book: &YearBook) -> Self {
        let rows = book
            .iter()
            .flat_map(|(month, registry)| {
                registry
                    .records()
                    .flat_map(move |record| record_rows(record, Some(month)))
            })
            .collect();
        Self {
            rows,
            has_month: true,
        }
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        column != Column::Month || self.has_month
    }

    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![Column::Category, Column::Date];
        if self.has_month {
            columns.push(Column::Month);
        }
        columns.push(Column::Amount);
        columns
    }

    /// Values of one column rendered as text, in row order.
    pub fn column(&self, column: Column) -> Option<Vec<String>> {
        if !self.has_column(column) {
            return None;
        }
        let values = self
            .rows
            .iter()
            .map(|row| match column {
                Column::Category => row.category.clone(),
                Column::Date => row.date.clone(),
                Column::Month => row.month.map(|m| m.to_string()).unwrap_or_default(),
                Column::Amount => row.amount.to_string(),
            })
            .collect();
        Some(values)
    }

    /// Splits the table after `index` rows.
    pub fn split_at(&self, index: usize) -> (Dataset, Dataset) {
        let index = index.min(self.rows.len());
        let (head, tail) = self.rows.split_at(index);
        (
            Dataset {
                rows: head.to_vec(),
                has_month: self.has_month,
            },
            Dataset {
                rows: tail.to_vec(),
                has_month: self.has_month,
            },
        )
    }
}
