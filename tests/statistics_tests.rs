mod common;

use common::{add, registry_with};
use finance_tracker::{
    errors::StatsError,
    i18n::{Locale, Localizer},
    ledger::{Entry, Position, YearBook},
    stats::{
        sum_by, ChartSize, Column, DataRow, Dataset, GroupKey, StatisticsView, StatsScope,
        TextBarChart, UNKNOWN_DATE,
    },
};

fn row(category: &str, date: &str, amount: f64) -> DataRow {
    DataRow {
        category: category.to_string(),
        date: date.to_string(),
        month: None,
        amount,
    }
}

fn sample_rows() -> Vec<DataRow> {
    vec![
        row("food", "01", 10.0),
        row("rent", "01", 3.0),
        row("food", "02", 5.0),
        row("fun", "03", 7.5),
        row("rent", "04", 0.5),
    ]
}

#[test]
fn categories_are_summed() {
    let dataset = Dataset::from_rows(vec![
        row("food", "01", 10.0),
        row("food", "02", 5.0),
        row("rent", "01", 3.0),
    ]);
    let totals = sum_by(&dataset, GroupKey::Category).unwrap();
    assert_eq!(
        totals.pairs(),
        vec![("food".to_string(), 15.0), ("rent".to_string(), 3.0)]
    );
}

#[test]
fn empty_dataset_is_an_error() {
    let dataset = Dataset::from_rows(Vec::new());
    assert_eq!(
        sum_by(&dataset, GroupKey::Category).unwrap_err(),
        StatsError::EmptyDataset
    );
}

#[test]
fn totals_ignore_row_order() {
    let rows = sample_rows();
    let forward = sum_by(&Dataset::from_rows(rows.clone()), GroupKey::Category).unwrap();
    let mut reversed_rows = rows.clone();
    reversed_rows.reverse();
    let reversed = sum_by(&Dataset::from_rows(reversed_rows), GroupKey::Category).unwrap();
    let mut rotated_rows = rows;
    rotated_rows.rotate_left(2);
    let rotated = sum_by(&Dataset::from_rows(rotated_rows), GroupKey::Category).unwrap();

    assert_eq!(forward, reversed);
    assert_eq!(forward, rotated);
}

#[test]
fn partial_totals_merge_to_the_whole() {
    let dataset = Dataset::from_rows(sample_rows());
    let whole = sum_by(&dataset, GroupKey::Date).unwrap();
    for split in 1..dataset.len() {
        let (left, right) = dataset.split_at(split);
        let merged = sum_by(&left, GroupKey::Date)
            .unwrap()
            .merge(&sum_by(&right, GroupKey::Date).unwrap());
        assert_eq!(merged, whole, "split at {split}");
    }
}

#[test]
fn inexact_amounts_do_not_depend_on_row_order() {
    let forward = Dataset::from_rows(vec![
        row("food", "01", 0.1),
        row("food", "02", 0.2),
        row("food", "03", 0.3),
    ]);
    let reversed = Dataset::from_rows(vec![
        row("food", "03", 0.3),
        row("food", "02", 0.2),
        row("food", "01", 0.1),
    ]);
    let forward = sum_by(&forward, GroupKey::Category).unwrap();
    let reversed = sum_by(&reversed, GroupKey::Category).unwrap();
    assert_eq!(forward, reversed);
    assert_eq!(forward.pairs(), vec![("food".to_string(), 0.6)]);
}

#[test]
fn grand_total_is_preserved() {
    let dataset = Dataset::from_rows(sample_rows());
    let totals = sum_by(&dataset, GroupKey::Category).unwrap();
    assert!((totals.total() - 26.0).abs() < 1e-9);
}

#[test]
fn undated_entries_group_as_unknown() {
    let mut registry = registry_with(2, 2, &["food"]);
    add(&mut registry, Position::ORIGIN, 4.0, "");
    add(&mut registry, Position::ORIGIN, 6.0, "");
    let dataset = Dataset::from_registry(&registry);
    let totals = sum_by(&dataset, GroupKey::Date).unwrap();
    assert_eq!(totals.get(UNKNOWN_DATE), Some(10.0));
}

#[test]
fn month_table_has_no_month_column() {
    let mut registry = registry_with(2, 2, &["food"]);
    add(&mut registry, Position::ORIGIN, 4.0, "01");
    let dataset = Dataset::from_registry(&registry);
    assert_eq!(
        sum_by(&dataset, GroupKey::Month).unwrap_err(),
        StatsError::MissingColumn(Column::Month)
    );
}

fn year() -> YearBook {
    let mut book = YearBook::default();
    for (month, amount) in [(11, 20.0), (2, 5.0), (7, 1.5), (2, 2.5)] {
        let registry = book.month_mut(month).unwrap();
        let existing = registry.records().next().map(|record| record.position);
        let position = match existing {
            Some(position) => position,
            None => registry.create("bills").unwrap(),
        };
        registry
            .add_entry(position, Entry::new(amount).unwrap())
            .unwrap();
    }
    book
}

#[test]
fn year_totals_are_ordered_by_month() {
    let totals = sum_by(&Dataset::from_year(&year()), GroupKey::Month).unwrap();
    assert_eq!(
        totals.pairs(),
        vec![
            ("2".to_string(), 7.5),
            ("7".to_string(), 1.5),
            ("11".to_string(), 20.0)
        ]
    );
}

#[test]
fn statistics_redraw_is_stable() {
    let book = year();
    let mut view = StatisticsView::open(&book, StatsScope::Month(2)).unwrap();
    let renderer = TextBarChart::ascii();
    let localizer = Localizer::new(Locale::English);
    let size = ChartSize::new(50, 8);

    let first = view.render(&renderer, size, &localizer);
    let second = view.render(&renderer, size, &localizer);
    assert_eq!(first, second);
    assert!(first[0].to_text().contains("Expenses by category"));

    assert!(view.widen(&book).unwrap());
    assert_eq!(view.scope(), StatsScope::Year);
    assert!(!view.widen(&book).unwrap());
    let widened = view.render(&renderer, size, &localizer);
    assert!(widened[1].to_text().contains("Expenses by month"));
}

#[test]
fn empty_month_never_opens_a_view() {
    let book = year();
    assert_eq!(
        StatisticsView::open(&book, StatsScope::Month(5)).unwrap_err(),
        StatsError::EmptyDataset
    );
}
