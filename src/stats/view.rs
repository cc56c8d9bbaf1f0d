use tracing::debug;

use crate::errors::{LedgerError, StatsError};
use crate::i18n::{Locale, Localizer};
use crate::ledger::{Position, YearBook};

use super::aggregate::{sum_by, GroupedTotals};
use super::chart::{ChartRenderer, ChartSize, ChartSpec, RenderedChart};
use super::dataset::Dataset;
use super::{Column, GroupKey};

/// Which slice of the year a statistics view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope {
    Month(u32),
    Category { month: u32, position: Position },
    Year,
}

impl StatsScope {
    /// The next wider scope, if there is one.
    pub fn wider(self) -> Option<StatsScope> {
        match self {
            StatsScope::Category { month, .. } => Some(StatsScope::Month(month)),
            StatsScope::Month(_) => Some(StatsScope::Year),
            StatsScope::Year => None,
        }
    }

    /// Localization key of the button that widens this scope.
    pub fn widen_label(self) -> Option<&'static str> {
        match self {
            StatsScope::Category { .. } => Some("Show month statistics"),
            StatsScope::Month(_) => Some("Show year statistics"),
            StatsScope::Year => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Panel {
    title_key: &'static str,
    x: Column,
    totals: GroupedTotals,
    cache: Option<(ChartSize, Locale, RenderedChart)>,
}

impl Panel {
    fn new(title_key: &'static str, x: Column, totals: GroupedTotals) -> Self {
        Self {
            title_key,
            x,
            totals,
            cache: None,
        }
    }

    fn spec(&self, localizer: &Localizer) -> ChartSpec {
        ChartSpec {
            title: localizer.tr(self.title_key).to_string(),
            x_label: localizer.tr(self.x.key()).to_string(),
            y_label: localizer.tr(Column::Amount.key()).to_string(),
            totals: self.totals.clone(),
        }
    }
}

/// Two side-by-side charts over one scope, aggregated once and redrawn on demand.
#[derive(Debug, Clone)]
pub struct StatisticsView {
    scope: StatsScope,
    panels: Vec<Panel>,
    widened: bool,
}

fn build_panels(book: &YearBook, scope: StatsScope) -> Result<Vec<Panel>, StatsError> {
    let panels = match scope {
        StatsScope::Month(month) => {
            let dataset = Dataset::from_registry(book.month(month)?);
            vec![
                Panel::new(
                    "Expenses by category",
                    Column::Category,
                    sum_by(&dataset, GroupKey::Category)?,
                ),
                Panel::new("Expenses by date", Column::Date, sum_by(&dataset, GroupKey::Date)?),
            ]
        }
        StatsScope::Category { month, position } => {
            let record = book
                .month(month)?
                .get(position)
                .ok_or(LedgerError::NotFound(position))?;
            let dataset = Dataset::from_category(record);
            vec![
                Panel::new(
                    "Expenses by subcategory",
                    Column::Category,
                    sum_by(&dataset, GroupKey::Category)?,
                ),
                Panel::new("Expenses by date", Column::Date, sum_by(&dataset, GroupKey::Date)?),
            ]
        }
        StatsScope::Year => {
            let dataset = Dataset::from_year(book);
            vec![
                Panel::new(
                    "Expenses by category",
                    Column::Category,
                    sum_by(&dataset, GroupKey::Category)?,
                ),
                Panel::new(
                    "Expenses by month",
                    Column::Month,
                    sum_by(&dataset, GroupKey::Month)?,
                ),
            ]
        }
    };
    Ok(panels)
}

impl StatisticsView {
    /// Aggregates `scope`; nothing to plot means the view never opens.
    pub fn open(book: &YearBook, scope: StatsScope) -> Result<Self, StatsError> {
        let panels = build_panels(book, scope)?;
        debug!(?scope, "statistics view opened");
        Ok(Self {
            scope,
            panels,
            widened: false,
        })
    }

    pub fn scope(&self) -> StatsScope {
        self.scope
    }

    pub fn is_widened(&self) -> bool {
        self.widened
    }

    pub fn totals(&self) -> Vec<&GroupedTotals> {
        self.panels.iter().map(|panel| &panel.totals).collect()
    }

    /// Switches to the wider scope once. Returns `false` when nothing changed.
    pub fn widen(&mut self, book: &YearBook) -> Result<bool, StatsError> {
        if self.widened {
            return Ok(false);
        }
        let Some(wider) = self.scope.wider() else {
            return Ok(false);
        };
        self.panels = build_panels(book, wider)?;
        self.scope = wider;
        self.widened = true;
        debug!(scope = ?wider, "statistics view widened");
        Ok(true)
    }

    /// Re-aggregates the current scope after the ledger changed. The widen
    /// step already taken stays taken.
    pub fn refresh(&mut self, book: &YearBook) -> Result<(), StatsError> {
        self.panels = build_panels(book, self.scope)?;
        debug!(scope = ?self.scope, widened = self.widened, "statistics view refreshed");
        Ok(())
    }

    /// Draws every panel at `size`, reusing the cached image when neither the
    /// size nor the locale changed.
    pub fn render(
        &mut self,
        renderer: &dyn ChartRenderer,
        size: ChartSize,
        localizer: &Localizer,
    ) -> Vec<RenderedChart> {
        let locale = localizer.locale();
        self.panels
            .iter_mut()
            .map(|panel| {
                if let Some((cached_size, cached_locale, image)) = &panel.cache {
                    if *cached_size == size && *cached_locale == locale {
                        return image.clone();
                    }
                }
                let image = renderer.render(&panel.spec(localizer), size);
                panel.cache = Some((size, locale, image.clone()));
                image
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Entry;
    use crate::stats::TextBarChart;

    fn book() -> YearBook {
        let mut book = YearBook::default();
        let january = book.month_mut(1).unwrap();
        let food = january.create("food").unwrap();
        january
            .add_entry(food, Entry::new(10.0).unwrap().with_subcategory("cat food"))
            .unwrap();
        let march = book.month_mut(3).unwrap();
        let rent = march.create("rent").unwrap();
        march.add_entry(rent, Entry::new(700.0).unwrap()).unwrap();
        book
    }

    #[test]
    fn empty_month_cannot_be_opened() {
        let book = book();
        assert_eq!(
            StatisticsView::open(&book, StatsScope::Month(2)).unwrap_err(),
            StatsError::EmptyDataset
        );
    }

    #[test]
    fn unknown_category_reported() {
        let book = book();
        let position = Position::new(2, 2);
        assert_eq!(
            StatisticsView::open(&book, StatsScope::Category { month: 1, position }).unwrap_err(),
            StatsError::Ledger(LedgerError::NotFound(position))
        );
    }

    #[test]
    fn widening_runs_once() {
        let book = book();
        let mut view = StatisticsView::open(
            &book,
            StatsScope::Category {
                month: 1,
                position: Position::ORIGIN,
            },
        )
        .unwrap();
        assert_eq!(view.totals()[0].pairs(), vec![("cat food".to_string(), 10.0)]);
        assert!(view.widen(&book).unwrap());
        assert_eq!(view.scope(), StatsScope::Month(1));
        assert_eq!(view.totals()[0].pairs(), vec![("food".to_string(), 10.0)]);
        assert!(!view.widen(&book).unwrap());
        assert_eq!(view.scope(), StatsScope::Month(1));
    }

    #[test]
    fn refresh_keeps_the_widen_step() {
        let mut book = book();
        let mut view = StatisticsView::open(
            &book,
            StatsScope::Category {
                month: 1,
                position: Position::ORIGIN,
            },
        )
        .unwrap();
        assert!(view.widen(&book).unwrap());

        let january = book.month_mut(1).unwrap();
        january
            .add_entry(Position::ORIGIN, Entry::new(5.0).unwrap())
            .unwrap();
        view.refresh(&book).unwrap();

        assert!(view.is_widened());
        assert_eq!(view.scope(), StatsScope::Month(1));
        assert_eq!(view.totals()[0].pairs(), vec![("food".to_string(), 15.0)]);
        assert!(!view.widen(&book).unwrap());
        assert_eq!(view.scope(), StatsScope::Month(1));
    }

    #[test]
    fn year_view_groups_by_month() {
        let book = book();
        let mut view = StatisticsView::open(&book, StatsScope::Month(3)).unwrap();
        view.widen(&book).unwrap();
        assert_eq!(
            view.totals()[1].pairs(),
            vec![("1".to_string(), 10.0), ("3".to_string(), 700.0)]
        );
    }

    #[test]
    fn redraw_is_idempotent() {
        let book = book();
        let mut view = StatisticsView::open(&book, StatsScope::Year).unwrap();
        let renderer = TextBarChart::default();
        let localizer = Localizer::default();
        let first = view.render(&renderer, ChartSize::new(60, 8), &localizer);
        let second = view.render(&renderer, ChartSize::new(60, 8), &localizer);
        assert_eq!(first, second);
        let wider = view.render(&renderer, ChartSize::new(80, 8), &localizer);
        assert_eq!(wider[0].width(), 80);
    }

    #[test]
    fn titles_follow_locale() {
        let book = book();
        let mut view = StatisticsView::open(&book, StatsScope::Month(1)).unwrap();
        let renderer = TextBarChart::default();
        let size = ChartSize::new(60, 6);
        let english = view.render(&renderer, size, &Localizer::default());
        let russian = view.render(&renderer, size, &Localizer::new(Locale::Russian));
        assert!(english[0].to_text().starts_with("Expenses by category"));
        assert!(russian[0].to_text().starts_with("Расходы по категориям"));
    }
}
