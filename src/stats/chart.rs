use std::fmt;

use super::aggregate::GroupedTotals;

const MIN_WIDTH: usize = 24;
const MIN_HEIGHT: usize = 3;
const MAX_LABEL_WIDTH: usize = 18;

/// What to draw: a titled bar chart of grouped totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub totals: GroupedTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: usize,
    pub height: usize,
}

impl ChartSize {
    /// Sizes below the drawable minimum are clamped up.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
        }
    }
}

/// A fixed-size raster of character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    width: usize,
    height: usize,
    cells: Vec<Vec<char>>,
}

impl RenderedChart {
    pub fn blank(size: ChartSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            cells: vec![vec![' '; size.width]; size.height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Writes `text` starting at `(row, col)`, clipping at the right edge.
    pub fn put_str(&mut self, row: usize, col: usize, text: &str) {
        let Some(line) = self.cells.get_mut(row) else {
            return;
        };
        for (offset, ch) in text.chars().enumerate() {
            match line.get_mut(col + offset) {
                Some(cell) => *cell = ch,
                None => break,
            }
        }
    }

    pub fn line(&self, row: usize) -> Option<String> {
        self.cells.get(row).map(|cells| cells.iter().collect())
    }

    /// Text form with trailing blanks and trailing empty lines removed.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self
            .cells
            .iter()
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

impl fmt::Display for RenderedChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Turns a chart description into an image.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, size: ChartSize) -> RenderedChart;
}

/// Horizontal bar chart drawn with a single fill character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBarChart {
    pub fill: char,
}

impl Default for TextBarChart {
    fn default() -> Self {
        Self { fill: '█' }
    }
}

impl TextBarChart {
    /// ASCII-only variant for terminals without block glyphs.
    pub fn ascii() -> Self {
        Self { fill: '#' }
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

impl ChartRenderer for TextBarChart {
    fn render(&self, spec: &ChartSpec, size: ChartSize) -> RenderedChart {
        let mut image = RenderedChart::blank(size);
        image.put_str(0, 0, &clip(&spec.title, size.width));
        if size.height < MIN_HEIGHT {
            return image;
        }

        let labels: Vec<String> = spec
            .totals
            .groups()
            .iter()
            .map(|(value, _)| value.to_string())
            .collect();
        let values: Vec<String> = spec
            .totals
            .groups()
            .iter()
            .map(|(_, amount)| format!("{amount:.2}"))
            .collect();

        let label_width = labels
            .iter()
            .map(|label| label.chars().count())
            .chain(std::iter::once(spec.x_label.chars().count()))
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH)
            .min(size.width / 3);
        let value_width = values
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0);
        let bar_space = size
            .width
            .saturating_sub(label_width + 3 + value_width + 1)
            .max(1);
        let peak = spec
            .totals
            .groups()
            .iter()
            .map(|(_, amount)| amount.abs())
            .fold(0.0_f64, f64::max);

        let header = format!(
            "{:<label_width$} | {}",
            clip(&spec.x_label, label_width),
            spec.y_label
        );
        image.put_str(1, 0, &header);

        let rows_available = size.height - 2;
        let groups = spec.totals.len();
        let shown = if groups > rows_available {
            rows_available.saturating_sub(1)
        } else {
            groups
        };

        for (idx, (label, value)) in labels.iter().zip(&values).take(shown).enumerate() {
            let amount = spec.totals.groups()[idx].1;
            let length = if peak > 0.0 {
                ((amount.abs() / peak) * bar_space as f64).round() as usize
            } else {
                0
            };
            let bar: String = std::iter::repeat(self.fill).take(length).collect();
            let line = format!(
                "{:<label_width$} | {bar} {value}",
                clip(label, label_width)
            );
            image.put_str(idx + 2, 0, &line);
        }
        if shown < groups {
            image.put_str(
                size.height - 1,
                0,
                &format!("... {} more", groups - shown),
            );
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CategoryRegistry, Entry};
    use crate::stats::{sum_records_by, GroupKey};

    fn spec() -> ChartSpec {
        let mut registry = CategoryRegistry::default();
        let food = registry.create("food").unwrap();
        let rent = registry.create("rent").unwrap();
        registry.add_entry(food, Entry::new(15.0).unwrap()).unwrap();
        registry.add_entry(rent, Entry::new(30.0).unwrap()).unwrap();
        ChartSpec {
            title: "Expenses by category".into(),
            x_label: "category".into(),
            y_label: "amount".into(),
            totals: sum_records_by(registry.records(), GroupKey::Category).unwrap(),
        }
    }

    #[test]
    fn bars_scale_to_largest_total() {
        let chart = TextBarChart::ascii().render(&spec(), ChartSize::new(41, 6));
        let food = chart.line(2).unwrap();
        let rent = chart.line(3).unwrap();
        assert!(food.starts_with("food"));
        assert!(food.contains("15.00"));
        assert!(rent.contains("30.00"));
        let count = |line: &str| line.chars().filter(|ch| *ch == '#').count();
        assert_eq!(count(&rent), 2 * count(&food));
    }

    #[test]
    fn raster_has_requested_size() {
        let chart = TextBarChart::default().render(&spec(), ChartSize::new(50, 10));
        assert_eq!(chart.width(), 50);
        assert_eq!(chart.height(), 10);
        assert!(chart.line(9).unwrap().trim().is_empty());
        assert_eq!(chart.to_text().lines().count(), 4);
    }

    #[test]
    fn overflowing_groups_are_summarised() {
        let chart = TextBarChart::ascii().render(&spec(), ChartSize::new(40, 3));
        assert_eq!(chart.line(2).unwrap().trim_end(), "... 2 more");
    }

    #[test]
    fn tiny_sizes_are_clamped() {
        let size = ChartSize::new(1, 1);
        assert_eq!(size, ChartSize::new(MIN_WIDTH, MIN_HEIGHT));
    }
}
