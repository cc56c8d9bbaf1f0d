use chrono::Month;

use crate::errors::LedgerError;

use super::grid::GridShape;
use super::registry::CategoryRegistry;

pub const MONTHS_IN_YEAR: u32 = 12;

/// Untranslated month name, used as a localization key.
pub fn month_key(month: u32) -> Result<&'static str, LedgerError> {
    u8::try_from(month)
        .ok()
        .and_then(|value| Month::try_from(value).ok())
        .map(|month| month.name())
        .ok_or(LedgerError::InvalidMonth(month))
}

/// Twelve month registries sharing one grid shape.
#[derive(Debug)]
pub struct YearBook {
    months: Vec<CategoryRegistry>,
    current: u32,
}

impl Default for YearBook {
    fn default() -> Self {
        Self::new(GridShape::default())
    }
}

impl YearBook {
    pub fn new(shape: GridShape) -> Self {
        Self {
            months: (0..MONTHS_IN_YEAR)
                .map(|_| CategoryRegistry::new(shape))
                .collect(),
            current: 1,
        }
    }

    pub fn shape(&self) -> GridShape {
        self.months[0].shape()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn set_current(&mut self, month: u32) -> Result<(), LedgerError> {
        Self::check(month)?;
        self.current = month;
        Ok(())
    }

    pub fn month(&self, month: u32) -> Result<&CategoryRegistry, LedgerError> {
        Self::check(month)?;
        Ok(&self.months[(month - 1) as usize])
    }

    pub fn month_mut(&mut self, month: u32) -> Result<&mut CategoryRegistry, LedgerError> {
        Self::check(month)?;
        Ok(&mut self.months[(month - 1) as usize])
    }

    pub fn current_registry(&self) -> &CategoryRegistry {
        &self.months[(self.current - 1) as usize]
    }

    pub fn current_registry_mut(&mut self) -> &mut CategoryRegistry {
        &mut self.months[(self.current - 1) as usize]
    }

    /// `(month, registry)` pairs, January first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &CategoryRegistry)> {
        (1..).zip(self.months.iter())
    }

    fn check(month: u32) -> Result<(), LedgerError> {
        if (1..=MONTHS_IN_YEAR).contains(&month) {
            Ok(())
        } else {
            Err(LedgerError::InvalidMonth(month))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_are_independent() {
        let mut book = YearBook::default();
        book.month_mut(3).unwrap().create("rent").unwrap();
        assert_eq!(book.month(3).unwrap().len(), 1);
        assert!(book.month(4).unwrap().is_empty());
        assert_eq!(book.iter().count(), 12);
    }

    #[test]
    fn current_month_switches() {
        let mut book = YearBook::default();
        assert_eq!(book.current(), 1);
        book.set_current(8).unwrap();
        book.current_registry_mut().create("dog").unwrap();
        assert_eq!(book.month(8).unwrap().names(), vec!["dog"]);
        assert_eq!(book.set_current(13), Err(LedgerError::InvalidMonth(13)));
        assert_eq!(book.current(), 8);
    }

    #[test]
    fn month_keys_follow_calendar() {
        assert_eq!(month_key(1).unwrap(), "January");
        assert_eq!(month_key(12).unwrap(), "December");
        assert!(month_key(0).is_err());
    }
}
