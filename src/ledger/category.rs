use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

use super::grid::Position;
use super::input::validate_amount;

/// A single expense line recorded under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub amount: f64,
    pub date: String,
    pub description: String,
    pub subcategory: String,
}

impl Entry {
    pub fn new(amount: f64) -> Result<Self, LedgerError> {
        Ok(Self {
            amount: validate_amount(amount)?,
            date: String::new(),
            description: String::new(),
            subcategory: String::new(),
        })
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }
}

/// Partial update of an [`Entry`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub subcategory: Option<String>,
}

impl EntryPatch {
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.subcategory.is_none()
    }

    fn apply(self, entry: &mut Entry) -> Result<(), LedgerError> {
        if let Some(amount) = self.amount {
            entry.amount = validate_amount(amount)?;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(subcategory) = self.subcategory {
            entry.subcategory = subcategory;
        }
        Ok(())
    }
}

/// One category button of a month: its grid cell, its name and its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub position: Position,
    pub name: String,
    pub fields: Vec<Entry>,
}

impl CategoryRecord {
    pub fn new(position: Position, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.fields.iter().map(|entry| entry.amount).sum()
    }

    pub fn entry(&self, index: usize) -> Result<&Entry, LedgerError> {
        self.fields.get(index).ok_or(LedgerError::IndexOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Appends `entry` and returns its index.
    pub fn add_entry(&mut self, entry: Entry) -> Result<usize, LedgerError> {
        validate_amount(entry.amount)?;
        self.fields.push(entry);
        Ok(self.fields.len() - 1)
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<Entry, LedgerError> {
        self.check_index(index)?;
        Ok(self.fields.remove(index))
    }

    pub fn modify_entry(&mut self, index: usize, patch: EntryPatch) -> Result<(), LedgerError> {
        self.check_index(index)?;
        patch.apply(&mut self.fields[index])
    }

    fn check_index(&self, index: usize) -> Result<(), LedgerError> {
        if index >= self.fields.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            });
        }
        Ok(())
    }
}
