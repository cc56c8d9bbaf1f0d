use std::{collections::BTreeMap, fmt};

use tracing::debug;

use crate::errors::LedgerError;

use super::category::{CategoryRecord, Entry, EntryPatch};
use super::grid::{GridPositionAllocator, GridShape, Position};
use super::input::validate_name;

/// Coarse lifecycle of a month's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Empty,
    Populated(usize),
    Full,
}

/// Change notifications delivered to observers after each mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Created { position: Position, name: String },
    Deleted { position: Position, name: String },
    Moved { from: Position, to: Position },
    Selected(Option<Position>),
    EntryAdded { position: Position, index: usize },
    EntryRemoved { position: Position, index: usize },
    EntryModified { position: Position, index: usize },
}

pub trait RegistryObserver {
    fn notify(&mut self, event: &RegistryEvent);
}

impl<F> RegistryObserver for F
where
    F: FnMut(&RegistryEvent),
{
    fn notify(&mut self, event: &RegistryEvent) {
        self(event)
    }
}

/// Categories of one month keyed by grid cell, kept free of holes.
pub struct CategoryRegistry {
    allocator: GridPositionAllocator,
    records: BTreeMap<Position, CategoryRecord>,
    selected: Option<Position>,
    observers: Vec<Box<dyn RegistryObserver>>,
}

impl fmt::Debug for CategoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryRegistry")
            .field("allocator", &self.allocator)
            .field("records", &self.records)
            .field("selected", &self.selected)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(GridShape::default())
    }
}

impl CategoryRegistry {
    pub fn new(shape: GridShape) -> Self {
        Self {
            allocator: GridPositionAllocator::new(shape),
            records: BTreeMap::new(),
            selected: None,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl RegistryObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn shape(&self) -> GridShape {
        self.allocator.shape()
    }

    pub fn next_free(&self) -> Position {
        self.allocator.next_free()
    }

    /// Cell where a new category would land, or `None` when the grid is full.
    pub fn create_affordance(&self) -> Option<Position> {
        (!self.allocator.is_full()).then(|| self.allocator.next_free())
    }

    pub fn state(&self) -> RegistryState {
        match self.records.len() {
            0 => RegistryState::Empty,
            _ if self.allocator.is_full() => RegistryState::Full,
            count => RegistryState::Populated(count),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.records.contains_key(&position)
    }

    pub fn get(&self, position: Position) -> Option<&CategoryRecord> {
        self.records.get(&position)
    }

    /// Records in row-major order.
    pub fn records(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.records.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.values().map(|record| record.name.as_str()).collect()
    }

    pub fn entry_count(&self) -> usize {
        self.records.values().map(CategoryRecord::len).sum()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&CategoryRecord> {
        self.selected.and_then(|position| self.records.get(&position))
    }

    pub fn create(&mut self, name: &str) -> Result<Position, LedgerError> {
        let name = validate_name(name)?;
        let position = self.allocator.allocate()?;
        self.records
            .insert(position, CategoryRecord::new(position, name.clone()));
        self.selected = Some(position);
        debug!(%position, name = %name, "category created");
        self.emit(RegistryEvent::Created { position, name });
        self.emit(RegistryEvent::Selected(Some(position)));
        Ok(position)
    }

    /// Removes the category at `position` and shifts every later one back a cell.
    pub fn delete(&mut self, position: Position) -> Result<CategoryRecord, LedgerError> {
        let removed = self
            .records
            .remove(&position)
            .ok_or(LedgerError::NotFound(position))?;
        let shape = self.shape();

        let trailing: Vec<Position> = self
            .records
            .range(position..)
            .map(|(key, _)| *key)
            .collect();
        let mut moves = Vec::with_capacity(trailing.len());
        for from in trailing {
            let Some(to) = shape.step_back(from) else {
                continue;
            };
            if let Some(mut record) = self.records.remove(&from) {
                record.position = to;
                self.records.insert(to, record);
                moves.push((from, to));
            }
        }
        self.allocator.release();

        let previous_selection = self.selected;
        self.selected = match previous_selection {
            Some(selected) if selected == position => {
                (!self.records.is_empty()).then_some(Position::ORIGIN)
            }
            Some(selected) if selected > position => shape.step_back(selected),
            other => other,
        };

        debug!(
            %position,
            name = %removed.name,
            shifted = moves.len(),
            "category deleted"
        );
        self.emit(RegistryEvent::Deleted {
            position,
            name: removed.name.clone(),
        });
        for (from, to) in moves {
            self.emit(RegistryEvent::Moved { from, to });
        }
        if self.selected != previous_selection || previous_selection == Some(position) {
            self.emit(RegistryEvent::Selected(self.selected));
        }
        Ok(removed)
    }

    pub fn delete_selected(&mut self) -> Result<CategoryRecord, LedgerError> {
        let position = self.selected.ok_or(LedgerError::NoSelection)?;
        self.delete(position)
    }

    pub fn select(&mut self, position: Position) -> Result<&CategoryRecord, LedgerError> {
        if !self.records.contains_key(&position) {
            return Err(LedgerError::NotFound(position));
        }
        self.selected = Some(position);
        self.emit(RegistryEvent::Selected(Some(position)));
        self.records
            .get(&position)
            .ok_or(LedgerError::NotFound(position))
    }

    pub fn add_entry(&mut self, position: Position, entry: Entry) -> Result<usize, LedgerError> {
        let index = self.record_mut(position)?.add_entry(entry)?;
        debug!(%position, index, "entry added");
        self.emit(RegistryEvent::EntryAdded { position, index });
        Ok(index)
    }

    pub fn remove_entry(&mut self, position: Position, index: usize) -> Result<Entry, LedgerError> {
        let entry = self.record_mut(position)?.remove_entry(index)?;
        debug!(%position, index, "entry removed");
        self.emit(RegistryEvent::EntryRemoved { position, index });
        Ok(entry)
    }

    pub fn modify_entry(
        &mut self,
        position: Position,
        index: usize,
        patch: EntryPatch,
    ) -> Result<(), LedgerError> {
        self.record_mut(position)?.modify_entry(index, patch)?;
        debug!(%position, index, "entry modified");
        self.emit(RegistryEvent::EntryModified { position, index });
        Ok(())
    }

    fn record_mut(&mut self, position: Position) -> Result<&mut CategoryRecord, LedgerError> {
        self.records
            .get_mut(&position)
            .ok_or(LedgerError::NotFound(position))
    }

    fn emit(&mut self, event: RegistryEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}
