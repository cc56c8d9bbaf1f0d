//! Month ledgers: the category grid, its records, and the year that holds them.

pub mod category;
pub mod grid;
pub mod input;
pub mod registry;
pub mod year;

pub use category::{CategoryRecord, Entry, EntryPatch};
pub use grid::{GridPositionAllocator, GridShape, Position};
pub use input::EntryForm;
pub use registry::{CategoryRegistry, RegistryEvent, RegistryObserver, RegistryState};
pub use year::{month_key, YearBook, MONTHS_IN_YEAR};
