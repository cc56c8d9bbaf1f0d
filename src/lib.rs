#![doc(test(attr(deny(warnings))))]

//! Finance Tracker keeps monthly expense categories on a fixed grid, records
//! entries under them, and aggregates the year into bar-chart statistics.

pub mod cli;
pub mod config;
pub mod errors;
pub mod i18n;
pub mod ledger;
pub mod stats;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Tracker tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
