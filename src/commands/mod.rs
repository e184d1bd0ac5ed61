//! Command implementations.

pub mod prices;

pub use prices::PricesCommand;
