pub mod alerts;
pub mod cards;
pub mod catalog;
pub mod deposits;
pub mod lending;
pub mod market;
