pub mod config;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "deposits")]
pub mod deposits;

#[cfg(feature = "cards")]
pub mod cards;

#[cfg(feature = "market")]
pub mod market;

#[cfg(feature = "alerts")]
pub mod alerts;

pub use error::BankDeskError;
pub use types::*;

/// Standard result type for all bankdesk operations
pub type BankDeskResult<T> = Result<T, BankDeskError>;
