pub mod data_source;
pub mod indicators;
pub mod risk;
pub mod sentiment;
pub mod session;
