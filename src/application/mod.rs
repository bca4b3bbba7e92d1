// Technical indicators over price tables
pub mod indicators;
