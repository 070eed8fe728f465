pub mod calendar;
pub mod repo;
pub mod stats;
