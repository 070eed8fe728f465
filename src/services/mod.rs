pub mod aggregation;
pub mod github;
pub mod queries;
pub mod svg;
