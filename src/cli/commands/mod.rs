//! CLI command implementations

pub mod clear;
pub mod config;
pub mod get;
pub mod index;
pub mod refetch;
pub mod report;
pub mod status;

pub use clear::execute as clear;
pub use config::execute as config;
pub use get::execute as get;
pub use index::execute as index;
pub use refetch::execute as refetch;
pub use report::execute as report;
pub use status::execute as status;
