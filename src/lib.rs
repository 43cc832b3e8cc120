// Library for the dispatcher and dashboard binaries (and tests)

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod models;
pub mod node_reader;
pub mod sysinfo_repo;
pub mod transport;
pub mod version;
pub mod worker;
