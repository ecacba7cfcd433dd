//! Port traits for data access, configuration and report output.

pub mod config_port;
pub mod data_port;
pub mod report_port;
