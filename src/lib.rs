pub mod cleanup;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod pdf;
pub mod reconcile;
pub mod run;
pub mod sheet;
