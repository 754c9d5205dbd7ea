pub mod common;
pub mod config;
pub mod goal;
pub mod ledger;
