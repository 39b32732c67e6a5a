pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod exposition;
pub mod run;
pub mod shutdown;
