pub mod components;
pub mod config;
pub mod error;
pub mod flow;
pub mod server;
pub mod shutdown;
pub mod startup;
