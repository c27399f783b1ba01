pub mod clients;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod indexer;
pub mod logging;
pub mod mutator;
pub mod whitelist;

mod app;
#[cfg(test)]
mod testutil;

// Re-export App and Config from modules
pub use app::App;
pub use config::Config;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
