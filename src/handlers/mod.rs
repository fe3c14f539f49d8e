//! Command handler modules
//!
//! One module per `beacon` subcommand, called from main.rs.

pub mod config;
pub mod export;
pub mod onboarding;
pub mod serve;

pub use config::{handle_config_show, handle_config_update, ConfigUpdate};
pub use export::handle_export;
pub use onboarding::handle_init;
pub use serve::{handle_serve, ServeOverrides};
