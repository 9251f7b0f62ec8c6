//! Installer settings and host path layout
//!
//! Settings are read from `docstack.toml`:
//! - `--config <path>` when given (must exist)
//! - otherwise `~/.config/docstack/docstack.toml` when present
//! - otherwise built-in defaults

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_settings, parse_settings_str, to_toml};
pub use paths::{DATA_DIRS, Layout};
pub use schema::{
    EncoderSettings, HookSettings, NltkSettings, PathSettings, ReleaseSettings, Settings,
};
pub use store::SettingsStore;
