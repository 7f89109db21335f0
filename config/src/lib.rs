//! Settings persistence for the emulator: the typed settings model, the
//! INI documents it's stored in, and the merge rules between the global
//! configuration and per-game overrides.
//!
//! All I/O here is best-effort. Reads of missing or damaged files produce
//! empty or partial documents, writes log their failures, and nothing in
//! this crate panics on bad input; the emulator must come up with whatever
//! configuration can be recovered.

pub mod dirs;
pub mod file;
pub mod game_dirs;
pub mod ini;
pub mod keys;
pub mod section;
pub mod setting;
pub mod settings;

pub use dirs::{Dirs, DirsError};
pub use ini::IniFile;
pub use section::SettingSection;
pub use setting::{Setting, SettingValue};
pub use settings::Settings;

/// Hook into the running emulator core, called after configuration edits
/// land on disk so the core re-reads them.
pub trait CoreNotify {
    fn reload_config(&self);
}

/// Stand-in for when no core is running; edits just stay on disk.
pub struct NoCore;

impl CoreNotify for NoCore {
    fn reload_config(&self) {}
}
