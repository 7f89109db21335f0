use crate::setting::{Setting, SettingValue};
use ahash::AHashMap;

pub const SECTION_INI_GENERAL: &str = "General";
pub const SECTION_INI_CORE: &str = "Core";
pub const SECTION_INI_INTERFACE: &str = "Interface";
pub const SECTION_INI_DSP: &str = "DSP";
pub const SECTION_BINDINGS: &str = "Android";
pub const SECTION_GFX_HARDWARE: &str = "Hardware";
pub const SECTION_GFX_SETTINGS: &str = "Settings";
pub const SECTION_GFX_ENHANCEMENTS: &str = "Enhancements";
pub const SECTION_STEREOSCOPY: &str = "Stereoscopy";
pub const SECTION_GFX_HACKS: &str = "Hacks";
pub const SECTION_DEBUG: &str = "Debug";
pub const SECTION_WIIMOTE: &str = "Wiimote";
pub const SECTION_CONTROLS: &str = "Controls";
pub const SECTION_PROFILE: &str = "Profile";

/// A named group of settings, the in-memory form of one `[Header]` block.
///
/// The backing map is unordered; ordering is imposed at serialization time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingSection {
    name: String,
    settings: AHashMap<String, Setting>,
}

impl SettingSection {
    pub fn new(name: &str) -> Self {
        SettingSection {
            name: name.to_owned(),
            settings: AHashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts or overwrites. Nothing checks that a re-put keeps the same
    /// value type; the last put wins.
    pub fn put_setting(&mut self, setting: Setting) {
        self.settings.insert(setting.key().to_owned(), setting);
    }

    /// Absence means "use the compiled-in default", never an error.
    pub fn get_setting(&self, key: &str) -> Option<&Setting> {
        self.settings.get(key)
    }

    pub fn get_setting_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.settings.get_mut(key)
    }

    /// Copies every setting from `other` into this section, overwriting on
    /// key collision and retagging each copy with this section's name.
    pub fn merge_section(&mut self, other: &SettingSection) {
        let name = self.name.clone();
        for setting in other.settings.values() {
            self.put_setting(Setting::new(setting.key(), &name, setting.value().clone()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get_setting(key)
            .and_then(|setting| setting.value().as_bool())
            .unwrap_or(default)
    }

    pub fn i32_or(&self, key: &str, default: i32) -> i32 {
        self.get_setting(key)
            .and_then(|setting| setting.value().as_i32())
            .unwrap_or(default)
    }

    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.get_setting(key)
            .and_then(|setting| setting.value().as_f32())
            .unwrap_or(default)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.get_setting(key) {
            Some(setting) => setting.value().to_string(),
            None => default.to_owned(),
        }
    }
}
