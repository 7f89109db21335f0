//! The merged settings model the UI operates on: one [`Settings`] instance
//! holds every section from the global configuration files, optionally
//! overlaid with a game's generic and custom overrides.

use crate::dirs::Dirs;
use crate::file::{
    self, SectionMap, FILE_DOLPHIN, FILE_GCPAD, FILE_GFX, FILE_WIIMOTE,
};
use crate::keys;
use crate::section::{
    SettingSection, SECTION_CONTROLS, SECTION_GFX_ENHANCEMENTS, SECTION_GFX_HACKS,
    SECTION_GFX_HARDWARE, SECTION_GFX_SETTINGS, SECTION_PROFILE, SECTION_STEREOSCOPY,
};
use crate::setting::{Setting, SettingValue};
use ahash::AHashMap;

const GLOBAL_FILES: [&str; 4] = [FILE_DOLPHIN, FILE_GFX, FILE_GCPAD, FILE_WIIMOTE];

/// Which global file a section belongs to when it wasn't seen during load.
/// New sections created by the UI get routed by name.
fn default_file(section_name: &str) -> &'static str {
    match section_name {
        SECTION_GFX_HARDWARE
        | SECTION_GFX_SETTINGS
        | SECTION_GFX_ENHANCEMENTS
        | SECTION_STEREOSCOPY
        | SECTION_GFX_HACKS => FILE_GFX,
        name if name.starts_with("Wiimote") => FILE_WIIMOTE,
        name if name.starts_with("GCPad") => FILE_GCPAD,
        _ => FILE_DOLPHIN,
    }
}

/// All loaded settings, keyed by section name.
///
/// In global scope (`game_id` is `None`) the sections come from the four
/// `Config/*.ini` files and saving writes them back, grouped by the file
/// each section was loaded from. In game scope the sections are the global
/// ones overlaid with the game's generic defaults and custom overrides, and
/// saving writes only the custom override document.
pub struct Settings {
    game_id: Option<String>,
    sections: SectionMap,
    section_files: AHashMap<String, &'static str>,
    log: slog::Logger,
}

impl Settings {
    pub fn new(log: &slog::Logger) -> Self {
        Settings {
            game_id: None,
            sections: SectionMap::new(),
            section_files: AHashMap::new(),
            log: log.clone(),
        }
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|(_, section)| section.is_empty())
    }

    pub fn section(&self, name: &str) -> Option<&SettingSection> {
        self.sections.get(name)
    }

    /// Fetches a section, creating it empty if the loaded files never
    /// mentioned it.
    pub fn section_mut(&mut self, name: &str) -> &mut SettingSection {
        self.sections
            .entry(name.to_owned())
            .or_insert_with(|| SettingSection::new(name))
    }

    pub fn sections(&self) -> impl Iterator<Item = &SettingSection> {
        self.sections.values()
    }

    /// Loads everything relevant to `game_id` (or the global configuration
    /// when `None`), replacing the current contents.
    ///
    /// Overlay order within game scope is fixed: global files, then the
    /// shipped region-free generic file, then the exact-id generic file,
    /// then the user's custom file. Later sources win key by key.
    pub fn load(&mut self, dirs: &Dirs, game_id: Option<&str>) {
        self.game_id = game_id.map(str::to_owned);
        self.sections.clear();
        self.section_files.clear();

        for file_name in GLOBAL_FILES {
            let loaded = file::read_settings(&self.log, dirs, file_name);
            for (name, section) in loaded {
                self.section_files.insert(name.clone(), file_name);
                self.merge_in(name, &section);
            }
        }

        if let Some(game_id) = game_id {
            let game_id = game_id.to_owned();
            for loaded in [
                file::read_generic_game_settings_all_regions(&self.log, dirs, &game_id),
                file::read_generic_game_settings(&self.log, dirs, &game_id),
                file::read_custom_game_settings(&self.log, dirs, &game_id),
            ] {
                for (name, section) in loaded {
                    self.merge_in(name, &section);
                }
            }
            self.load_wiimote_profiles(dirs);
        }
    }

    fn merge_in(&mut self, name: String, section: &SettingSection) {
        self.sections
            .entry(name.clone())
            .or_insert_with(|| SettingSection::new(&name))
            .merge_section(section);
    }

    /// Resolves the per-pad profile indirection: for each pad whose
    /// `WiimoteProfile<pad>` key is set, the named profile file's `[Profile]`
    /// section is exposed here as `Profile<pad>`. A dangling profile name
    /// still produces the section, with the extension reset to `None`, so
    /// the controller UI always has something to bind to.
    fn load_wiimote_profiles(&mut self, dirs: &Dirs) {
        for pad in 1..=4u32 {
            let profile_key = format!("{}{pad}", keys::WIIMOTE_PROFILE);
            let profile = match self
                .sections
                .get(SECTION_CONTROLS)
                .and_then(|controls| controls.get_setting(&profile_key))
            {
                Some(setting) => setting.value().to_string(),
                None => continue,
            };

            let name = format!("{SECTION_PROFILE}{pad}");
            let section = self
                .sections
                .entry(name.clone())
                .or_insert_with(|| SettingSection::new(&name));
            match file::read_wiimote_profile(&self.log, dirs, &profile)
                .remove(SECTION_PROFILE)
            {
                Some(loaded) => section.merge_section(&loaded),
                None => {
                    section.put_setting(Setting::new(
                        keys::WIIMOTE_EXTENSION,
                        &name,
                        SettingValue::Str("None".to_owned()),
                    ));
                }
            }
        }
    }

    /// Writes the current contents back out. Best-effort; failures have
    /// already been logged by the time this returns.
    pub fn save(&self, dirs: &Dirs) {
        match &self.game_id {
            Some(game_id) => {
                file::save_custom_game_settings(&self.log, dirs, game_id, &self.sections);
            }
            None => {
                let mut by_file: AHashMap<&'static str, SectionMap> = AHashMap::new();
                for (name, section) in &self.sections {
                    let file_name = self
                        .section_files
                        .get(name)
                        .copied()
                        .unwrap_or_else(|| default_file(name));
                    by_file
                        .entry(file_name)
                        .or_default()
                        .insert(name.clone(), section.clone());
                }
                for (file_name, sections) in &by_file {
                    file::save_file(&self.log, dirs, file_name, sections);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{custom_game_settings_path, settings_path, wiimote_profile_path};
    use crate::section::SECTION_INI_CORE;
    use slog::o;
    use std::fs;

    fn log() -> slog::Logger {
        slog::Logger::root(slog::Discard, o!())
    }

    fn dirs() -> (tempfile::TempDir, Dirs) {
        let root = tempfile::tempdir().unwrap();
        let dirs = Dirs::new(root.path().join("user"), root.path().join("sys"));
        dirs.create_user_tree().unwrap();
        fs::create_dir_all(dirs.sys_game_settings_dir()).unwrap();
        (root, dirs)
    }

    #[test]
    fn global_load_records_each_sections_file_of_origin() {
        let (_root, dirs) = dirs();
        fs::write(settings_path(&dirs, FILE_DOLPHIN), "[Core]\nCPUThread = True\n").unwrap();
        fs::write(settings_path(&dirs, FILE_GFX), "[Settings]\nShowFPS = False\n").unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, None);
        assert!(settings.section(SECTION_INI_CORE).unwrap().bool_or("CPUThread", false));

        settings
            .section_mut(SECTION_GFX_SETTINGS)
            .put_setting(Setting::new("ShowFPS", SECTION_GFX_SETTINGS, true.into()));
        settings.save(&dirs);

        let gfx = fs::read_to_string(settings_path(&dirs, FILE_GFX)).unwrap();
        assert!(gfx.contains("ShowFPS = True"));
        let dolphin = fs::read_to_string(settings_path(&dirs, FILE_DOLPHIN)).unwrap();
        assert!(!dolphin.contains("ShowFPS"));
    }

    #[test]
    fn new_sections_are_routed_to_a_file_by_name() {
        let (_root, dirs) = dirs();
        let mut settings = Settings::new(&log());
        settings.load(&dirs, None);
        settings
            .section_mut(SECTION_GFX_HACKS)
            .put_setting(Setting::new("EFBAccessEnable", SECTION_GFX_HACKS, false.into()));
        settings
            .section_mut("Wiimote1")
            .put_setting(Setting::new("Source", "Wiimote1", 1.into()));
        settings.save(&dirs);

        assert!(fs::read_to_string(settings_path(&dirs, FILE_GFX))
            .unwrap()
            .contains("[Hacks]"));
        assert!(fs::read_to_string(settings_path(&dirs, FILE_WIIMOTE))
            .unwrap()
            .contains("[Wiimote1]"));
    }

    #[test]
    fn generic_game_settings_override_globals() {
        let (_root, dirs) = dirs();
        fs::write(settings_path(&dirs, FILE_DOLPHIN), "[Core]\nCPUThread = True\n").unwrap();
        fs::write(
            dirs.sys_game_settings_dir().join("RMGE01.ini"),
            "[Core]\nCPUThread = False\n",
        )
        .unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, Some("RMGE01"));
        assert!(!settings.section(SECTION_INI_CORE).unwrap().bool_or("CPUThread", true));
    }

    #[test]
    fn custom_game_settings_override_generics() {
        let (_root, dirs) = dirs();
        fs::write(
            dirs.sys_game_settings_dir().join("RMGE01.ini"),
            "[Core]\nCPUThread = False\n",
        )
        .unwrap();
        fs::write(
            custom_game_settings_path(&dirs, "RMGE01"),
            "[Core]\nCPUThread = True\n",
        )
        .unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, Some("RMGE01"));
        assert!(settings.section(SECTION_INI_CORE).unwrap().bool_or("CPUThread", false));
    }

    #[test]
    fn exact_region_generics_beat_region_free_ones() {
        let (_root, dirs) = dirs();
        fs::write(
            dirs.sys_game_settings_dir().join("RMG.ini"),
            "[Core]\nEmulationSpeed = 0.5\nMMU = True\n",
        )
        .unwrap();
        fs::write(
            dirs.sys_game_settings_dir().join("RMGE01.ini"),
            "[Core]\nEmulationSpeed = 1.0\n",
        )
        .unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, Some("RMGE01"));
        let core = settings.section(SECTION_INI_CORE).unwrap();
        assert_eq!(core.f32_or("EmulationSpeed", 0.0), 1.0);
        assert!(core.bool_or("MMU", false));
    }

    #[test]
    fn wiimote_profile_indirection_resolves_to_a_profile_section() {
        let (_root, dirs) = dirs();
        fs::write(
            custom_game_settings_path(&dirs, "RMGE01"),
            "[Controls]\nWiimoteProfile1 = RMGE01_Wii1\n",
        )
        .unwrap();
        fs::write(
            wiimote_profile_path(&dirs, "RMGE01_Wii1"),
            "[Profile]\nExtension = Nunchuk\nDevice = Android/5/Touchscreen\n",
        )
        .unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, Some("RMGE01"));
        let profile = settings.section("Profile1").unwrap();
        assert_eq!(profile.string_or("Extension", ""), "Nunchuk");
        let extension = profile.get_setting("Extension").unwrap();
        assert_eq!(extension.section_name(), "Profile1");
    }

    #[test]
    fn dangling_profile_reference_falls_back_to_no_extension() {
        let (_root, dirs) = dirs();
        fs::write(
            custom_game_settings_path(&dirs, "RMGE01"),
            "[Controls]\nWiimoteProfile2 = RMGE01_Wii2\n",
        )
        .unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, Some("RMGE01"));
        assert_eq!(
            settings.section("Profile2").unwrap().string_or("Extension", ""),
            "None"
        );
        assert!(settings.section("Profile1").is_none());
    }

    #[test]
    fn game_scope_save_only_touches_the_custom_document() {
        let (_root, dirs) = dirs();
        fs::write(settings_path(&dirs, FILE_DOLPHIN), "[Core]\nCPUThread = True\n").unwrap();

        let mut settings = Settings::new(&log());
        settings.load(&dirs, Some("RMGE01"));
        settings
            .section_mut(SECTION_INI_CORE)
            .put_setting(Setting::new("CPUThread", SECTION_INI_CORE, false.into()));
        settings.save(&dirs);

        assert!(fs::read_to_string(custom_game_settings_path(&dirs, "RMGE01"))
            .unwrap()
            .contains("CPUThread = False"));
        assert!(fs::read_to_string(settings_path(&dirs, FILE_DOLPHIN))
            .unwrap()
            .contains("CPUThread = True"));
    }
}
