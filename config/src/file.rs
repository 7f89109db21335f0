//! Reading and writing the settings documents: the global `Config/*.ini`
//! files, the per-game override documents, and the Wii Remote profile files
//! they point at. Parsing is lenient and never fails the caller; writing is
//! best-effort and logged.

use crate::dirs::Dirs;
use crate::ini::{classify_line, IniFile, Line};
use crate::keys;
use crate::section::{SettingSection, SECTION_CONTROLS, SECTION_INI_CORE, SECTION_PROFILE};
use crate::setting::{Setting, SettingValue};
use ahash::AHashMap;
use slog::{error, warn};
use std::{fs, path::PathBuf};

pub const FILE_DOLPHIN: &str = "Dolphin";
pub const FILE_GFX: &str = "GFX";
pub const FILE_GCPAD: &str = "GCPadNew";
pub const FILE_WIIMOTE: &str = "WiimoteNew";

/// The template cloned when a game needs a Wii Remote profile of its own.
pub const WIIMOTE_PROFILE_TEMPLATE: &str = "WiimoteProfile";

/// A whole parsed document: section name → section.
pub type SectionMap = AHashMap<String, SettingSection>;

/// Per-game documents store the graphics sections under prefixed on-disk
/// names. In memory the generic names are used everywhere, so these get
/// remapped on read and the remap reversed on write. Applies to custom-game
/// documents only, never to the global configuration files.
static SECTION_ALIASES: [(&str, &str); 6] = [
    ("Hardware", "Video_Hardware"),
    ("Settings", "Video_Settings"),
    ("Enhancements", "Video_Enhancements"),
    ("Stereoscopy", "Video_Stereoscopy"),
    ("Hacks", "Video_Hacks"),
    ("GameSpecific", "Video"),
];

fn section_name_to_disk(name: &str) -> &str {
    SECTION_ALIASES
        .iter()
        .find(|(generic, _)| *generic == name)
        .map_or(name, |(_, disk)| disk)
}

fn section_name_from_disk(name: &str) -> &str {
    SECTION_ALIASES
        .iter()
        .find(|(_, disk)| *disk == name)
        .map_or(name, |(generic, _)| generic)
}

pub fn settings_path(dirs: &Dirs, file_name: &str) -> PathBuf {
    dirs.config_dir().join(format!("{file_name}.ini"))
}

pub fn custom_game_settings_path(dirs: &Dirs, game_id: &str) -> PathBuf {
    dirs.game_settings_dir().join(format!("{game_id}.ini"))
}

fn generic_game_settings_path(dirs: &Dirs, game_id: &str) -> PathBuf {
    dirs.sys_game_settings_dir().join(format!("{game_id}.ini"))
}

fn generic_game_settings_all_regions_path(dirs: &Dirs, game_id: &str) -> PathBuf {
    // The first 3 characters of a game id are shared across regions.
    let prefix = game_id.get(..3).unwrap_or(game_id);
    dirs.sys_game_settings_dir().join(format!("{prefix}.ini"))
}

pub fn wiimote_profile_path(dirs: &Dirs, profile: &str) -> PathBuf {
    dirs.wiimote_profiles_dir().join(format!("{profile}.ini"))
}

/// Parses one settings document into typed sections.
///
/// A missing or unreadable file is an empty document, not an error.
/// Malformed lines are skipped one at a time. With `custom_game` set,
/// section names go through the alias table.
pub fn read_file(log: &slog::Logger, path: &std::path::Path, custom_game: bool) -> SectionMap {
    let mut sections = SectionMap::new();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                log, "couldn't read settings file";
                "path" => %path.display(), "err" => %err,
            );
            return sections;
        }
    };

    let mut current: Option<String> = None;
    for line in text.lines() {
        match classify_line(line) {
            Line::Section(raw_name) => {
                let name = if custom_game {
                    section_name_from_disk(raw_name)
                } else {
                    raw_name
                };
                sections
                    .entry(name.to_owned())
                    .or_insert_with(|| SettingSection::new(name));
                current = Some(name.to_owned());
            }
            Line::Pair(key, value) => match &current {
                Some(name) => {
                    if let Some(section) = sections.get_mut(name) {
                        section.put_setting(Setting::new(key, name, SettingValue::sniff(value)));
                    }
                }
                None => {
                    warn!(log, "skipping config line outside any section"; "line" => line);
                }
            },
            Line::Blank => {}
            Line::Malformed => {
                warn!(log, "skipping invalid config line"; "line" => line);
            }
        }
    }
    sections
}

/// Reads one of the global configuration files by name (`Dolphin`, `GFX`,
/// ...). For the main file, the GameCube pad type keys are filled in when
/// absent so the controller screens always have a value to show: slot 0
/// defaults to the standard controller, the rest to nothing.
pub fn read_settings(log: &slog::Logger, dirs: &Dirs, file_name: &str) -> SectionMap {
    let mut sections = read_file(log, &settings_path(dirs, file_name), false);
    if file_name == FILE_DOLPHIN {
        add_gc_pad_settings_if_missing(&mut sections);
    }
    sections
}

fn add_gc_pad_settings_if_missing(sections: &mut SectionMap) {
    let core = sections
        .entry(SECTION_INI_CORE.to_owned())
        .or_insert_with(|| SettingSection::new(SECTION_INI_CORE));
    for slot in 0..4 {
        let key = format!("{}{slot}", keys::GC_PAD_TYPE);
        if core.get_setting(&key).is_none() {
            let device = if slot == 0 { 6 } else { 0 };
            core.put_setting(Setting::new(&key, SECTION_INI_CORE, device.into()));
        }
    }
}

pub fn read_generic_game_settings(log: &slog::Logger, dirs: &Dirs, game_id: &str) -> SectionMap {
    read_file(log, &generic_game_settings_path(dirs, game_id), true)
}

pub fn read_generic_game_settings_all_regions(
    log: &slog::Logger,
    dirs: &Dirs,
    game_id: &str,
) -> SectionMap {
    read_file(log, &generic_game_settings_all_regions_path(dirs, game_id), true)
}

pub fn read_custom_game_settings(log: &slog::Logger, dirs: &Dirs, game_id: &str) -> SectionMap {
    read_file(log, &custom_game_settings_path(dirs, game_id), true)
}

/// Reads a Wii Remote profile document by profile name (the value of a
/// `WiimoteProfile<pad>` key, e.g. `RMGE01_Wii1`).
pub fn read_wiimote_profile(log: &slog::Logger, dirs: &Dirs, profile: &str) -> SectionMap {
    read_file(log, &wiimote_profile_path(dirs, profile), true)
}

/// Writes a full global configuration document: all sections sorted by
/// name, keys sorted within each section, empty sections and empty values
/// omitted. Failures are logged only.
pub fn save_file(log: &slog::Logger, dirs: &Dirs, file_name: &str, sections: &SectionMap) {
    let path = settings_path(dirs, file_name);
    let mut ini = IniFile::new(log);
    for section in sections.values() {
        for setting in section.iter() {
            ini.set_string(section.name(), setting.key(), &setting.value().to_string());
        }
    }
    ini.save(&path);
}

/// Writes a game's custom settings document.
///
/// The existing file is loaded first and overlaid, so keys this session
/// never saw survive. Section names are mapped back to their on-disk form.
/// Two kinds of settings never land in the game file itself: sections
/// holding resolved profile values (named `Profile<pad>`) are display-only
/// and skipped, and Wii Remote extension keys are diverted into the per-pad
/// profile file, with only the profile-name indirection recorded here.
pub fn save_custom_game_settings(
    log: &slog::Logger,
    dirs: &Dirs,
    game_id: &str,
    sections: &SectionMap,
) {
    let path = custom_game_settings_path(dirs, game_id);
    let mut ini = IniFile::open(log, &path);
    for (section_name, section) in sections {
        if section_name.contains(SECTION_PROFILE) {
            continue;
        }
        for setting in section.iter() {
            if setting.key().contains(keys::WIIMOTE_EXTENSION) {
                save_custom_wiimote_setting(log, dirs, game_id, setting, &mut ini);
            } else {
                ini.set_string(
                    section_name_to_disk(section_name),
                    setting.key(),
                    &setting.value().to_string(),
                );
            }
        }
    }
    ini.save(&path);
}

/// Stores a Wii Remote extension choice in the pad's per-game profile and
/// flips the game's `WiimoteProfile<pad>` key to activate that profile. The
/// profile file is cloned from the template on first use.
fn save_custom_wiimote_setting(
    log: &slog::Logger,
    dirs: &Dirs,
    game_id: &str,
    setting: &Setting,
    game_ini: &mut IniFile,
) {
    let pad = match setting.key().chars().last().and_then(|c| c.to_digit(10)) {
        Some(pad) => pad,
        None => {
            warn!(
                log, "extension key has no pad number, not saving";
                "key" => setting.key(),
            );
            return;
        }
    };
    let profile = format!("{game_id}_Wii{pad}");
    let profile_path = wiimote_profile_path(dirs, &profile);

    let profile_existed = profile_path.exists();
    if !profile_existed {
        let template_path = wiimote_profile_path(dirs, WIIMOTE_PROFILE_TEMPLATE);
        if let Err(err) = fs::copy(&template_path, &profile_path) {
            error!(
                log, "couldn't clone wiimote profile template";
                "from" => %template_path.display(),
                "to" => %profile_path.display(),
                "err" => %err,
            );
        }
    }

    let mut profile_ini = IniFile::open(log, &profile_path);
    if !profile_existed {
        profile_ini.set_string(
            SECTION_PROFILE,
            keys::WIIMOTE_DEVICE,
            &format!("Android/{}/Touchscreen", pad + 4),
        );
    }
    profile_ini.set_string(
        SECTION_PROFILE,
        keys::WIIMOTE_EXTENSION,
        &setting.value().to_string(),
    );
    profile_ini.save(&profile_path);

    game_ini.set_string(
        SECTION_CONTROLS,
        &format!("{}{pad}", keys::WIIMOTE_PROFILE),
        &profile,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SECTION_GFX_HACKS;
    use slog::o;

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
    fn type_sniffing_assigns_expected_types() {
        let (_root, dirs) = dirs();
        let path = settings_path(&dirs, FILE_GFX);
        fs::write(
            &path,
            "[Settings]\nShowFPS = True\nInternalResolution = 2\nPostProcessingShader = bloom\nDisplayScale = 0.5\n",
        )
        .unwrap();

        let sections = read_file(&log(), &path, false);
        let settings = &sections["Settings"];
        assert_eq!(
            settings.get_setting("ShowFPS").unwrap().value(),
            &SettingValue::Bool(true)
        );
        assert_eq!(
            settings.get_setting("InternalResolution").unwrap().value(),
            &SettingValue::Int(2)
        );
        assert_eq!(
            settings.get_setting("PostProcessingShader").unwrap().value(),
            &SettingValue::Str("bloom".to_owned())
        );
        assert_eq!(
            settings.get_setting("DisplayScale").unwrap().value(),
            &SettingValue::Float(0.5)
        );
    }

    #[test]
    fn missing_settings_file_reads_as_empty() {
        let (_root, dirs) = dirs();
        let sections = read_file(&log(), &settings_path(&dirs, FILE_GFX), false);
        assert!(sections.is_empty());
    }

    #[test]
    fn malformed_line_does_not_abort_the_read() {
        let (_root, dirs) = dirs();
        let path = settings_path(&dirs, FILE_GFX);
        fs::write(&path, "[Settings]\nShowFPS = True\ngarbage line\n").unwrap();
        let sections = read_file(&log(), &path, false);
        assert_eq!(sections["Settings"].len(), 1);
    }

    #[test]
    fn custom_game_sections_are_remapped_in_memory() {
        let (_root, dirs) = dirs();
        let path = custom_game_settings_path(&dirs, "RMGE01");
        fs::write(&path, "[Video_Hacks]\nEFBAccessEnable = False\n").unwrap();

        let sections = read_custom_game_settings(&log(), &dirs, "RMGE01");
        assert!(sections.contains_key(SECTION_GFX_HACKS));
        assert!(!sections.contains_key("Video_Hacks"));
    }

    #[test]
    fn custom_game_sections_are_remapped_back_on_write() {
        let (_root, dirs) = dirs();
        let mut hacks = SettingSection::new(SECTION_GFX_HACKS);
        hacks.put_setting(Setting::new("EFBAccessEnable", SECTION_GFX_HACKS, false.into()));
        let mut sections = SectionMap::new();
        sections.insert(SECTION_GFX_HACKS.to_owned(), hacks);

        save_custom_game_settings(&log(), &dirs, "RMGE01", &sections);

        let text = fs::read_to_string(custom_game_settings_path(&dirs, "RMGE01")).unwrap();
        assert!(text.contains("[Video_Hacks]"));
        assert!(text.contains("EFBAccessEnable = False"));
        assert!(!text.contains("[Hacks]"));
    }

    #[test]
    fn global_files_never_get_remapped() {
        let (_root, dirs) = dirs();
        let path = settings_path(&dirs, FILE_GFX);
        fs::write(&path, "[Hacks]\nEFBAccessEnable = True\n").unwrap();
        let sections = read_file(&log(), &path, false);
        assert!(sections.contains_key("Hacks"));
    }

    #[test]
    fn gc_pad_defaults_are_injected_into_the_main_file() {
        let (_root, dirs) = dirs();
        fs::write(&settings_path(&dirs, FILE_DOLPHIN), "[Core]\nSIDevice1 = 9\n").unwrap();
        let sections = read_settings(&log(), &dirs, FILE_DOLPHIN);
        let core = &sections[SECTION_INI_CORE];
        assert_eq!(core.i32_or("SIDevice0", -1), 6);
        assert_eq!(core.i32_or("SIDevice1", -1), 9);
        assert_eq!(core.i32_or("SIDevice2", -1), 0);
        assert_eq!(core.i32_or("SIDevice3", -1), 0);
    }

    #[test]
    fn generic_settings_fall_back_to_region_free_id() {
        let (_root, dirs) = dirs();
        fs::write(
            dirs.sys_game_settings_dir().join("RMG.ini"),
            "[Core]\nCPUThread = False\n",
        )
        .unwrap();
        let sections = read_generic_game_settings_all_regions(&log(), &dirs, "RMGE01");
        assert!(!sections[SECTION_INI_CORE].bool_or("CPUThread", true));
    }

    #[test]
    fn save_file_serializes_typed_values_canonically() {
        let (_root, dirs) = dirs();
        let mut core = SettingSection::new(SECTION_INI_CORE);
        core.put_setting(Setting::new("CPUThread", SECTION_INI_CORE, true.into()));
        core.put_setting(Setting::new("EmulationSpeed", SECTION_INI_CORE, 1.0f32.into()));
        core.put_setting(Setting::new("CPUCore", SECTION_INI_CORE, 4.into()));
        let mut sections = SectionMap::new();
        sections.insert(SECTION_INI_CORE.to_owned(), core);

        save_file(&log(), &dirs, FILE_DOLPHIN, &sections);
        let text = fs::read_to_string(settings_path(&dirs, FILE_DOLPHIN)).unwrap();
        assert_eq!(
            text,
            "[Core]\nCPUCore = 4\nCPUThread = True\nEmulationSpeed = 1.0\n\n"
        );
    }

    #[test]
    fn extension_settings_are_diverted_into_the_profile() {
        let (_root, dirs) = dirs();
        fs::write(
            wiimote_profile_path(&dirs, WIIMOTE_PROFILE_TEMPLATE),
            "[Profile]\nDevice = template\n",
        )
        .unwrap();

        let mut controls = SettingSection::new(SECTION_CONTROLS);
        controls.put_setting(Setting::new(
            "Extension1",
            SECTION_CONTROLS,
            SettingValue::Str("Nunchuk".to_owned()),
        ));
        let mut sections = SectionMap::new();
        sections.insert(SECTION_CONTROLS.to_owned(), controls);

        save_custom_game_settings(&log(), &dirs, "RMGE01", &sections);

        let profile = fs::read_to_string(wiimote_profile_path(&dirs, "RMGE01_Wii1")).unwrap();
        assert!(profile.contains("Extension = Nunchuk"));
        assert!(profile.contains("Device = Android/5/Touchscreen"));

        let game = fs::read_to_string(custom_game_settings_path(&dirs, "RMGE01")).unwrap();
        assert!(game.contains("WiimoteProfile1 = RMGE01_Wii1"));
        assert!(!game.contains("Extension"));
    }

    #[test]
    fn profile_sections_are_never_written_to_the_game_file() {
        let (_root, dirs) = dirs();
        let mut profile = SettingSection::new("Profile1");
        profile.put_setting(Setting::new(
            "Extension",
            "Profile1",
            SettingValue::Str("Nunchuk".to_owned()),
        ));
        let mut sections = SectionMap::new();
        sections.insert("Profile1".to_owned(), profile);

        save_custom_game_settings(&log(), &dirs, "RMGE01", &sections);
        let text = fs::read_to_string(custom_game_settings_path(&dirs, "RMGE01")).unwrap();
        assert_eq!(text, "");
    }
}
