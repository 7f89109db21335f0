//! The flat settings that bypass the typed model: the game library's ISO
//! search paths and the updater preferences, all stored in the main
//! configuration file and edited through [`IniFile`] directly.

use crate::dirs::Dirs;
use crate::file::{settings_path, FILE_DOLPHIN};
use crate::ini::IniFile;
use crate::keys;
use crate::section::SECTION_INI_INTERFACE;
use crate::CoreNotify;

fn iso_path_key(index: i32) -> String {
    format!("{}{index}", keys::ISO_PATH_BASE)
}

/// Returns the configured game directories, in index order, keeping only
/// the ones that still exist on disk. With `remove_missing` set, dangling
/// entries are also pruned from the file (reindexing the survivors) and the
/// running core is told to pick up the change.
pub fn iso_folders(
    log: &slog::Logger,
    dirs: &Dirs,
    core: &dyn CoreNotify,
    remove_missing: bool,
) -> Vec<String> {
    let path = settings_path(dirs, FILE_DOLPHIN);
    let mut ini = IniFile::open(log, &path);

    let count = ini.get_i32(SECTION_INI_INTERFACE, keys::ISO_PATHS, 0);
    let mut folders = Vec::new();
    for index in 0..count {
        let folder = ini.get_string(SECTION_INI_INTERFACE, &iso_path_key(index), "");
        if !folder.is_empty() && std::path::Path::new(&folder).is_dir() {
            folders.push(folder);
        }
    }

    if remove_missing && folders.len() != count as usize {
        ini.set_i32(SECTION_INI_INTERFACE, keys::ISO_PATHS, folders.len() as i32);
        for (index, folder) in folders.iter().enumerate() {
            ini.set_string(SECTION_INI_INTERFACE, &iso_path_key(index as i32), folder);
        }
        for stale in folders.len() as i32..count {
            ini.delete_key(SECTION_INI_INTERFACE, &iso_path_key(stale));
        }
        if ini.save(&path) {
            core.reload_config();
        }
    }

    folders
}

/// Appends a game directory to the search list unless it's already there.
/// Returns whether the list changed.
pub fn add_iso_folder(
    log: &slog::Logger,
    dirs: &Dirs,
    core: &dyn CoreNotify,
    folder: &str,
) -> bool {
    let path = settings_path(dirs, FILE_DOLPHIN);
    let mut ini = IniFile::open(log, &path);

    let count = ini.get_i32(SECTION_INI_INTERFACE, keys::ISO_PATHS, 0);
    for index in 0..count {
        if ini.get_string(SECTION_INI_INTERFACE, &iso_path_key(index), "") == folder {
            return false;
        }
    }

    ini.set_string(SECTION_INI_INTERFACE, &iso_path_key(count), folder);
    ini.set_i32(SECTION_INI_INTERFACE, keys::ISO_PATHS, count + 1);
    if ini.save(&path) {
        core.reload_config();
    }
    true
}

/// Turns startup update checks on or off. Either way the user has now
/// answered the permission prompt, so that flag is set alongside.
pub fn set_update_check_enabled(
    log: &slog::Logger,
    dirs: &Dirs,
    core: &dyn CoreNotify,
    enabled: bool,
) {
    let path = settings_path(dirs, FILE_DOLPHIN);
    let mut ini = IniFile::open(log, &path);
    ini.set_bool(SECTION_INI_INTERFACE, keys::UPDATER_CHECK_AT_STARTUP, enabled);
    ini.set_bool(SECTION_INI_INTERFACE, keys::UPDATER_PERMISSION_ASKED, true);
    if ini.save(&path) {
        core.reload_config();
    }
}

pub fn update_check_enabled(log: &slog::Logger, dirs: &Dirs) -> bool {
    IniFile::open(log, &settings_path(dirs, FILE_DOLPHIN)).get_bool(
        SECTION_INI_INTERFACE,
        keys::UPDATER_CHECK_AT_STARTUP,
        false,
    )
}

pub fn update_permission_asked(log: &slog::Logger, dirs: &Dirs) -> bool {
    IniFile::open(log, &settings_path(dirs, FILE_DOLPHIN)).get_bool(
        SECTION_INI_INTERFACE,
        keys::UPDATER_PERMISSION_ASKED,
        false,
    )
}

/// Remembers a release the user chose not to be reminded about. An empty
/// version clears the skip.
pub fn set_update_skip_version(
    log: &slog::Logger,
    dirs: &Dirs,
    core: &dyn CoreNotify,
    version: &str,
) {
    let path = settings_path(dirs, FILE_DOLPHIN);
    let mut ini = IniFile::open(log, &path);
    if version.is_empty() {
        ini.delete_key(SECTION_INI_INTERFACE, keys::UPDATER_SKIP_VERSION);
    } else {
        ini.set_string(SECTION_INI_INTERFACE, keys::UPDATER_SKIP_VERSION, version);
    }
    if ini.save(&path) {
        core.reload_config();
    }
}

pub fn update_skip_version(log: &slog::Logger, dirs: &Dirs) -> String {
    IniFile::open(log, &settings_path(dirs, FILE_DOLPHIN)).get_string(
        SECTION_INI_INTERFACE,
        keys::UPDATER_SKIP_VERSION,
        "",
    )
}
