//! The single INI codec backing both configuration facades: the flat
//! string-valued [`IniFile`] store here, and the typed section documents in
//! [`crate::file`]. Both share the same line classifier and the same
//! deterministic serializer.

use ahash::AHashMap;
use slog::{error, warn};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

/// One classified line of INI text.
pub(crate) enum Line<'a> {
    Section(&'a str),
    Pair(&'a str, &'a str),
    Blank,
    Malformed,
}

/// Splits a `key = value` line. The line must contain exactly one `=` once
/// trailing empty fields are discarded; anything else is malformed and gets
/// skipped by the callers. Key and value are trimmed of surrounding
/// whitespace.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let mut parts: Vec<&str> = line.split('=').collect();
    while parts.last() == Some(&"") {
        parts.pop();
    }
    if parts.len() != 2 {
        return None;
    }
    Some((parts[0].trim(), parts[1].trim()))
}

pub(crate) fn classify_line(line: &str) -> Line<'_> {
    if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
        return Line::Section(&line[1..line.len() - 1]);
    }
    if line.trim().is_empty() {
        return Line::Blank;
    }
    match split_pair(line) {
        Some((key, value)) => Line::Pair(key, value),
        None => Line::Malformed,
    }
}

/// Serializes `sections` (section name → key → value text) as INI text:
/// sections sorted by name, keys sorted within each section, one blank line
/// after each section. Sections whose entries all serialize empty are
/// omitted entirely, as are individual entries with empty values. The same
/// in-memory document always produces byte-identical output.
pub(crate) fn write_document(
    out: &mut impl Write,
    sections: &AHashMap<String, AHashMap<String, String>>,
) -> io::Result<()> {
    let mut names: Vec<&String> = sections.keys().collect();
    names.sort_unstable();
    for name in names {
        let entries = &sections[name];
        let mut keys: Vec<&String> = entries
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, _)| key)
            .collect();
        if keys.is_empty() {
            continue;
        }
        keys.sort_unstable();
        writeln!(out, "[{name}]")?;
        for key in keys {
            writeln!(out, "{key} = {}", entries[key])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// An in-memory copy of an INI file, with all values kept as raw strings.
///
/// This is the accessor used for the handful of flat settings (ISO search
/// paths, updater flags) that don't go through the [`crate::Settings`]
/// aggregate. Reads of missing files yield an empty document; writes are
/// best-effort and report failure through the return value and the log only.
pub struct IniFile {
    sections: AHashMap<String, AHashMap<String, String>>,
    log: slog::Logger,
}

impl IniFile {
    pub fn new(log: &slog::Logger) -> Self {
        IniFile {
            sections: AHashMap::new(),
            log: log.clone(),
        }
    }

    /// Loads `path`, treating a missing or unreadable file as empty.
    pub fn open(log: &slog::Logger, path: &Path) -> Self {
        let mut ini = IniFile::new(log);
        ini.load(path, false);
        ini
    }

    /// Replaces (or, with `keep_current_data`, overlays) the document with
    /// the contents of `path`. Returns whether the file could be read;
    /// malformed lines are skipped individually and never fail the load.
    pub fn load(&mut self, path: &Path, keep_current_data: bool) -> bool {
        if !keep_current_data {
            self.sections.clear();
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    self.log, "couldn't read ini file";
                    "path" => %path.display(), "err" => %err,
                );
                return false;
            }
        };
        let mut current: Option<String> = None;
        for line in text.lines() {
            match classify_line(line) {
                Line::Section(name) => {
                    self.sections.entry(name.to_owned()).or_default();
                    current = Some(name.to_owned());
                }
                Line::Pair(key, value) => match &current {
                    Some(section) => {
                        if let Some(entries) = self.sections.get_mut(section) {
                            entries.insert(key.to_owned(), value.to_owned());
                        }
                    }
                    None => {
                        warn!(
                            self.log, "skipping config line outside any section";
                            "line" => line,
                        );
                    }
                },
                Line::Blank => {}
                Line::Malformed => {
                    warn!(self.log, "skipping invalid config line"; "line" => line);
                }
            }
        }
        true
    }

    /// Writes the document back out. Failures are logged and reported as
    /// `false`; nothing is raised to the caller.
    pub fn save(&self, path: &Path) -> bool {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let mut buffer = Vec::new();
        let result = write_document(&mut buffer, &self.sections)
            .and_then(|_| fs::write(path, &buffer));
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(
                    self.log, "couldn't write ini file";
                    "path" => %path.display(), "err" => %err,
                );
                false
            }
        }
    }

    fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn exists(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key).unwrap_or(default).to_owned()
    }

    pub fn get_i32(&self, section: &str, key: &str, default: i32) -> i32 {
        self.get(section, key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    pub fn get_f32(&self, section: &str, key: &str, default: f32) -> f32 {
        self.get(section, key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get(section, key) {
            Some("True") => true,
            Some("False") => false,
            _ => default,
        }
    }

    pub fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
    }

    pub fn set_i32(&mut self, section: &str, key: &str, value: i32) {
        self.set_string(section, key, &value.to_string());
    }

    pub fn set_f32(&mut self, section: &str, key: &str, value: f32) {
        self.set_string(section, key, &format!("{value:?}"));
    }

    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set_string(section, key, if value { "True" } else { "False" });
    }

    /// Removes one key. The section itself is kept; empty sections simply
    /// don't get serialized.
    pub fn delete_key(&mut self, section: &str, key: &str) -> bool {
        self.sections
            .get_mut(section)
            .and_then(|entries| entries.remove(key))
            .is_some()
    }

    pub fn delete_section(&mut self, section: &str) -> bool {
        self.sections.remove(section).is_some()
    }
}
