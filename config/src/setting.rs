use std::fmt;

/// A single typed configuration value.
///
/// Value types are never declared in the file format; they're inferred from
/// the textual form of the value when a line is parsed (see
/// [`SettingValue::sniff`]). A string value whose text happens to be a valid
/// number or boolean literal will therefore come back as that type on the
/// next load. That ambiguity is inherent to the format and is reproduced
/// here, not corrected.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl SettingValue {
    /// Infers a typed value from its text form, trying integer, then float,
    /// then the exact literals `True`/`False`, then falling back to a
    /// verbatim string. The trial order is load-bearing: numeric settings
    /// rely on `"42"` always becoming an `Int`.
    pub fn sniff(text: &str) -> Self {
        if let Ok(value) = text.parse::<i32>() {
            return SettingValue::Int(value);
        }
        if let Ok(value) = text.parse::<f32>() {
            return SettingValue::Float(value);
        }
        match text {
            "True" => SettingValue::Bool(true),
            "False" => SettingValue::Bool(false),
            _ => SettingValue::Str(text.to_owned()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            SettingValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            SettingValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    /// The canonical text form: `True`/`False` for booleans, decimal for
    /// numbers, strings verbatim. Floats always keep a fractional part so
    /// they don't get re-sniffed as integers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(true) => f.write_str("True"),
            SettingValue::Bool(false) => f.write_str("False"),
            SettingValue::Int(value) => write!(f, "{value}"),
            SettingValue::Float(value) => write!(f, "{value:?}"),
            SettingValue::Str(value) => f.write_str(value),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(value)
    }
}

impl From<f32> for SettingValue {
    fn from(value: f32) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Str(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Str(value)
    }
}

/// One key/value pair, tagged with the name of the section it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Setting {
    key: String,
    section_name: String,
    value: SettingValue,
}

impl Setting {
    pub fn new(key: &str, section_name: &str, value: SettingValue) -> Self {
        Setting {
            key: key.to_owned(),
            section_name: section_name.to_owned(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    pub fn set_value(&mut self, value: SettingValue) {
        self.value = value;
    }
}
