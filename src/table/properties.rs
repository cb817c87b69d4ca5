//! Plot property definitions with defaults from plot.json
//!
//! plot.json is embedded at compile time so that every default lives in ONE
//! place. User values (command-line overrides) are layered on top and
//! validated against the definitions here.

use serde::Deserialize;
use std::collections::HashMap;

/// plot.json embedded at compile time
const PLOT_JSON: &str = include_str!("../../plot.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
}

/// Property definition from plot.json
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(rename = "defaultValue", default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For EnumeratedProperty, the valid values
    #[serde(rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

impl PropertyDef {
    /// Valid values of an enumerated property, empty for any other kind
    pub fn valid_values(&self) -> &[String] {
        match (&self.kind, &self.valid_values) {
            (PropertyKind::Enumerated, Some(values)) => values.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Deserialize)]
struct PlotManifest {
    properties: Vec<PropertyDef>,
}

/// Registry of all plot properties with their defaults from plot.json
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse plot.json and build the registry
    ///
    /// Panics if plot.json is malformed, which the registry tests catch since
    /// the file is embedded at compile time.
    pub fn from_plot_json() -> Self {
        let manifest: PlotManifest =
            serde_json::from_str(PLOT_JSON).expect("plot.json is invalid");

        let properties = manifest
            .properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        Self { properties }
    }

    /// Get the default value for a property
    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        match self.properties.get(name) {
            Some(p) if p.kind == PropertyKind::Enumerated => p
                .valid_values()
                .iter()
                .any(|v| v.eq_ignore_ascii_case(value)),
            _ => true, // Non-enumerated properties accept any value
        }
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(PropertyRegistry::from_plot_json)
}

/// Typed property reader
///
/// User values take precedence; anything unset or invalid falls back to the
/// plot.json default with a warning.
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user value; unknown properties are ignored with a warning
    ///
    /// Empty values mean "not set".
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if registry().get_property(name).is_none() {
            eprintln!("⚠ Unknown property '{}', ignoring", name);
            return false;
        }
        if value.is_empty() {
            self.user_values.remove(name);
        } else {
            self.user_values.insert(name.to_string(), value);
        }
        true
    }

    /// Get string property (user value or default from plot.json)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }

        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Get optional string property (None if empty)
    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        let value = self.get_string(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Get enumerated property with validation
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .map(|p| p.valid_values().join(", "))
                .unwrap_or_default();
            eprintln!(
                "⚠ Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value, name, valid_values, default
            );
        }

        default.to_string()
    }

    /// Get f64 property with range validation
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);
        let value = self.get_string(name);

        match value.trim().parse::<f64>() {
            Ok(v) if (min..=max).contains(&v) => v,
            Ok(v) => {
                eprintln!(
                    "⚠ Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                    v, name, min, max, default
                );
                default
            }
            Err(_) => {
                eprintln!(
                    "⚠ Invalid numeric value '{}' for property '{}'. Using default: {}",
                    value, name, default
                );
                default
            }
        }
    }

    /// Get u32 property with range validation
    pub fn get_u32_in_range(&self, name: &str, min: u32, max: u32) -> u32 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(min);
        let value = self.get_string(name);

        match value.trim().parse::<u32>() {
            Ok(v) if (min..=max).contains(&v) => v,
            _ => {
                eprintln!(
                    "⚠ Invalid value '{}' for property '{}', expected integer in [{}, {}]. Using default: {}",
                    value, name, min, max, default
                );
                default
            }
        }
    }

    /// Get a single ASCII character (e.g. a field separator)
    ///
    /// `\t` and `tab` are accepted for tab.
    pub fn get_char(&self, name: &str) -> u8 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.bytes().next())
            .unwrap_or(b',');
        let value = self.get_string(name);

        match value.as_str() {
            "\\t" | "tab" => b'\t',
            v if v.len() == 1 && v.is_ascii() => v.as_bytes()[0],
            v => {
                eprintln!(
                    "⚠ Invalid value '{}' for property '{}', expected one ASCII character. Using default: '{}'",
                    v, name, default as char
                );
                default
            }
        }
    }
}
