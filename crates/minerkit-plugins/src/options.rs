//! Miner launch options
//!
//! A plugin declares the worker flags it understands as a
//! [`MinerOptionsPackage`]. The user's free-form "extra launch parameters"
//! string is matched against that schema, and the result is rendered back to
//! a worker argument vector.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Syntax class of a worker option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinerOptionType {
    /// Bare flag: present or absent, e.g. `-nofee`
    OptionIsParameter,
    /// Flag followed by one value, e.g. `-intensity 6`
    OptionWithSingleParameter,
}

/// A single worker option descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerOption {
    #[serde(rename = "type")]
    pub option_type: MinerOptionType,
    /// Stable identifier, e.g. `bminer_cpu_intensity`
    pub id: String,
    /// Flag text as the worker expects it. A trailing `=` means the value is
    /// glued to the flag (`-logfile=path`).
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl MinerOption {
    pub fn flag(id: &str, short_name: &str) -> Self {
        Self {
            option_type: MinerOptionType::OptionIsParameter,
            id: id.to_string(),
            short_name: short_name.to_string(),
            default_value: None,
        }
    }

    pub fn single(id: &str, short_name: &str, default_value: Option<&str>) -> Self {
        Self {
            option_type: MinerOptionType::OptionWithSingleParameter,
            id: id.to_string(),
            short_name: short_name.to_string(),
            default_value: default_value.map(str::to_string),
        }
    }

    fn is_inline(&self) -> bool {
        self.short_name.ends_with('=')
    }

    /// Worker arguments for this option given the user's override, if any.
    ///
    /// Bare flags appear only when enabled. Single-parameter options use the
    /// override or fall back to the default and are skipped when neither
    /// exists.
    pub fn render(&self, value: Option<&OptionValue>) -> Vec<String> {
        match self.option_type {
            MinerOptionType::OptionIsParameter => match value {
                Some(OptionValue::Enabled) => vec![self.short_name.clone()],
                _ => Vec::new(),
            },
            MinerOptionType::OptionWithSingleParameter => {
                let resolved = match value {
                    Some(OptionValue::Value(v)) => Some(v.as_str()),
                    _ => self.default_value.as_deref(),
                };
                match resolved {
                    Some(v) if self.is_inline() => vec![format!("{}{v}", self.short_name)],
                    Some(v) => vec![self.short_name.clone(), v.to_string()],
                    None => Vec::new(),
                }
            }
        }
    }
}

/// All options of a plugin, split the way the host UI groups them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerOptionsPackage {
    #[serde(default)]
    pub general_options: Vec<MinerOption>,
    #[serde(default)]
    pub temperature_options: Vec<MinerOption>,
}

impl MinerOptionsPackage {
    /// General options followed by temperature options.
    pub fn iter(&self) -> impl Iterator<Item = &MinerOption> {
        self.general_options
            .iter()
            .chain(self.temperature_options.iter())
    }

    pub fn find(&self, id: &str) -> Option<&MinerOption> {
        self.iter().find(|option| option.id == id)
    }
}

/// A user-supplied setting for one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare flag switched on
    Enabled,
    /// Explicit value for a single-parameter option
    Value(String),
}

/// User settings keyed by option id.
pub type LaunchOverrides = HashMap<String, OptionValue>;

/// Match a free-form parameter string against the package's flags.
///
/// Tokens are split on whitespace. Unknown tokens, and single-parameter
/// flags with no following value, are ignored. Later occurrences win.
pub fn parse_extra_launch_parameters(text: &str, package: &MinerOptionsPackage) -> LaunchOverrides {
    let mut overrides = LaunchOverrides::new();
    let mut tokens = text.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let inline = package.iter().find(|option| {
            option.is_inline() && token.len() > option.short_name.len() && token.starts_with(&option.short_name)
        });
        if let Some(option) = inline {
            let value = &token[option.short_name.len()..];
            overrides.insert(option.id.clone(), OptionValue::Value(value.to_string()));
            continue;
        }

        let Some(option) = package
            .iter()
            .find(|option| option.short_name.trim_end_matches('=') == token)
        else {
            tracing::debug!(token, "ignoring unknown launch parameter");
            continue;
        };

        match option.option_type {
            MinerOptionType::OptionIsParameter => {
                overrides.insert(option.id.clone(), OptionValue::Enabled);
            }
            MinerOptionType::OptionWithSingleParameter => match tokens.next_if(|next| !is_flag(next)) {
                Some(value) => {
                    overrides.insert(option.id.clone(), OptionValue::Value(value.to_string()));
                }
                None => tracing::debug!(flag = token, "launch parameter is missing its value"),
            },
        }
    }

    overrides
}

/// A flag token starts with `-` followed by a letter, so `-1` is a value.
fn is_flag(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Worker arguments for every option in the package, in schema order.
pub fn render_arguments(package: &MinerOptionsPackage, overrides: &LaunchOverrides) -> Vec<String> {
    package
        .iter()
        .flat_map(|option| option.render(overrides.get(&option.id)))
        .collect()
}
