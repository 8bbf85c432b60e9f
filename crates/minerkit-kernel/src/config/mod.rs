//! Configuration file loading
//!
//! Loads plugin settings files in any of the formats supported by the
//! `config` crate: YAML, TOML, JSON, INI, RON, JSON5.
//!
//! ## Features
//!
//! - Auto-detection of format from file extension
//! - Environment variable substitution (`${VAR}` and `$VAR` syntax)
//! - Probing a directory for `<stem>.<ext>` across supported extensions
//! - Writing settings back as JSON, YAML or TOML

use config::{Config as Cfg, File, FileFormat};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[cfg(test)]
mod tests;

/// Configuration format detection error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Extensions probed by [`find_config_file`], in priority order.
pub const PROBED_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml"];

static BRACED_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("braced env var pattern is valid")
});

static SIMPLE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\b").expect("simple env var pattern is valid")
});

/// Detect configuration format from file extension
///
/// # Supported Extensions
///
/// - YAML: `.yaml`, `.yml`
/// - TOML: `.toml`
/// - JSON: `.json`
/// - INI: `.ini`
/// - RON: `.ron`
/// - JSON5: `.json5`
pub fn detect_format(path: impl AsRef<Path>) -> ConfigResult<FileFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "ini" => Ok(FileFormat::Ini),
        "ron" => Ok(FileFormat::Ron),
        "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Substitute environment variables in a string
///
/// Supports both `${VAR_NAME}` and `$VAR_NAME` syntax. References to unset
/// variables are left untouched.
///
/// # Example
///
/// ```rust,ignore
/// use minerkit_kernel::config::substitute_env_vars;
///
/// std::env::set_var("BMINER_LOG", "/var/log/bminer.log");
/// let result = substitute_env_vars("logfile: ${BMINER_LOG}");
/// assert_eq!(result, "logfile: /var/log/bminer.log");
/// ```
pub fn substitute_env_vars(content: &str) -> String {
    let replace = |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    };

    // Braced form first so `${A}` is never seen as `$` + `{A}`
    let result = BRACED_VAR.replace_all(content, replace).to_string();
    SIMPLE_VAR.replace_all(&result, replace).to_string()
}

/// Load configuration from a file
///
/// Automatically detects the format from the file extension and performs
/// environment variable substitution on the loaded content.
///
/// # Example
///
/// ```rust,ignore
/// use minerkit_kernel::config::load_config;
///
/// let package: MinerOptionsPackage = load_config("internals/MinerOptionsPackage.json")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let format = detect_format(&path)?;
    let content = std::fs::read_to_string(path)?;
    from_str(&content, format)
}

/// Load configuration from a string with explicit format
pub fn from_str<T>(content: &str, format: FileFormat) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let substituted_content = substitute_env_vars(content);

    let config = Cfg::builder()
        .add_source(File::from_str(&substituted_content, format))
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Find `<dir>/<stem>.<ext>` for the first existing extension in
/// [`PROBED_EXTENSIONS`].
pub fn find_config_file(dir: impl AsRef<Path>, stem: &str) -> Option<PathBuf> {
    PROBED_EXTENSIONS
        .iter()
        .map(|ext| dir.as_ref().join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Serialize `value` to `path` in the format implied by its extension.
///
/// Only JSON, YAML and TOML can be written. Parent directories are created.
pub fn save_config<T>(path: impl AsRef<Path>, value: &T) -> ConfigResult<()>
where
    T: Serialize,
{
    let path = path.as_ref();
    let content = match detect_format(path)? {
        FileFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?,
        FileFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| ConfigError::Serialization(e.to_string()))?
        }
        FileFormat::Toml => {
            toml::to_string_pretty(value).map_err(|e| ConfigError::Serialization(e.to_string()))?
        }
        other => return Err(ConfigError::UnsupportedFormat(format!("{other:?}"))),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
