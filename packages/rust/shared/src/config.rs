//! Application configuration for vcf2csv.
//!
//! User config lives at `~/.vcf2csv/vcf2csv.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, Vcf2CsvError};
use crate::types::{InvalidRecordPolicy, NameDecoding};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "vcf2csv.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".vcf2csv";

// ---------------------------------------------------------------------------
// Config structs (matching vcf2csv.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Conversion defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How the `FN` value is decoded.
    #[serde(default)]
    pub name_decoding: NameDecoding,

    /// Abort or skip on records without a usable name.
    #[serde(default)]
    pub on_invalid_record: InvalidRecordPolicy,

    /// Prefix the CSV with a UTF-8 byte-order mark.
    #[serde(default)]
    pub utf8_bom: bool,

    /// Extension used for the output file when no output path is given.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            name_decoding: NameDecoding::default(),
            on_invalid_record: InvalidRecordPolicy::default(),
            utf8_bom: false,
            output_extension: default_output_extension(),
        }
    }
}

fn default_output_extension() -> String {
    "csv".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.vcf2csv/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| Vcf2CsvError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.vcf2csv/vcf2csv.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Vcf2CsvError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| Vcf2CsvError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    tracing::debug!(?path, "loaded config file");
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| Vcf2CsvError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| Vcf2CsvError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| Vcf2CsvError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values that would produce an unusable output path.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let ext = &config.defaults.output_extension;
    if ext.is_empty() || ext.contains(['/', '\\']) || ext.starts_with('.') {
        return Err(Vcf2CsvError::config(format!(
            "output_extension {ext:?} must be a bare extension such as \"csv\""
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("name_decoding = \"raw\""));
        assert!(toml_str.contains("on_invalid_record = \"abort\""));
        assert!(toml_str.contains("output_extension = \"csv\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.name_decoding, NameDecoding::Raw);
        assert!(!parsed.defaults.utf8_bom);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
name_decoding = "auto"
utf8_bom = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.name_decoding, NameDecoding::Auto);
        assert_eq!(config.defaults.on_invalid_record, InvalidRecordPolicy::Abort);
        assert!(config.defaults.utf8_bom);
        assert_eq!(config.defaults.output_extension, "csv");
    }

    #[test]
    fn empty_file_is_default() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(config.defaults.output_extension, "csv");
    }

    #[test]
    fn load_from_file_rejects_bad_extension() {
        let path =
            std::env::temp_dir().join(format!("vcf2csv-config-{}.toml", uuid::Uuid::now_v7()));
        std::fs::write(&path, "[defaults]\noutput_extension = \".csv\"\n").unwrap();

        let result = load_config_from(&path);
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("bare extension"));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/vcf2csv.toml")).unwrap_err();
        assert!(matches!(err, Vcf2CsvError::Io { .. }));
    }
}
