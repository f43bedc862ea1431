use crate::config::{config_error, parse_duration, AppConfig};
use crate::utils::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定檔格式，每個欄位都可省略
///
/// ```toml
/// [folders]
/// input = "./inputs"
/// output = "./outputs"
///
/// [scan]
/// interval = "30s"
///
/// [database]
/// url = "${DATABASE_URL}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub folders: Option<FoldersConfig>,
    pub scan: Option<ScanConfig>,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoldersConfig {
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    pub interval: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IngestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IngestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATABASE_URL})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| config_error(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Copies every value present in the file over `config`.
    pub fn apply_to(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(folders) = &self.folders {
            if let Some(input) = &folders.input {
                config.input_folder = PathBuf::from(input);
            }
            if let Some(output) = &folders.output {
                config.output_folder = PathBuf::from(output);
            }
        }

        if let Some(interval) = self.scan.as_ref().and_then(|s| s.interval.as_deref()) {
            config.scan_interval =
                parse_duration(interval).ok_or_else(|| IngestError::InvalidConfigValueError {
                    field: "scan.interval".to_string(),
                    value: interval.to_string(),
                    reason: "Expected a duration such as 30s, 1m30s or 500ms".to_string(),
                })?;
        }

        if let Some(url) = self.database.as_ref().and_then(|d| d.url.as_deref()) {
            if url.contains("${") {
                return Err(IngestError::MissingConfigError {
                    field: format!("database.url ({})", url),
                });
            }
            config.database_url = url.to_string();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[folders]
input = "/srv/sim/in"
output = "/srv/sim/out"

[scan]
interval = "1m"

[database]
url = "postgres://sim:sim@db:5432/sims"
"#;

        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut config = AppConfig::default();
        file_config.apply_to(&mut config).unwrap();

        assert_eq!(config.input_folder, PathBuf::from("/srv/sim/in"));
        assert_eq!(config.output_folder, PathBuf::from("/srv/sim/out"));
        assert_eq!(config.scan_interval, Duration::from_secs(60));
        assert_eq!(config.database_url, "postgres://sim:sim@db:5432/sims");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let file_config = TomlConfig::from_toml_str("[scan]\ninterval = \"5s\"\n").unwrap();
        let mut config = AppConfig::default();
        file_config.apply_to(&mut config).unwrap();

        assert_eq!(config.scan_interval, Duration::from_secs(5));
        assert_eq!(config.input_folder, PathBuf::from("./inputs"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SIM_INGEST_TEST_OUTPUT", "/tmp/sim-out");

        let toml_content = r#"
[folders]
output = "${SIM_INGEST_TEST_OUTPUT}"
"#;

        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            file_config.folders.unwrap().output.as_deref(),
            Some("/tmp/sim-out")
        );

        std::env::remove_var("SIM_INGEST_TEST_OUTPUT");
    }

    #[test]
    fn test_unresolved_database_url_is_rejected() {
        let toml_content = r#"
[database]
url = "${SIM_INGEST_TEST_UNSET_URL}"
"#;

        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut config = AppConfig::default();
        assert!(matches!(
            file_config.apply_to(&mut config),
            Err(IngestError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_interval_in_file() {
        let file_config = TomlConfig::from_toml_str("[scan]\ninterval = \"often\"\n").unwrap();
        let mut config = AppConfig::default();
        assert!(file_config.apply_to(&mut config).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[folders]\ninput = \"./batches\"\n")
            .unwrap();

        let file_config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            file_config.folders.unwrap().input.as_deref(),
            Some("./batches")
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[folders\ninput ="),
            Err(IngestError::ConfigValidationError { .. })
        ));
    }
}
