//! INI file configuration adapter.

use crate::domain::error::HourtraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HourtraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| HourtraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[data]
data_dir = /srv/prices
symbols = AAPL, MSFT

[strategy]
x_percent = 3
y_percent = 115

[report]
output_dir = out
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "data_dir"),
            Some("/srv/prices".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "symbols"),
            Some("AAPL, MSFT".to_string())
        );
        assert_eq!(adapter.get_int("strategy", "x_percent", 2), 3);
        assert_eq!(adapter.get_int("strategy", "y_percent", 110), 115);
        assert_eq!(
            adapter.get_string("report", "output_dir"),
            Some("out".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsymbol = SPY\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Strategy]\nX_Percent = 4\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "x_percent", 2), 4);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "y_percent", 110), 110);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nx_percent = abc\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "x_percent", 2), 2);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ndata_dir = /tmp/prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "data_dir"),
            Some("/tmp/prices".to_string())
        );
    }

    #[test]
    fn from_file_returns_config_parse_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(HourtraderError::ConfigParse { .. })));
    }
}
