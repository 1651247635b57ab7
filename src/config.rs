use crate::core::db::FetchStyle;
use crate::core::{AntDbError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Init command run on every connection the default connector opens.
pub const DEFAULT_INIT_COMMAND: &str = "PRAGMA foreign_keys = ON;";

/// Connection parameters plus wrapper options, usually parsed from TOML.
///
/// `host`, `user` and `pass` are handed to the connector untouched; the
/// bundled SQLite connector only reads `name`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Database file path, or `":memory:"`.
    pub name: Option<String>,
    pub options: Options,
}

/// Wrapper options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Open a connection as soon as the wrapper is built.
    pub autoconnect: bool,
    /// Shape of rows returned by reads. Also accepted as `"fetch.style"`.
    #[serde(alias = "fetch.style")]
    pub fetch_style: FetchStyle,
    /// SQL batch run right after a connection is opened.
    pub init_command: Option<String>,
    /// Any other key found in the `[options]` table.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            autoconnect: true,
            fetch_style: FetchStyle::default(),
            init_command: Some(DEFAULT_INIT_COMMAND.to_string()),
            extra: BTreeMap::new(),
        }
    }
}

/// Value returned by [`Config::option`].
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    FetchStyle(FetchStyle),
    Text(String),
    Other(toml::Value),
}

impl Config {
    /// Config for the database at `name` with default options.
    pub fn with_name(name: impl Into<String>) -> Self {
        Config {
            name: Some(name.into()),
            ..Config::default()
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Looks an option up by name.
    ///
    /// `fetch.style` and `fetch_style` are the same option. Unknown names
    /// fall through to the extra options table.
    pub fn option(&self, name: &str) -> Option<OptionValue> {
        match name {
            "autoconnect" => Some(OptionValue::Bool(self.options.autoconnect)),
            "fetch.style" | "fetch_style" => {
                Some(OptionValue::FetchStyle(self.options.fetch_style))
            }
            "init_command" => self.options.init_command.clone().map(OptionValue::Text),
            _ => self.options.extra.get(name).map(|value| match value {
                toml::Value::Boolean(b) => OptionValue::Bool(*b),
                toml::Value::String(s) => OptionValue::Text(s.clone()),
                other => OptionValue::Other(other.clone()),
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        if matches!(self.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(AntDbError::Config("database name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = antdb::load_config("antdb.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Config::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CONFIG: &str = r#"
host = "localhost"
user = "app"
pass = "secret"
name = "app.db"

[options]
autoconnect = false
fetch_style = "assoc"
init_command = "PRAGMA journal_mode = WAL;"
page_size_hint = 4096
label = "primary"
"#;

    #[test]
    fn test_load_config_from_str() {
        let config = Config::from_toml_str(SAMPLE_CONFIG).expect("Failed to parse sample config");
        assert_eq!(config.host.as_deref(), Some("localhost"));
        assert_eq!(config.user.as_deref(), Some("app"));
        assert_eq!(config.pass.as_deref(), Some("secret"));
        assert_eq!(config.name.as_deref(), Some("app.db"));
        assert!(!config.options.autoconnect);
        assert_eq!(config.options.fetch_style, FetchStyle::Assoc);
        assert_eq!(
            config.options.init_command.as_deref(),
            Some("PRAGMA journal_mode = WAL;")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.name, None);
        assert!(config.options.autoconnect);
        assert_eq!(config.options.fetch_style, FetchStyle::Object);
        assert_eq!(config.options.init_command.as_deref(), Some(DEFAULT_INIT_COMMAND));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_option_lookup() {
        let config = Config::from_toml_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.option("autoconnect"), Some(OptionValue::Bool(false)));
        assert_eq!(
            config.option("fetch.style"),
            Some(OptionValue::FetchStyle(FetchStyle::Assoc))
        );
        assert_eq!(config.option("fetch_style"), config.option("fetch.style"));
        assert_eq!(config.option("label"), Some(OptionValue::Text("primary".to_string())));
        assert_eq!(
            config.option("page_size_hint"),
            Some(OptionValue::Other(toml::Value::Integer(4096)))
        );
        assert_eq!(config.option("missing"), None);
    }

    #[test]
    fn test_dotted_fetch_style_key() {
        let config = Config::from_toml_str("[options]\n\"fetch.style\" = \"num\"").unwrap();
        assert_eq!(config.options.fetch_style, FetchStyle::Num);
        assert!(config.options.extra.is_empty());
        assert_eq!(
            config.option("fetch.style"),
            Some(OptionValue::FetchStyle(FetchStyle::Num))
        );
    }

    #[test]
    fn test_invalid_config() {
        match Config::from_toml_str("name = \"\"") {
            Err(AntDbError::Config(msg)) => assert!(msg.contains("name")),
            other => panic!("Expected Config error, got {:?}", other),
        }
        match Config::from_toml_str("[options]\nfetch_style = \"tuple\"") {
            Err(AntDbError::Toml(_)) => {}
            other => panic!("Expected Toml error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("app.db"));

        match load_config("/nonexistent/antdb.toml") {
            Err(AntDbError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
