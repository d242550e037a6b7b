use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing_subscriber::filter::LevelFilter;

use crate::{client::DEFAULT_SIGNUP_PATH, error::Error, navigation::DEFAULT_REDIRECT_PATH};

/// Overrides `base_url` for local testing.
pub const BASE_URL_ENV: &str = "SIGNUP_BASE_URL";

fn deserialize_fromstr<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    let string = String::deserialize(deserializer)?;
    T::from_str(&string)
        .map_err(|e| de::Error::custom(format!("Error parsing '{}': {}", string, e)))
}

fn serialize_to_string<T: fmt::Display, S: Serializer>(field: &T, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&field.to_string())
}

fn default_signup_path() -> String {
    DEFAULT_SIGNUP_PATH.to_string()
}

fn default_redirect_path() -> String {
    DEFAULT_REDIRECT_PATH.to_string()
}

fn default_loglevel() -> LevelFilter {
    LevelFilter::INFO
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Scheme, host and port of the signup service.
    pub base_url: String,
    #[serde(default = "default_signup_path")]
    pub signup_path: String,
    /// Where to go once the account was created.
    #[serde(default = "default_redirect_path")]
    pub redirect_path: String,
    #[serde(
        default = "default_loglevel",
        deserialize_with = "deserialize_fromstr",
        serialize_with = "serialize_to_string"
    )]
    pub log_level: LevelFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            signup_path: default_signup_path(),
            redirect_path: default_redirect_path(),
            log_level: default_loglevel(),
            log_file: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Apply `SIGNUP_BASE_URL` if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    fn check(&self) -> Result<(), Error> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if !self.redirect_path.starts_with('/') {
            return Err(Error::Config(format!(
                "redirect_path must be absolute, got '{}'",
                self.redirect_path
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml(r#"base_url = "http://localhost:3000""#).unwrap();
        assert_eq!(config, Config::new("http://localhost:3000".to_string()));
        assert_eq!(config.signup_path, "/api/auth/signup");
        assert_eq!(config.redirect_path, "/admin");
        assert_eq!(config.log_level, LevelFilter::INFO);
    }

    #[test]
    fn full_config() {
        let config = Config::from_toml(
            r#"
            base_url = "https://example.com"
            signup_path = "/v2/signup"
            redirect_path = "/dashboard"
            log_level = "debug"
            log_file = "/tmp/signup.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.signup_path, "/v2/signup");
        assert_eq!(config.redirect_path, "/dashboard");
        assert_eq!(config.log_level, LevelFilter::DEBUG);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/signup.log")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_toml("").is_err());
        assert!(Config::from_toml(r#"base_url = "localhost""#).is_err());
        assert!(Config::from_toml(
            r#"
            base_url = "http://localhost"
            log_level = "loud"
            "#
        )
        .is_err());
        assert!(Config::from_toml(
            r#"
            base_url = "http://localhost"
            redirect_path = "admin"
            "#
        )
        .is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::new("http://localhost:3000".to_string());
        let serialized = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml(&serialized).unwrap(), config);
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"base_url = "http://127.0.0.1:8080""#).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Config::from_file(&missing),
            Err(Error::Config(_))
        ));
    }
}
