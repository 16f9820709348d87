use serde::Deserialize;
use std::io::Read;
use std::{
    env,
    fs::File,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use thiserror::*;
use url::Url;

pub const CHANNEL_SIZE: usize = 32;

pub const CONFIG_PATH_ENV: &str = "TODOBOT_CONFIG";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_CHATBOT_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_CHATBOT_MODEL: &str = "gemini-1.5-flash";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error {0} when reading config")]
    IoError(#[from] std::io::Error),
    #[error("cannot open config file '{0}' : {1}")]
    OpeningError(PathBuf, std::io::Error),
    #[error("UTF8 format error when reading config")]
    Utf8Error,
    #[error("format error {0} when reading config")]
    FormatError(#[from] serde_yaml::Error),
    #[error("invalid listen address '{0}'")]
    BadAddress(String),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Listen {
    pub host: String,
    pub port: u16,
}

impl Default for Listen {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
        }
    }
}

impl Listen {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::BadAddress(addr))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChatbotConfig {
    pub url: Url,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_CHATBOT_URL).expect("default chatbot url is valid"),
            model: DEFAULT_CHATBOT_MODEL.into(),
            api_key: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: Listen,
    pub log: Option<crate::log::Log>,
    pub chatbot: ChatbotConfig,
}

impl Config {
    pub fn from_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let p = path.as_ref();
        let mut file = File::open(p).map_err(|e| ConfigError::OpeningError(p.to_owned(), e))?;
        let mut contents = vec![];
        file.read_to_end(&mut contents)?;
        let contents = String::from_utf8(contents).map_err(|_| ConfigError::Utf8Error)?;
        let config = Config::from_str(&contents)?;
        Ok(config)
    }

    /// Read the config file named by `TODOBOT_CONFIG` (defaults when unset),
    /// then let `GEMINI_API_KEY` override the api key.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config::default(),
        };
        config.apply_api_key(env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.chatbot.api_key = Some(key);
        }
    }
}

pub mod testdata {
    use super::Config;

    #[allow(dead_code)]
    pub fn test_config() -> Config {
        Config::from_str(
            r#"
        log:
            level: trace
            ansi: false
        listen:
            host: 127.0.0.1
            port: 5055
        chatbot:
            url: http://localhost:8080
            model: gemini-test
            api_key: test-key
        "#,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = testdata::test_config();

        assert_eq!(config.listen.port, 5055);
        assert_eq!(
            config.listen.socket_addr().unwrap(),
            "127.0.0.1:5055".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.chatbot.url.as_str(), "http://localhost:8080/");
        assert_eq!(config.chatbot.model, "gemini-test");
        assert_eq!(config.chatbot.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.log.unwrap().level, "trace");
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let config = Config::from_str("listen:\n    port: 8000\n").unwrap();

        assert_eq!(config.listen.host, "127.0.0.1");
        assert_eq!(config.listen.port, 8000);
        assert_eq!(config.chatbot.model, DEFAULT_CHATBOT_MODEL);
        assert!(config.chatbot.api_key.is_none());
        assert!(config.log.is_none());
    }

    #[test]
    fn test_api_key_override() {
        let mut config = Config::default();
        config.apply_api_key(Some(String::new()));
        assert!(config.chatbot.api_key.is_none(), "empty key is ignored");

        config.apply_api_key(Some("from-env".into()));
        assert_eq!(config.chatbot.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_bad_listen_address() {
        let listen = Listen {
            host: "not a host".into(),
            port: 80,
        };
        assert!(matches!(
            listen.socket_addr(),
            Err(ConfigError::BadAddress(_))
        ));
    }
}
