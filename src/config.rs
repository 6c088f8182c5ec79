use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "DOCSERVE_CONFIG";
/// Overrides `listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";
/// Overrides `document_root`.
pub const DOC_ROOT_ENV: &str = "DOC_ROOT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub document_root: PathBuf,
    pub scripts: ScriptConfig,
}

/// Which files may be executed and how.
///
/// `allow_list` entries are matched against the request path with its
/// leading `/` removed, so `make_time.py` only matches `/make_time.py`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub extension: String,
    pub interpreter: String,
    pub allow_list: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:10000".to_string(),
            document_root: PathBuf::from("./webroot"),
            scripts: ScriptConfig::default(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            interpreter: "python3".to_string(),
            allow_list: vec!["make_time.py".to_string()],
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a variable lookup. The YAML file (if any) is
    /// read first, then `LISTEN` and `DOC_ROOT` override it.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_ENV) {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };

        if let Some(addr) = lookup(LISTEN_ENV) {
            cfg.listen_addr = addr;
        }
        if let Some(root) = lookup(DOC_ROOT_ENV) {
            cfg.document_root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg = serde_yaml::from_str(text)?;
        Ok(cfg)
    }
}
