//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The Facebook token is loaded from the FB_TOKEN env var or token_file,
//! never stored in the TOML directly to avoid leaking secrets.

use common::Secret;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
const DEFAULT_CONFIG_PATH: &str = "tindr.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Remote API settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Facebook identity used to authenticate
#[derive(Debug, Default, Deserialize)]
pub struct IdentityConfig {
    /// Overridden by FB_ID
    #[serde(default)]
    pub facebook_id: Option<String>,
    #[serde(skip)]
    pub facebook_token: Option<Secret<String>>,
    /// Path to a file containing the Facebook token (alternative to FB_TOKEN)
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

/// Fully resolved identity, ready for `Tindr::authenticate`
#[derive(Debug)]
pub struct Credentials {
    pub facebook_token: Secret<String>,
    pub facebook_id: String,
}

/// Where the config file path came from
#[derive(Debug, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    /// Named by --config or CONFIG_PATH; such a file must exist
    pub explicit: bool,
}

fn default_base_url() -> String {
    tindr::BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Like `load`, but a missing file means "defaults plus environment".
    pub fn load_or_default(path: &Path) -> common::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_toml("")
        }
    }

    /// Load from the resolved path, requiring the file only when it was named explicitly.
    pub fn load_from(source: &ConfigPath) -> common::Result<Self> {
        if source.explicit {
            Self::load(&source.path)
        } else {
            Self::load_or_default(&source.path)
        }
    }

    /// Parse, validate and overlay the environment.
    ///
    /// Token resolution order:
    /// 1. FB_TOKEN env var
    /// 2. token_file path from config
    fn from_toml(contents: &str) -> common::Result<Self> {
        let mut config: Config = toml::from_str(contents)?;

        if !config.api.base_url.starts_with("http://")
            && !config.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                config.api.base_url
            )));
        }

        if config.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if let Ok(id) = std::env::var("FB_ID") {
            config.identity.facebook_id = Some(id);
        }

        if let Ok(token) = std::env::var("FB_TOKEN") {
            config.identity.facebook_token = Some(Secret::new(token));
        } else if let Some(ref token_file) = config.identity.token_file {
            let token = std::fs::read_to_string(token_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read token_file {}: {e}",
                    token_file.display()
                ))
            })?;
            let token = token.trim().to_owned();
            if !token.is_empty() {
                config.identity.facebook_token = Some(Secret::new(token));
            }
        }

        Ok(config)
    }

    /// Both halves of the Facebook identity, or a config error naming what is missing.
    pub fn credentials(&self) -> common::Result<Credentials> {
        let facebook_token = self.identity.facebook_token.clone().ok_or_else(|| {
            common::Error::Config("Facebook token missing: set FB_TOKEN or identity.token_file".into())
        })?;
        let facebook_id = self.identity.facebook_id.clone().ok_or_else(|| {
            common::Error::Config("Facebook id missing: set FB_ID or identity.facebook_id".into())
        })?;
        Ok(Credentials {
            facebook_token,
            facebook_id,
        })
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> ConfigPath {
        if let Some(p) = cli_path {
            return ConfigPath {
                path: PathBuf::from(p),
                explicit: true,
            };
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return ConfigPath {
                path: PathBuf::from(p),
                explicit: true,
            };
        }
        ConfigPath {
            path: PathBuf::from(DEFAULT_CONFIG_PATH),
            explicit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that mutate environment variables, preventing
    /// data races when tests run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn clear_identity_env() {
        unsafe {
            remove_env("FB_TOKEN");
            remove_env("FB_ID");
        }
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("tindr.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[api]
base_url = "http://127.0.0.1:9000"
timeout_secs = 5

[identity]
facebook_id = "1234"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.identity.facebook_id.as_deref(), Some("1234"));
        assert!(config.identity.facebook_token.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://api.gotinder.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.identity.facebook_id.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/path/tindr.toml"));
        assert!(matches!(result, Err(common::Error::Io(_))));
    }

    #[test]
    fn test_load_or_default_tolerates_missing_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let config = Config::load_or_default(Path::new("/nonexistent/path/tindr.toml")).unwrap();
        assert_eq!(config.api.base_url, "https://api.gotinder.com");
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "not valid {{{{ toml");
        let result = Config::load(&path);
        assert!(matches!(result, Err(common::Error::Toml(_))));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\nbase_url = \"ftp://api.gotinder.com\"\n");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("base_url"), "got: {err}");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\ntimeout_secs = 0\n");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"), "got: {err}");
    }

    #[test]
    fn test_identity_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[identity]\nfacebook_id = \"from-file\"\n");

        unsafe {
            set_env("FB_TOKEN", "env-token");
            set_env("FB_ID", "env-id");
        }
        let config = Config::load(&path).unwrap();
        clear_identity_env();

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.facebook_token.expose(), "env-token");
        assert_eq!(credentials.facebook_id, "env-id");
    }

    #[test]
    fn test_token_from_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("fb_token");
        std::fs::write(&token_path, "file-token\n").unwrap();
        let path = write_config(
            &dir,
            &format!(
                "[identity]\nfacebook_id = \"1234\"\ntoken_file = \"{}\"\n",
                token_path.display()
            ),
        );

        let config = Config::load(&path).unwrap();
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.facebook_token.expose(), "file-token");
        assert_eq!(credentials.facebook_id, "1234");
    }

    #[test]
    fn test_env_token_overrides_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("fb_token");
        std::fs::write(&token_path, "file-token").unwrap();
        let path = write_config(
            &dir,
            &format!("[identity]\ntoken_file = \"{}\"\n", token_path.display()),
        );

        unsafe { set_env("FB_TOKEN", "env-token") };
        let config = Config::load(&path).unwrap();
        clear_identity_env();

        assert_eq!(
            config.identity.facebook_token.as_ref().unwrap().expose(),
            "env-token"
        );
    }

    #[test]
    fn test_unreadable_token_file_is_config_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[identity]\ntoken_file = \"/nonexistent/fb_token\"\n",
        );

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, common::Error::Config(_)), "got: {err:?}");
    }

    #[test]
    fn test_credentials_require_token_and_id() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_identity_env();
        let config = Config::load_or_default(Path::new("/nonexistent/tindr.toml")).unwrap();
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("FB_TOKEN"), "got: {err}");

        unsafe { set_env("FB_TOKEN", "tok") };
        let config = Config::load_or_default(Path::new("/nonexistent/tindr.toml")).unwrap();
        clear_identity_env();
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("FB_ID"), "got: {err}");
    }

    #[test]
    fn test_debug_redacts_token() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("FB_TOKEN", "very-secret-fb-token") };
        let config = Config::load_or_default(Path::new("/nonexistent/tindr.toml")).unwrap();
        clear_identity_env();

        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-fb-token"), "leaked: {debug}");
    }

    #[test]
    fn test_resolve_path_cli_arg() {
        let source = Config::resolve_path(Some("/etc/tindr/custom.toml"));
        assert_eq!(source.path, PathBuf::from("/etc/tindr/custom.toml"));
        assert!(source.explicit);
    }

    #[test]
    fn test_resolve_path_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/tmp/from-env.toml") };
        let source = Config::resolve_path(None);
        unsafe { remove_env("CONFIG_PATH") };
        assert_eq!(source.path, PathBuf::from("/tmp/from-env.toml"));
        assert!(source.explicit);
    }

    #[test]
    fn test_resolve_path_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("CONFIG_PATH") };
        let source = Config::resolve_path(None);
        assert_eq!(source.path, PathBuf::from("tindr.toml"));
        assert!(!source.explicit);
    }

    #[test]
    fn test_load_from_explicit_requires_file() {
        let source = ConfigPath {
            path: PathBuf::from("/nonexistent/explicit.toml"),
            explicit: true,
        };
        assert!(Config::load_from(&source).is_err());
    }
}
