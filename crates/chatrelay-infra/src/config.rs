//! Configuration loader for chatrelay.
//!
//! Reads `config.toml` from the data directory (`~/.chatrelay/` in production)
//! into [`RelayConfig`], then layers environment overrides on top. Falls back
//! to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use chatrelay_types::agent::{AgentKind, AgentTarget};
use chatrelay_types::config::RelayConfig;

/// Signing secret used when `JWT_SECRET` is unset. Only suitable for local use.
const DEV_JWT_SECRET: &str = "chatrelay-dev-secret-change-in-production";

/// Environment variable pairs naming each agent's backend identifiers.
const AGENT_ENV: [(AgentKind, &str, &str); 4] = [
    (AgentKind::Supervisor, "SUPERVISOR_AGENT_ID", "SUPERVISOR_AGENT_ALIAS_ID"),
    (AgentKind::Generic, "GENERIC_AGENT_ID", "GENERIC_AGENT_ALIAS_ID"),
    (AgentKind::Coding, "CODING_AGENT_ID", "CODING_AGENT_ALIAS_ID"),
    (AgentKind::Financial, "FINANCIAL_AGENT_ID", "FINANCIAL_AGENT_ALIAS_ID"),
];

/// Resolve the data directory.
///
/// Uses `CHATRELAY_DATA_DIR` when set, otherwise `~/.chatrelay`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATRELAY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatrelay");
    }

    PathBuf::from(".chatrelay")
}

/// SQLite URL for the database inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("chatrelay.db").display())
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// A missing file yields [`RelayConfig::default()`]. An unreadable or
/// unparsable file logs a warning and also yields the default.
pub async fn load_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            RelayConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` as the variable source.
///
/// An agent is only overridden when both its id and alias variables are set
/// and non-blank. The region falls back from `BEDROCK_REGION` to `AWS_REGION`.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (kind, id_var, alias_var) in AGENT_ENV {
        if let Some(target) = AgentTarget::from_parts(lookup(id_var), lookup(alias_var)) {
            config.agents.set_target(kind, Some(target));
        }
    }

    let region = lookup("BEDROCK_REGION")
        .or_else(|| lookup("AWS_REGION"))
        .filter(|r| !r.trim().is_empty());
    if let Some(region) = region {
        config.bedrock.region = region;
    }
}

/// Load the file config and apply process environment overrides.
pub async fn load_effective_config(data_dir: &Path) -> RelayConfig {
    let mut config = load_config(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Secrets taken from the environment only, never from `config.toml`.
pub struct Secrets {
    pub jwt_secret: SecretString,
    pub bedrock_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET is not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        let bedrock_api_key = lookup("AWS_BEARER_TOKEN_BEDROCK")
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        Self {
            jwt_secret: SecretString::from(jwt_secret),
            bedrock_api_key,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.checkpoint_interval, 3);
        assert!(config.agents.supervisor.is_none());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
checkpoint_interval = 4
retry_after_secs = 30

[agents.supervisor]
agent_id = "SUP"
alias_id = "LIVE"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.checkpoint_interval, 4);
        assert_eq!(config.retry_after_secs, 30);
        assert_eq!(config.agents.supervisor.unwrap().alias_id, "LIVE");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.checkpoint_interval, 3);
    }

    #[test]
    fn env_overrides_agents_and_region() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[
                ("SUPERVISOR_AGENT_ID", "SUP"),
                ("SUPERVISOR_AGENT_ALIAS_ID", "AL"),
                ("CODING_AGENT_ID", "COD"),
                ("AWS_REGION", "eu-central-1"),
            ]),
        );

        let sup = config.agents.target(AgentKind::Supervisor).unwrap();
        assert_eq!(sup.agent_id, "SUP");
        // Alias missing, so the coding agent stays unprovisioned.
        assert!(config.agents.target(AgentKind::Coding).is_none());
        assert_eq!(config.bedrock.region, "eu-central-1");
    }

    #[test]
    fn bedrock_region_wins_over_aws_region() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[("BEDROCK_REGION", "us-west-2"), ("AWS_REGION", "eu-central-1")]),
        );
        assert_eq!(config.bedrock.region, "us-west-2");
    }

    #[test]
    fn secrets_fall_back_to_dev_jwt_secret() {
        let secrets = Secrets::from_lookup(lookup_from(&[]));
        assert_eq!(secrets.jwt_secret.expose_secret(), DEV_JWT_SECRET);
        assert!(secrets.bedrock_api_key.is_none());

        let secrets = Secrets::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("AWS_BEARER_TOKEN_BEDROCK", "key"),
        ]));
        assert_eq!(secrets.jwt_secret.expose_secret(), "s3cret");
        assert_eq!(secrets.bedrock_api_key.unwrap().expose_secret(), "key");
    }

    #[test]
    fn database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/relay"));
        assert!(url.starts_with("sqlite:///tmp/relay/chatrelay.db"));
    }
}
