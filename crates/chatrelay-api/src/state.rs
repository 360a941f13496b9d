//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over store/backend/verifier traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use chatrelay_core::relay::intake::{ChatIntake, IntakeSettings};
use chatrelay_core::relay::status::StatusQuery;
use chatrelay_core::relay::stream::StreamRelay;
use chatrelay_core::user::service::UserService;
use chatrelay_infra::bedrock::client::BedrockAgentBackend;
use chatrelay_infra::config::{Secrets, load_effective_config};
use chatrelay_infra::crypto::jwt::JwtTokenService;
use chatrelay_infra::crypto::password::Argon2CredentialHasher;
use chatrelay_infra::sqlite::pool::DatabasePool;
use chatrelay_infra::sqlite::session::SqliteSessionStore;
use chatrelay_infra::sqlite::user::SqliteUserRepository;
use chatrelay_types::agent::AgentKind;
use chatrelay_types::config::RelayConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatIntake = ChatIntake<SqliteSessionStore, BedrockAgentBackend, JwtTokenService>;

pub type ConcreteStatusQuery = StatusQuery<SqliteSessionStore>;

pub type ConcreteUserService =
    UserService<SqliteUserRepository, Argon2CredentialHasher, JwtTokenService>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_intake: Arc<ConcreteChatIntake>,
    pub status_query: Arc<ConcreteStatusQuery>,
    pub user_service: Arc<ConcreteUserService>,
    pub tokens: Arc<JwtTokenService>,
    pub sessions: Arc<SqliteSessionStore>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration and secrets from `data_dir` and the environment,
    /// then wire the services.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        let config = load_effective_config(&data_dir).await;
        Self::build(data_dir, config, Secrets::from_env()).await
    }

    /// Wire the services from explicit configuration.
    pub async fn build(data_dir: PathBuf, config: RelayConfig, secrets: Secrets) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::open(&data_dir).await?;
        let sessions = Arc::new(SqliteSessionStore::new(db_pool.clone()));
        let tokens = Arc::new(JwtTokenService::new(&secrets.jwt_secret, config.token_ttl_hours));

        let supervisor = config.agents.target(AgentKind::Supervisor).cloned();
        if supervisor.is_none() {
            tracing::warn!("supervisor agent is not configured; chat requests will fail");
        }
        if secrets.bedrock_api_key.is_none() {
            tracing::warn!("AWS_BEARER_TOKEN_BEDROCK is not set; agent invocations will fail");
        }

        let backend = Arc::new(BedrockAgentBackend::new(&config.bedrock, secrets.bedrock_api_key)?);
        let relay = StreamRelay::new(sessions.clone(), backend, config.checkpoint_interval);
        let chat_intake = ChatIntake::new(
            sessions.clone(),
            relay,
            tokens.clone(),
            IntakeSettings {
                supervisor,
                session_ttl_secs: config.session_ttl_secs,
                retry_after_secs: config.retry_after_secs,
            },
        );

        let user_service = UserService::new(
            Arc::new(SqliteUserRepository::new(db_pool)),
            Arc::new(Argon2CredentialHasher::new()),
            tokens.clone(),
        );

        Ok(Self {
            chat_intake: Arc::new(chat_intake),
            status_query: Arc::new(StatusQuery::new(sessions.clone())),
            user_service: Arc::new(user_service),
            tokens,
            sessions,
            config: Arc::new(config),
            data_dir,
        })
    }
}
