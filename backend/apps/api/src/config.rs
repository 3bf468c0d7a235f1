//! Process configuration read from the environment

use std::str::FromStr;
use std::time::Duration;

use chain::Pubkey;
use listing::ListingConfig;
use platform::config::{ConfigError, env_list, env_or, env_parse_or, optional_env, require_env};
use platform::jwt::DEFAULT_TOKEN_TTL;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_METADATA_BASE_URL: &str = "http://localhost:3000/metadata";
const DEFAULT_ORIGINS: &str = "http://localhost:3001,http://127.0.0.1:3001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn is_development(&self) -> bool {
        matches!(self, AppEnv::Development)
    }
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            _ => Err(()),
        }
    }
}

/// Secrets are held as given; nothing here implements `Debug`.
pub struct ApiConfig {
    pub env: AppEnv,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// `None` in development means a random per-process secret
    pub jwt_secret: Option<String>,
    pub jwt_ttl: Duration,
    pub frontend_origins: Vec<String>,
    pub solana_rpc_url: String,
    pub share_program_id: Pubkey,
    /// base58 64-byte keypair; minting runs offline without it
    pub mint_authority: Option<String>,
    pub metadata_base_url: String,
    pub helius_auth_token: Option<String>,
    pub kyc_webhook_secret: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub job_poll_interval: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_env = env_or("APP_ENV", "development");
        let env = raw_env.parse::<AppEnv>().map_err(|_| ConfigError::Invalid {
            key: "APP_ENV".to_string(),
            value: raw_env.clone(),
        })?;

        let jwt_secret = match env {
            AppEnv::Production => Some(require_env("JWT_SECRET")?),
            AppEnv::Development => optional_env("JWT_SECRET"),
        };

        let share_program_id = match optional_env("SOLANA_SHARE_PROGRAM_ID") {
            Some(raw) => raw.trim().parse::<Pubkey>().map_err(|_| ConfigError::Invalid {
                key: "SOLANA_SHARE_PROGRAM_ID".to_string(),
                value: raw,
            })?,
            None => ListingConfig::development_program_id(),
        };

        let mut frontend_origins = env_list("FRONTEND_ORIGINS");
        if frontend_origins.is_empty() {
            frontend_origins = DEFAULT_ORIGINS.split(',').map(str::to_string).collect();
        }

        Ok(Self {
            env,
            port: env_parse_or("PORT", DEFAULT_PORT)?,
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_ttl: Duration::from_secs(env_parse_or("JWT_TTL_SECS", DEFAULT_TOKEN_TTL.as_secs())?),
            frontend_origins,
            solana_rpc_url: env_or("SOLANA_RPC_URL", DEFAULT_RPC_URL),
            share_program_id,
            mint_authority: optional_env("SOLANA_MINT_AUTHORITY"),
            metadata_base_url: env_or("METADATA_BASE_URL", DEFAULT_METADATA_BASE_URL),
            helius_auth_token: optional_env("HELIUS_AUTH_TOKEN"),
            kyc_webhook_secret: optional_env("KYC_WEBHOOK_SECRET"),
            stripe_webhook_secret: optional_env("STRIPE_WEBHOOK_SECRET"),
            job_poll_interval: Duration::from_millis(env_parse_or("JOB_POLL_INTERVAL_MS", 2000)?),
        })
    }

    /// Startup log line without secrets
    pub fn log_summary(&self) {
        tracing::info!(
            env = ?self.env,
            port = self.port,
            db_max_connections = self.database_max_connections,
            solana_rpc = %self.solana_rpc_url,
            share_program = %self.share_program_id,
            minting = if self.mint_authority.is_some() { "solana" } else { "offline" },
            helius_webhook = self.helius_auth_token.is_some(),
            kyc_webhook = self.kyc_webhook_secret.is_some(),
            stripe_webhook = self.stripe_webhook_secret.is_some(),
            "Configuration loaded"
        );
    }
}
