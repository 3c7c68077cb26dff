//! Configuration management for Typeshift.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present):
//! - Server bind address
//! - Management API connection
//! - Migration defaults (language, workflow step names)

use std::env;
use std::sync::OnceLock;

use typeshift_models::WorkflowNames;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub kontent: KontentConfig,
    pub migration: MigrationSettings,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct KontentConfig {
    pub project_id: String,
    pub management_api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Settings the migration services read. Built from the environment in the
/// server, constructed directly in tests.
#[derive(Debug, Clone)]
pub struct MigrationSettings {
    /// Language codename used when a request names none.
    pub default_language: String,
    pub workflow_names: WorkflowNames,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            default_language: "default".to_string(),
            workflow_names: WorkflowNames::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = WorkflowNames::default();

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_or("PORT", "8787").parse().unwrap_or(8787),
            },
            kontent: KontentConfig {
                project_id: env_or("KONTENT_PROJECT_ID", ""),
                management_api_key: env_or("KONTENT_MANAGEMENT_API_KEY", ""),
                base_url: env_or("KONTENT_MANAGEMENT_URL", "https://manage.kontent.ai/v2"),
                timeout_secs: env_or("KONTENT_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            },
            migration: MigrationSettings {
                default_language: env_or("DEFAULT_LANGUAGE", "default"),
                workflow_names: WorkflowNames {
                    draft: env_or("WORKFLOW_DRAFT_STEP", &defaults.draft),
                    published: env_or("WORKFLOW_PUBLISHED_STEP", &defaults.published),
                    archived: env_or("WORKFLOW_ARCHIVED_STEP", &defaults.archived),
                },
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
