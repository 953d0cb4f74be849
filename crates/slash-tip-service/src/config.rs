//! Service configuration.

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/slash-tip").
    pub data_dir: String,

    /// Transaction relay API URL (optional; tipping is disabled without it).
    pub relay_api_url: Option<String>,

    /// Transaction relay API key (optional).
    pub relay_api_key: Option<String>,

    /// Relay project id owning the sending wallets.
    pub relay_project_id: String,

    /// Default chain id for submitted transactions.
    pub chain_id: u64,

    /// Factory contract for per-org deployments (optional).
    pub factory_address: Option<String>,

    /// Admin address granted control of deployed contracts.
    pub admin_address: Option<String>,

    /// Relayer addresses allowed to operate deployed contracts.
    pub operator_addresses: Vec<String>,

    /// Text generation API URL (optional; poems degrade to fallbacks).
    pub textgen_api_url: Option<String>,

    /// Text generation API key (optional).
    pub textgen_api_key: Option<String>,

    /// Text generation model name.
    pub textgen_model: String,

    /// Shared secret for the indexer webhook signature.
    pub indexer_webhook_secret: Option<String>,

    /// Service API key for service-to-service auth.
    pub service_api_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/slash-tip".into()),
            relay_api_url: std::env::var("RELAY_API_URL").ok(),
            relay_api_key: std::env::var("RELAY_API_KEY").ok(),
            relay_project_id: std::env::var("RELAY_PROJECT_ID").unwrap_or_default(),
            chain_id: std::env::var("CHAIN_ID")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8453), // Base mainnet
            factory_address: std::env::var("FACTORY_ADDRESS").ok(),
            admin_address: std::env::var("ADMIN_ADDRESS").ok(),
            operator_addresses: std::env::var("OPERATOR_ADDRESSES")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            textgen_api_url: std::env::var("TEXTGEN_API_URL").ok(),
            textgen_api_key: std::env::var("TEXTGEN_API_KEY").ok(),
            textgen_model: std::env::var("TEXTGEN_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
            indexer_webhook_secret: std::env::var("INDEXER_WEBHOOK_SECRET").ok(),
            service_api_key: std::env::var("SERVICE_API_KEY").ok(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/slash-tip".into(),
            relay_api_url: None,
            relay_api_key: None,
            relay_project_id: String::new(),
            chain_id: 8453,
            factory_address: None,
            admin_address: None,
            operator_addresses: Vec::new(),
            textgen_api_url: None,
            textgen_api_key: None,
            textgen_model: "gpt-4o".into(),
            indexer_webhook_secret: None,
            service_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
