#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application configuration, loaded from `CATFEED_*` environment variables.
///
/// `base_url` must point at the store's REST root (e.g.
/// `https://shop.example.com/rest/V1`); `admin_token` is the integration
/// bearer token. Both are required — everything else has a documented
/// default.
#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub admin_token: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub page_size: u32,
    pub max_pages: u32,
    pub category_batch_size: usize,
    pub inventory_batch_size: usize,
    pub max_concurrent: usize,
    pub inter_chunk_delay_ms: u64,
    /// Wall-clock budget for a whole pipeline run; `None` disables it.
    pub pipeline_deadline_secs: Option<u64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("admin_token", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("category_batch_size", &self.category_batch_size)
            .field("inventory_batch_size", &self.inventory_batch_size)
            .field("max_concurrent", &self.max_concurrent)
            .field("inter_chunk_delay_ms", &self.inter_chunk_delay_ms)
            .field("pipeline_deadline_secs", &self.pipeline_deadline_secs)
            .finish()
    }
}
