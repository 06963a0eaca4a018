use std::path::PathBuf;

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

/// Where dealer names and feed identifiers are looked up.
#[derive(Clone, PartialEq, Eq)]
pub enum DirectorySource {
    /// PostgREST-style endpoint exposing the `dealer_site` table.
    Rest { base_url: String, api_key: String },
    /// Local YAML file with a `dealers:` list.
    File(PathBuf),
}

impl std::fmt::Debug for DirectorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectorySource::Rest { base_url, .. } => f
                .debug_struct("Rest")
                .field("base_url", base_url)
                .field("api_key", &"[redacted]")
                .finish(),
            DirectorySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub catalog_api_key: String,
    pub catalog_url: String,
    pub directory: DirectorySource,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub inter_page_delay_ms: u64,
    pub suggest_debounce_ms: u64,
    pub status_settle_ms: u64,
    pub suggestion_limit: usize,
    pub results_per_page: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("catalog_api_key", &"[redacted]")
            .field("catalog_url", &self.catalog_url)
            .field("directory", &self.directory)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("inter_page_delay_ms", &self.inter_page_delay_ms)
            .field("suggest_debounce_ms", &self.suggest_debounce_ms)
            .field("status_settle_ms", &self.status_settle_ms)
            .field("suggestion_limit", &self.suggestion_limit)
            .field("results_per_page", &self.results_per_page)
            .finish()
    }
}
