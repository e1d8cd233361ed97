use std::path::PathBuf;

/// Application configuration for one pipeline invocation.
///
/// Every field is read from the environment with a documented default (see
/// `config.rs`); nothing is read lazily at use sites, so a constructed
/// `AppConfig` is the complete picture of a run's settings.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub topics_path: PathBuf,
    /// Directory for raw-batch snapshots. `None` disables the backup artifact.
    pub backup_dir: Option<PathBuf>,

    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// When set, used verbatim instead of the composed host/port/user URL.
    pub database_url_override: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub reddit_request_timeout_secs: u64,
    /// Per-(collection, term) ceiling on fetched posts.
    pub posts_per_query: usize,
    /// Listing page size; Reddit caps search pages at 100.
    pub page_size: u32,
    pub inter_query_delay_ms: u64,
    pub error_cooldown_secs: u64,
    /// Upper bound on the in-memory batch across the whole query matrix.
    pub max_batch_size: usize,
}

impl AppConfig {
    /// The Postgres connection URL for the warehouse.
    ///
    /// `DATABASE_URL` takes precedence when set; otherwise the URL is composed
    /// from the individual host/port/user/password/database options.
    #[must_use]
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url_override {
            return url.clone();
        }
        if self.db_password.is_empty() {
            format!(
                "postgres://{}@{}:{}/{}",
                self.db_user, self.db_host, self.db_port, self.db_name
            )
        } else {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
            )
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("topics_path", &self.topics_path)
            .field("backup_dir", &self.backup_dir)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"[redacted]")
            .field("db_name", &self.db_name)
            .field(
                "database_url_override",
                &self.database_url_override.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "reddit_request_timeout_secs",
                &self.reddit_request_timeout_secs,
            )
            .field("posts_per_query", &self.posts_per_query)
            .field("page_size", &self.page_size)
            .field("inter_query_delay_ms", &self.inter_query_delay_ms)
            .field("error_cooldown_secs", &self.error_cooldown_secs)
            .field("max_batch_size", &self.max_batch_size)
            .finish()
    }
}
