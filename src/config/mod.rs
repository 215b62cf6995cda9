pub mod command;

use std::path::PathBuf;

use clap::{Args, Parser};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use url::Url;

pub use command::{Command, PostCommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "minglekari", version, about = "Minglekari social client")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Backend API endpoint, including the version prefix
    #[arg(
        long,
        global = true,
        env = "APPWRITE_ENDPOINT",
        default_value = "https://cloud.appwrite.io/v1"
    )]
    endpoint: Url,
    /// Backend project id
    #[arg(long, global = true, env = "APPWRITE_PROJECT_ID", default_value = "")]
    project: String,
    #[command(flatten)]
    pub ids: BackendIds,
    /// Where the session fallback marker is kept
    #[arg(long, global = true, env = "MINGLEKARI_STATE_DIR", default_value = ".minglekari")]
    state_dir: PathBuf,
    /// Limit request concurrency
    #[arg(long, global = true, default_value = "5")]
    limit: usize,
    /// Retries for transient transport failures (uploads are never retried)
    #[arg(long, global = true, default_value = "0")]
    retries: u32,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// Database, collection and bucket identifiers on the backend.
#[derive(Debug, Clone, Args, Default, PartialEq, Eq)]
pub struct BackendIds {
    #[arg(long = "database-id", global = true, env = "APPWRITE_DATABASE_ID", default_value = "")]
    pub database_id: String,
    #[arg(
        long = "user-collection-id",
        global = true,
        env = "APPWRITE_USER_COLLECTION_ID",
        default_value = ""
    )]
    pub user_collection_id: String,
    #[arg(
        long = "post-collection-id",
        global = true,
        env = "APPWRITE_POST_COLLECTION_ID",
        default_value = ""
    )]
    pub post_collection_id: String,
    #[arg(
        long = "saves-collection-id",
        global = true,
        env = "APPWRITE_SAVES_COLLECTION_ID",
        default_value = ""
    )]
    pub saves_collection_id: String,
    #[arg(long = "storage-id", global = true, env = "APPWRITE_STORAGE_ID", default_value = "")]
    pub storage_id: String,
}

impl Config {
    pub fn new(endpoint: Url, project: impl Into<String>, ids: BackendIds) -> Self {
        Self {
            endpoint,
            project: project.into(),
            ids,
            state_dir: PathBuf::from(".minglekari"),
            limit: 5,
            retries: 0,
            verbose: Verbosity::new(0, 0),
        }
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
    pub fn project(&self) -> &str {
        &self.project
    }
    pub fn fallback_path(&self) -> PathBuf {
        self.state_dir.join("cookie-fallback.json")
    }
    pub fn with_state_dir(mut self, state_dir: impl Into<PathBuf>) -> Self {
        self.state_dir = state_dir.into();
        self
    }
    pub const fn limit(&self) -> usize {
        self.limit
    }
    pub const fn retries(&self) -> u32 {
        self.retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_command() {
        let cli = <Cli as Parser>::try_parse_from([
            "minglekari",
            "--endpoint",
            "https://backend.example/v1",
            "--project",
            "mingle",
            "--database-id",
            "main",
            "--post-collection-id",
            "posts",
            "--limit",
            "2",
            "search",
            "sunset",
        ])
        .unwrap();

        assert_eq!(cli.config.endpoint().as_str(), "https://backend.example/v1");
        assert_eq!(cli.config.project(), "mingle");
        assert_eq!(cli.config.ids.database_id, "main");
        assert_eq!(cli.config.ids.post_collection_id, "posts");
        assert_eq!(cli.config.limit(), 2);
        assert_eq!(cli.config.retries(), 0);
        assert!(matches!(cli.command, Command::Search { ref term } if term == "sunset"));
    }

    #[test]
    fn fallback_lives_in_state_dir() {
        let config = Config::new(
            Url::parse("https://backend.example/v1").unwrap(),
            "mingle",
            BackendIds::default(),
        )
        .with_state_dir("/tmp/mingle");
        assert_eq!(
            config.fallback_path(),
            PathBuf::from("/tmp/mingle/cookie-fallback.json")
        );
    }
}
