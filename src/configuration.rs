use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub transcoding: TranscodingSettings,
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub feed: FeedSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub user_name: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user_name, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Object storage holding the film assets. Credentials fall back to the
/// default AWS provider chain when absent.
#[derive(Deserialize, Clone, Debug)]
pub struct StorageSettings {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_secs: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl_minutes: i64,
    /// Lets anyone register into any group. Otherwise only admins may
    /// register users outside the default group.
    #[serde(default)]
    pub open_group_registration: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TranscodingSettings {
    pub ffmpeg_path: String,
    pub work_dir: String,
    pub default_resolutions: Vec<String>,
    #[serde(default)]
    pub auto_transcode: bool,
    pub queue_capacity: usize,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub smtp_relay: String,
    pub sender: String,
    pub sender_password: String,
    pub channel_capacity: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FeedSettings {
    pub size: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings { size: 10 }
    }
}

fn default_presign_expiry() -> u64 {
    3600
}

/// Reads `<filename>.json` and layers `APP_*` environment variables on top,
/// e.g. `APP_STORAGE__BUCKET=my-bucket`.
pub fn get_configuration(filename: &str) -> Result<Settings, config::ConfigError> {
    let mut builder = Config::builder();
    builder = builder
        .add_source(File::new(filename, FileFormat::Json))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );
    let config = builder.build()?;
    config.try_deserialize()
}
