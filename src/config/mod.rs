//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::SocketAddr,
    num::{NonZeroU32, NonZeroU64},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::types::Locale;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "diwan";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_ADMIN_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_ADMIN_PORT: u16 = 3001;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 15;
// Leaves headroom above the 10 MiB image ceiling for multipart framing.
const DEFAULT_UPLOAD_REQUEST_LIMIT_BYTES: u64 = 12 * 1024 * 1024;
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org/";

/// Command-line arguments for the Diwan binary.
#[derive(Debug, Parser)]
#[command(name = "diwan", version, about = "Diwan portfolio server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "DIWAN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Diwan HTTP services.
    Serve(Box<ServeArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the administrative listener host.
    #[arg(long = "server-admin-host", value_name = "HOST")]
    pub server_admin_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-public-port", value_name = "PORT")]
    pub public_port: Option<u16>,

    /// Override the administrative listener port.
    #[arg(long = "server-admin-port", value_name = "PORT")]
    pub admin_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the admin API bearer token.
    #[arg(long = "admin-token", value_name = "TOKEN")]
    pub admin_token: Option<String>,

    /// Override the default content locale (en|ar).
    #[arg(long = "site-default-locale", value_name = "LOCALE")]
    pub site_default_locale: Option<String>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub admin: AdminSettings,
    pub site: SiteSettings,
    pub uploads: UploadSettings,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
    pub admin_addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub default_locale: Locale,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub request_timeout: Duration,
    pub max_request_bytes: NonZeroU64,
    pub primary: Option<ImageHostSettings>,
    pub secondary: Option<ImageHostSettings>,
}

#[derive(Debug, Clone)]
pub struct ImageHostSettings {
    pub endpoint: Url,
    pub api_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct NotifySettings {
    pub email: Option<SmtpSettings>,
    pub telegram: Option<TelegramSettings>,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: bool,
    pub from_address: String,
    pub to_address: String,
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub api_base: Url,
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse the CLI and load settings in one step.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("DIWAN").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    admin: RawAdminSettings,
    site: RawSiteSettings,
    uploads: RawUploadSettings,
    notify: RawNotifySettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(host) = overrides.server_admin_host.as_ref() {
            self.server.admin_host = Some(host.clone());
        }
        if let Some(port) = overrides.public_port {
            self.server.public_port = Some(port);
        }
        if let Some(port) = overrides.admin_port {
            self.server.admin_port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(token) = overrides.admin_token.as_ref() {
            self.admin.token = Some(token.clone());
        }
        if let Some(locale) = overrides.site_default_locale.as_ref() {
            self.site.default_locale = Some(locale.clone());
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    admin_host: Option<String>,
    public_port: Option<u16>,
    admin_port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAdminSettings {
    token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    default_locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawUploadSettings {
    request_timeout_seconds: Option<u64>,
    max_request_bytes: Option<u64>,
    primary: Option<RawImageHostSettings>,
    secondary: Option<RawImageHostSettings>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawImageHostSettings {
    endpoint: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawNotifySettings {
    email: Option<RawSmtpSettings>,
    telegram: Option<RawTelegramSettings>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSmtpSettings {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    tls: Option<bool>,
    from_address: Option<String>,
    to_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTelegramSettings {
    api_base: Option<String>,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            admin,
            site,
            uploads,
            notify,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            admin: build_admin_settings(admin)?,
            site: build_site_settings(site)?,
            uploads: build_upload_settings(uploads)?,
            notify: build_notify_settings(notify)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let admin_host = server
        .admin_host
        .unwrap_or_else(|| DEFAULT_ADMIN_HOST.to_string());

    let public_port = server.public_port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if public_port == 0 {
        return Err(LoadError::invalid(
            "server.public_port",
            "port must be greater than zero",
        ));
    }

    let admin_port = server.admin_port.unwrap_or(DEFAULT_ADMIN_PORT);
    if admin_port == 0 {
        return Err(LoadError::invalid(
            "server.admin_port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, public_port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;
    let admin_addr = parse_socket_addr(&admin_host, admin_port)
        .map_err(|reason| LoadError::invalid("server.admin_addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        public_addr,
        admin_addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_value = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = NonZeroU32::new(max_value).ok_or_else(|| {
        LoadError::invalid("database.max_connections", "must be greater than zero")
    })?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_admin_settings(admin: RawAdminSettings) -> Result<AdminSettings, LoadError> {
    let token = admin
        .token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| LoadError::invalid("admin.token", "a non-empty token is required"))?;

    Ok(AdminSettings { token })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let default_locale = match site.default_locale.as_deref().map(str::trim) {
        None | Some("") | Some("en") => Locale::En,
        Some("ar") => Locale::Ar,
        Some(other) => {
            return Err(LoadError::invalid(
                "site.default_locale",
                format!("unknown locale `{other}`; expected `en` or `ar`"),
            ));
        }
    };

    Ok(SiteSettings { default_locale })
}

fn build_upload_settings(uploads: RawUploadSettings) -> Result<UploadSettings, LoadError> {
    let timeout_secs = uploads
        .request_timeout_seconds
        .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "uploads.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    let max_request_bytes_value = uploads
        .max_request_bytes
        .unwrap_or(DEFAULT_UPLOAD_REQUEST_LIMIT_BYTES);
    let max_request_bytes = NonZeroU64::new(max_request_bytes_value).ok_or_else(|| {
        LoadError::invalid("uploads.max_request_bytes", "must be greater than zero")
    })?;
    usize::try_from(max_request_bytes_value).map_err(|_| {
        LoadError::invalid(
            "uploads.max_request_bytes",
            "value exceeds supported range for usize",
        )
    })?;

    Ok(UploadSettings {
        request_timeout: Duration::from_secs(timeout_secs),
        max_request_bytes,
        primary: build_image_host(uploads.primary, "uploads.primary")?,
        secondary: build_image_host(uploads.secondary, "uploads.secondary")?,
    })
}

fn build_image_host(
    raw: Option<RawImageHostSettings>,
    key: &'static str,
) -> Result<Option<ImageHostSettings>, LoadError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let endpoint = raw
        .endpoint
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let api_key = raw
        .api_key
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match (endpoint, api_key) {
        (None, None) => Ok(None),
        (Some(endpoint), Some(api_key)) => {
            let endpoint = Url::parse(&endpoint)
                .map_err(|err| LoadError::invalid(key, format!("invalid endpoint: {err}")))?;
            Ok(Some(ImageHostSettings { endpoint, api_key }))
        }
        _ => Err(LoadError::invalid(
            key,
            "both `endpoint` and `api_key` must be provided",
        )),
    }
}

fn build_notify_settings(notify: RawNotifySettings) -> Result<NotifySettings, LoadError> {
    let email = match notify.email {
        Some(raw) => build_smtp_settings(raw)?,
        None => None,
    };

    let telegram = match notify.telegram {
        Some(raw) => build_telegram_settings(raw)?,
        None => None,
    };

    Ok(NotifySettings { email, telegram })
}

fn build_smtp_settings(raw: RawSmtpSettings) -> Result<Option<SmtpSettings>, LoadError> {
    let host = raw
        .host
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    // The whole channel is optional; a host is the switch that enables it.
    let Some(host) = host else {
        return Ok(None);
    };

    let from_address = raw
        .from_address
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| LoadError::invalid("notify.email.from_address", "required"))?;
    let to_address = raw
        .to_address
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| LoadError::invalid("notify.email.to_address", "required"))?;

    Ok(Some(SmtpSettings {
        host,
        port: raw.port.unwrap_or(587),
        username: raw.username,
        password: raw.password,
        tls: raw.tls.unwrap_or(true),
        from_address,
        to_address,
    }))
}

fn build_telegram_settings(raw: RawTelegramSettings) -> Result<Option<TelegramSettings>, LoadError> {
    let bot_token = raw
        .bot_token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let Some(bot_token) = bot_token else {
        return Ok(None);
    };

    let chat_id = raw
        .chat_id
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| LoadError::invalid("notify.telegram.chat_id", "required"))?;

    let api_base = raw
        .api_base
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
    let api_base = Url::parse(&api_base).map_err(|err| {
        LoadError::invalid("notify.telegram.api_base", format!("invalid url: {err}"))
    })?;

    Ok(Some(TelegramSettings {
        api_base,
        bot_token,
        chat_id,
    }))
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    format!("{host}:{port}")
        .parse()
        .map_err(|err| format!("failed to parse `{host}:{port}`: {err}"))
}

#[cfg(test)]
mod tests;
