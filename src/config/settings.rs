use crate::errors::ConfigurationError;

pub const URL_VARIABLE: &str = "SUPABASE_URL";
pub const KEY_VARIABLE: &str = "SUPABASE_ANON_KEY";
const BROWSER_PREFIX: &str = "VITE_";

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub url: String,
    pub anon_key: String,
    pub schema: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub heartbeat_secs: u64,
}

impl RemoteSettings {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            schema: "public",
            user_agent: "ChessMasters/1.0",
            timeout_secs: 30,
            heartbeat_secs: 30,
        }
    }

    /// REST endpoint for a table, e.g. `https://x.supabase.co/rest/v1/matches`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    /// Realtime websocket endpoint with the key embedded as query parameter
    pub fn realtime_url(&self) -> String {
        let base = if let Some(rest) = self.url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.url.clone()
        };
        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            base,
            urlencoding::encode(&self.anon_key)
        )
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub assets_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            assets_dir: "dist".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub remote: RemoteSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn new(remote: RemoteSettings) -> Self {
        Self {
            remote,
            server: ServerSettings::default(),
        }
    }

    /// Reads the remote credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, URL_VARIABLE)?;
        let anon_key = required(&lookup, KEY_VARIABLE)?;

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigurationError::InvalidUrl(url));
        }

        Ok(Self::new(RemoteSettings::new(url, anon_key)))
    }

    pub fn with_server(mut self, port: u16, assets_dir: impl Into<String>) -> Self {
        self.server = ServerSettings {
            port,
            assets_dir: assets_dir.into(),
        };
        self
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .or_else(|| lookup(&format!("{BROWSER_PREFIX}{name}")))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigurationError::MissingVariable(name))
}
