use std::env;

/// Runtime configuration resolved once at startup.
///
/// Only process-level settings live here; bot credentials and the notification
/// target are resolved per-use through the layered lookup in
/// `notifications::credentials`, because they can be changed at runtime.
#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub http_listen_addr: String,
    pub jwt_secret: String,
    /// 32-byte hex key used to seal bot credentials stored in the settings table.
    pub settings_seal_key: String,
    pub stock_monitor_period_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let http_listen_addr =
            env::var("HTTP_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let settings_seal_key = env::var("SETTINGS_SEAL_KEY")
            .map_err(|_| "SETTINGS_SEAL_KEY must be set as a 32-byte hex-encoded string".to_string())?;

        let stock_monitor_period_secs = match env::var("STOCK_MONITOR_PERIOD_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("STOCK_MONITOR_PERIOD_SECS is not a number: {raw}"))?,
            Err(_) => 10,
        };

        Ok(ServerConfig {
            database_url,
            http_listen_addr,
            jwt_secret,
            settings_seal_key,
            stock_monitor_period_secs,
        })
    }
}
