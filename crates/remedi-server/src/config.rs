//! Server configuration.

use clap::Parser;

/// Remedi pharmacy backend server.
///
/// Every flag can also be supplied through the environment; a `.env` file
/// is loaded in development before parsing.
#[derive(Debug, Parser)]
#[command(name = "remedi-server", about = "Online pharmacy backend")]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// Database name.
    #[arg(long, env = "MONGODB_DB", default_value = "remedi")]
    pub mongodb_db: String,

    /// Identity provider base URL.
    #[arg(
        long,
        env = "IDENTITY_BASE_URL",
        default_value = "https://identitytoolkit.googleapis.com"
    )]
    pub identity_base_url: String,

    /// Identity provider API key.
    #[arg(long, env = "IDENTITY_API_KEY")]
    pub identity_api_key: String,

    /// Push provider send endpoint.
    #[arg(
        long,
        env = "PUSH_ENDPOINT",
        default_value = "https://fcm.googleapis.com/fcm/send"
    )]
    pub push_endpoint: String,

    /// Push provider server key.
    #[arg(long, env = "PUSH_SERVER_KEY")]
    pub push_server_key: String,

    /// Mount the testing-only cart listing route.
    #[arg(long, env = "DEBUG_ROUTES", default_value_t = false)]
    pub debug_routes: bool,
}
