use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub loader: LoaderSettings,
}

/// Bind address of the API server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface to bind (e.g. "0.0.0.0" to serve the dashboard from
    /// another host, "127.0.0.1" for local-only).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

/// Settings for the CSV batch loader and the fixture simulator.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderSettings {
    /// Directory holding the five CSV fixture files.
    pub data_dir: String,
}
