// Configuration for the demo run. Everything is supplied as literal values
// by the binary (see `main.rs`); a production version would source the
// credential values from secret storage instead of compiled-in constants.

use std::path::PathBuf;

/// Application identity and credentials for the storage provider.
///
/// `access_token` is the persistent token from the provider's app console.
/// When it is `None` the one-time interactive authorisation flow runs
/// instead (see the `auth` module). The token lives for the process only
/// and is never written to disk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_key: String,
    pub app_secret: String,
    pub app_name: String,
    pub locale: String,
    pub access_token: Option<String>,
}

/// What the demo run actually touches: the directory it lists and the one
/// file it uploads and then downloads back.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub list_path: String,
    pub detailed_listing: bool,
    pub local_source: PathBuf,
    pub remote_path: String,
    pub local_dest: PathBuf,
}
