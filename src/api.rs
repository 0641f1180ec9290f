// Storage client module: the calling contract the demo flow consumes, plus
// a small blocking HTTP client that implements it against the provider's
// API. It is intentionally synchronous: the demo is a single linear pass,
// so there is nothing to overlap.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION};
use serde::Deserialize;
use std::io::{Read, Write};

use crate::config::AppConfig;

/// Base URL of the provider's API. The demo talks to the one deployment,
/// so this is a constant rather than configuration.
const API_BASE_URL: &str = "https://api.cumulus-storage.example/2";

/// Response header carrying the transfer metadata of a downloaded file,
/// so the response body can stay raw bytes.
const TRANSFER_METADATA_HEADER: &str = "x-transfer-metadata";

/// Account details as reported by the provider.
#[derive(Deserialize, Debug)]
pub struct AccountInfo {
    pub display_name: String,
}

/// One entry of a directory listing. `size` and `revision` are reported
/// for files only; folders carry just the kind.
#[derive(Deserialize, Debug, Clone)]
pub struct EntryMetadata {
    pub name: String,
    pub kind: String,
    pub size: Option<u64>,
    pub revision: Option<String>,
}

impl EntryMetadata {
    /// Human-readable summary used by the detailed listing.
    pub fn describe(&self) -> String {
        let mut parts = vec![self.kind.clone()];
        if let Some(size) = self.size {
            parts.push(format!("{} bytes", size));
        }
        if let Some(rev) = &self.revision {
            parts.push(format!("rev {}", rev));
        }
        parts.join(", ")
    }
}

/// Snapshot of a directory's children, in the order the provider returned
/// them. Fetched fresh on every call, never cached.
#[derive(Deserialize, Debug)]
pub struct DirectoryListing {
    pub children: Vec<EntryMetadata>,
}

/// Metadata describing a file after a completed upload or download.
#[derive(Deserialize, Debug, Clone)]
pub struct FileTransferResult {
    pub path: String,
    pub size: u64,
    pub revision: String,
}

/// How an upload resolves a name conflict with an existing remote file.
/// The demo always uses `Add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep both: the uploaded file is renamed ("name (1)") on conflict.
    Add,
    /// Replace whatever is there.
    Overwrite,
    /// Replace the given revision; the provider produces a conflicted copy
    /// if the file changed since that revision was fetched.
    Update { revision: String },
}

impl WriteMode {
    /// Form fields this mode contributes to an upload request.
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            WriteMode::Add => vec![("mode", "add".into())],
            WriteMode::Overwrite => vec![("mode", "overwrite".into())],
            WriteMode::Update { revision } => vec![
                ("mode", "update".into()),
                ("parent_rev", revision.clone()),
            ],
        }
    }
}

/// The operations the demo flow needs from an authenticated session.
/// `HttpStorageClient` is the real implementation; tests drive the flow
/// with an in-memory double instead.
pub trait StorageClient {
    fn account_info(&self) -> Result<AccountInfo>;

    fn metadata_with_children(&self, path: &str) -> Result<DirectoryListing>;

    fn upload_file(
        &self,
        dest_path: &str,
        mode: WriteMode,
        length: u64,
        source: Box<dyn Read + Send>,
    ) -> Result<FileTransferResult>;

    fn get_file(
        &self,
        source_path: &str,
        revision: Option<&str>,
        sink: &mut dyn Write,
    ) -> Result<FileTransferResult>;
}

/// Authenticated session handle: a reqwest blocking client, the API base
/// URL and the bearer token every request carries.
pub struct HttpStorageClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpStorageClient {
    /// Build a session from the app identity and an access token. Fails
    /// when the token is empty; anything the provider rejects later is
    /// reported by the individual operations instead.
    pub fn new(config: &AppConfig, token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            bail!("access token is empty");
        }
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.locale)
                .context("Configured locale is not a valid header value")?,
        );
        let client = Client::builder()
            .user_agent(config.app_name.clone())
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpStorageClient {
            client,
            base_url: API_BASE_URL.to_string(),
            token: token.to_string(),
        })
    }

    /// Helper to build the Authorization header map for a request.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", self.token);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&val).unwrap());
        headers
    }
}

impl StorageClient for HttpStorageClient {
    fn account_info(&self) -> Result<AccountInfo> {
        let url = format!("{}/account/info", &self.base_url);
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .context("Failed to send account info request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Account info failed: {} - {}", status, txt);
        }
        let info: AccountInfo = res.json().context("Parsing account info json")?;
        Ok(info)
    }

    fn metadata_with_children(&self, path: &str) -> Result<DirectoryListing> {
        let url = format!("{}/metadata", &self.base_url);
        let res = self
            .client
            .get(&url)
            .query(&[("path", path), ("children", "true")])
            .headers(self.auth_headers())
            .send()
            .context("Failed to send metadata request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Metadata failed: {} - {}", status, txt);
        }
        let listing: DirectoryListing = res.json().context("Parsing directory listing json")?;
        Ok(listing)
    }

    fn upload_file(
        &self,
        dest_path: &str,
        mode: WriteMode,
        length: u64,
        source: Box<dyn Read + Send>,
    ) -> Result<FileTransferResult> {
        let url = format!("{}/files/upload", &self.base_url);

        // The declared length travels with the part so the provider can
        // reject truncated bodies.
        let file_name = dest_path.rsplit('/').next().unwrap_or(dest_path).to_string();
        let part = multipart::Part::reader_with_length(source, length)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .unwrap();
        let mut form = multipart::Form::new()
            .part("file", part)
            .text("path", dest_path.to_string());
        for (name, value) in mode.form_fields() {
            form = form.text(name, value);
        }

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .headers(self.auth_headers())
            .send()
            .context("Failed to send upload request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Upload failed: {} - {}", status, txt);
        }
        let uploaded: FileTransferResult = res.json().context("Parsing upload response json")?;
        Ok(uploaded)
    }

    fn get_file(
        &self,
        source_path: &str,
        revision: Option<&str>,
        sink: &mut dyn Write,
    ) -> Result<FileTransferResult> {
        let url = format!("{}/files/download", &self.base_url);
        let mut query: Vec<(&str, String)> = vec![("path", source_path.to_string())];
        if let Some(rev) = revision {
            query.push(("rev", rev.to_string()));
        }

        let mut res = self
            .client
            .get(&url)
            .query(&query)
            .headers(self.auth_headers())
            .send()
            .context("Failed to send download request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Download failed: {} - {}", status, txt);
        }

        // Read the metadata header before touching the body so a malformed
        // response never leaves bytes in the caller's sink.
        let meta_json = res
            .headers()
            .get(TRANSFER_METADATA_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let Some(meta_json) = meta_json else {
            bail!("Download response is missing transfer metadata");
        };
        let meta: FileTransferResult =
            serde_json::from_str(&meta_json).context("Parsing transfer metadata header")?;

        res.copy_to(sink).context("Streaming download body")?;
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            app_key: "key".into(),
            app_secret: "secret".into(),
            app_name: "demo".into(),
            locale: "en_US".into(),
            access_token: None,
        }
    }

    #[test]
    fn session_requires_a_non_empty_token() {
        let config = test_config();
        assert!(HttpStorageClient::new(&config, "").is_err());
        assert!(HttpStorageClient::new(&config, "   ").is_err());
        assert!(HttpStorageClient::new(&config, "tok").is_ok());
    }

    #[test]
    fn write_mode_form_fields() {
        assert_eq!(WriteMode::Add.form_fields(), vec![("mode", "add".to_string())]);
        assert_eq!(
            WriteMode::Overwrite.form_fields(),
            vec![("mode", "overwrite".to_string())]
        );
        assert_eq!(
            WriteMode::Update { revision: "abc123".into() }.form_fields(),
            vec![
                ("mode", "update".to_string()),
                ("parent_rev", "abc123".to_string())
            ]
        );
    }

    #[test]
    fn entry_description_skips_absent_fields() {
        let folder = EntryMetadata {
            name: "Photos".into(),
            kind: "folder".into(),
            size: None,
            revision: None,
        };
        assert_eq!(folder.describe(), "folder");

        let file = EntryMetadata {
            name: "walle.wav".into(),
            kind: "file".into(),
            size: Some(1024),
            revision: Some("3f2a".into()),
        };
        assert_eq!(file.describe(), "file, 1024 bytes, rev 3f2a");
    }
}
