// The demo flow: one linear pass over the storage client. Each step prints
// its own status and keeps its failures local; only a missing session ends
// the run early, because nothing else can proceed without one.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::api::{DirectoryListing, FileTransferResult, HttpStorageClient, StorageClient, WriteMode};
use crate::auth;
use crate::config::{AppConfig, TransferPlan};

/// Run the whole demo: resolve credentials, open a session, then walk the
/// four steps. A run without a session ends here without touching the
/// provider.
pub fn run(config: &AppConfig, plan: &TransferPlan) -> Result<()> {
    let Some(token) = auth::resolve_access_token(config) else {
        eprintln!("No access token available: nothing to do.");
        return Ok(());
    };
    let client = match HttpStorageClient::new(config, &token) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Could not create storage session: {e:#}");
            return Ok(());
        }
    };

    run_steps(&client, plan);
    Ok(())
}

/// The four demo steps against an already-initialised session. Generic over
/// the client so tests can drive the flow with an in-memory double.
pub fn run_steps<C: StorageClient>(client: &C, plan: &TransferPlan) {
    print_account_details(client);
    print_directory(client, &plan.list_path, plan.detailed_listing);

    if let Some(uploaded) = upload(client, &plan.local_source, &plan.remote_path) {
        println!(
            "Uploaded: {} ({} bytes, rev {})",
            uploaded.path, uploaded.size, uploaded.revision
        );
    }
    if let Some(downloaded) = download(client, &plan.remote_path, &plan.local_dest) {
        println!(
            "Downloaded: {} ({} bytes, rev {})",
            downloaded.path, downloaded.size, downloaded.revision
        );
    }
}

/// Display the account name. Provider trouble here is not fatal to the run.
fn print_account_details<C: StorageClient>(client: &C) {
    match client.account_info() {
        Ok(info) => println!("Account: {}", info.display_name),
        Err(_) => eprintln!("Error printing account details: provider reported an error."),
    }
}

/// Display the contents of a directory, one line per entry.
fn print_directory<C: StorageClient>(client: &C, directory: &str, detailed: bool) {
    let listing = match client.metadata_with_children(directory) {
        Ok(listing) => listing,
        Err(_) => {
            eprintln!("Could not read directory: {directory}");
            return;
        }
    };
    for line in listing_lines(directory, &listing, detailed) {
        println!("{line}");
    }
}

/// The header line plus one line per entry. An empty directory is just the
/// header.
fn listing_lines(directory: &str, listing: &DirectoryListing, detailed: bool) -> Vec<String> {
    let mut lines = vec![format!("Directory: {directory}")];
    for child in &listing.children {
        if detailed {
            lines.push(format!("  {}: {}", child.name, child.describe()));
        } else {
            lines.push(format!("  {}", child.name));
        }
    }
    lines
}

/// Upload a local file. The source is opened before the provider is
/// contacted, so a local problem never turns into a remote call. The file
/// handle is owned by this scope and closes on every exit path.
pub fn upload<C: StorageClient>(
    client: &C,
    source: &Path,
    dest: &str,
) -> Option<FileTransferResult> {
    println!("Uploading {} to {}", source.display(), dest);

    let file = match File::open(source) {
        Ok(file) => file,
        Err(e) => {
            report_open_error("Upload", source, &e);
            return None;
        }
    };
    let length = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => {
            eprintln!("Upload error: could not read {}: {}", source.display(), e);
            return None;
        }
    };

    let spinner = transfer_spinner("Uploading...");
    let result = client.upload_file(dest, WriteMode::Add, length, Box::new(file));
    spinner.finish_and_clear();

    match result {
        Ok(uploaded) => {
            println!("Upload successful");
            Some(uploaded)
        }
        Err(e) => {
            eprintln!("Upload error: {e:#}");
            None
        }
    }
}

/// Download a remote file into a local destination. The destination is
/// opened first, so nothing is fetched when it cannot be written. The
/// writer is flushed whatever the download call returned; a flush failure
/// is only a warning.
pub fn download<C: StorageClient>(
    client: &C,
    source: &str,
    dest: &Path,
) -> Option<FileTransferResult> {
    println!("Downloading {} to {}", source, dest.display());

    let file = match File::create(dest) {
        Ok(file) => file,
        Err(e) => {
            report_open_error("Download", dest, &e);
            return None;
        }
    };
    let mut sink = BufWriter::new(file);

    let spinner = transfer_spinner("Downloading...");
    let result = client.get_file(source, None, &mut sink);
    spinner.finish_and_clear();

    if let Err(e) = sink.flush() {
        eprintln!("Warning: could not flush {}: {}", dest.display(), e);
    }

    match result {
        Ok(downloaded) => {
            println!("Download successful");
            Some(downloaded)
        }
        Err(e) => {
            eprintln!("Download error: {e:#}");
            None
        }
    }
}

/// One-line diagnostic for a failed local open, by failure kind.
fn report_open_error(step: &str, path: &Path, err: &io::Error) {
    match err.kind() {
        io::ErrorKind::NotFound => eprintln!("File not found: {}", path.display()),
        io::ErrorKind::PermissionDenied => eprintln!("Permission denied: {}", path.display()),
        _ => eprintln!("{step} error: {}: {}", path.display(), err),
    }
}

fn transfer_spinner(msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
