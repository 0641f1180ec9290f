// Entrypoint for the demo CLI.
// - Keeps `main` small: assemble the literal configuration and hand it to
//   the demo flow. Fill in the four credential values from the provider's
//   app console before running.

use std::path::PathBuf;

use cumulus_cli::config::{AppConfig, TransferPlan};
use cumulus_cli::demo;

const APP_KEY: &str = "YOUR_KEY_HERE";
const APP_SECRET: &str = "YOUR_SECRET_HERE";
const APP_NAME: &str = "YOUR_APPLICATION_NAME_HERE";
const ACCESS_TOKEN: &str = "YOUR_PERSISTENT_ACCESS_TOKEN_HERE";

fn main() -> anyhow::Result<()> {
    let config = AppConfig {
        app_key: APP_KEY.into(),
        app_secret: APP_SECRET.into(),
        app_name: APP_NAME.into(),
        locale: "en_US".into(),
        access_token: Some(ACCESS_TOKEN.into()),
    };

    // The one file the demo round-trips, plus the directory it lists.
    let plan = TransferPlan {
        list_path: "/".into(),
        detailed_listing: true,
        local_source: PathBuf::from("/home/sam/walle.wav"),
        remote_path: "/walle.wav".into(),
        local_dest: PathBuf::from("/home/sam/walle2.wav"),
    };

    demo::run(&config, &plan)
}
