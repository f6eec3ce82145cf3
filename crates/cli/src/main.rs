mod config;
mod logging;
mod notify;
mod run;
mod source;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use interpel_storage::JsonFileStore;
use tracing::info;

use crate::config::load_config;
use crate::notify::{Notifier, StdoutNotifier, WebhookNotifier};
use crate::run::Pipeline;
use crate::source::SejmClient;

/// Sejm inquiry reply watcher.
#[derive(Parser)]
#[command(
    name = "interpel",
    version,
    about = "Report new replies to tracked Sejm interpellations and written questions"
)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, env = "INTERPEL_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Directory holding one snapshot file per representative
    #[arg(long, env = "INTERPEL_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Print messages to stdout instead of posting them
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    info!(
        config = %cli.config.display(),
        term = %config.term,
        persons = config.persons.len(),
        "loaded config"
    );

    let client = SejmClient::new(&config.api_base_url, &config.term);
    let store = JsonFileStore::new(cli.data_dir.clone());

    let webhook = if cli.dry_run {
        None
    } else {
        config
            .webhook_url()
            .map(|url| WebhookNotifier::new(&url, &config.bot_username, &config.bot_icon))
    };
    let notifier: Option<&dyn Notifier> = if cli.dry_run {
        Some(&StdoutNotifier as &dyn Notifier)
    } else {
        webhook.as_ref().map(|w| w as &dyn Notifier)
    };

    Pipeline {
        persons: &config.persons,
        source: &client,
        directory: &client,
        store: &store,
        notifier,
        persist: !cli.dry_run,
    }
    .run();
}
