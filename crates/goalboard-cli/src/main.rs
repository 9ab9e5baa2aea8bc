//! `goalboard` binary

use anyhow::Context;
use goalboard_cli::{command, needs_store, run_local, run_remote, GoalboardConfig};
use goalboard_store::{GoalClient, HttpTransport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config = GoalboardConfig::resolve(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        matches.get_one::<String>("endpoint").map(String::as_str),
    )?;

    let Some((name, args)) = matches.subcommand() else {
        return Ok(());
    };
    let mut stdout = std::io::stdout().lock();

    if needs_store(name) {
        let endpoint = config.endpoint()?;
        let transport = HttpTransport::new(endpoint)
            .with_context(|| format!("cannot use endpoint {endpoint}"))?;
        run_remote(name, args, GoalClient::new(transport), &mut stdout).await
    } else {
        run_local(name, args, config.visitor_file, &mut stdout)
    }
}
