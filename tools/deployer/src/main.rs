use anyhow::Context;
use clap::Parser;
use fundme_deploy::config::{Cli, Command};
use fundme_deploy::deployments::DeploymentStore;
use fundme_deploy::network;
use fundme_deploy::pipeline::Deployer;
use fundme_deploy::scripts;
use fundme_deploy::state::{load_chain, save_chain};
use fundme_deploy::verify::NoVerifier;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let profile = network::resolve(&cli.network)?;
    tracing::info!(network = profile.name, kind = %profile.kind, "Resolved network");

    if let Command::Network = cli.command {
        println!("{}", serde_json::to_string_pretty(profile)?);
        return Ok(());
    }

    let mut chain = load_chain(&cli.state_dir, profile.name)
        .with_context(|| format!("loading chain state from {}", cli.state_dir.display()))?;
    let mut store = DeploymentStore::open(&cli.state_dir, profile.name);

    match cli.command {
        Command::Network => {}
        Command::Deploy { tags } => {
            let mut verifier = NoVerifier;
            let summary = Deployer::new(&mut chain, &mut store, profile, &mut verifier).run(tags)?;
            for record in summary.price_feed.iter().chain(summary.fund_me.iter()) {
                println!("{}: {}", record.name, record.address);
            }
        }
        Command::Fund { amount, account } => {
            let receipt = scripts::fund(&mut chain, &store, account, &amount)?;
            println!("Funded in block {}", receipt.block_number);
        }
        Command::Withdraw => {
            let receipt = scripts::withdraw(&mut chain, &store)?;
            println!("Withdrawn in block {}", receipt.block_number);
        }
        Command::Status => {
            let status = scripts::status(&chain, &store)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    let path = save_chain(&cli.state_dir, profile.name, &chain).context("saving chain state")?;
    tracing::debug!(path = %path.display(), "Saved chain state");

    Ok(())
}
