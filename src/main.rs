use clap::Parser;
use tracing::info;
use voxgate::cli::{Cli, Commands, ConfigAction};
use voxgate::config::Config;
use voxgate::gateway::{self, Engine};
use voxgate::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(opts) => {
            info!("Starting voxgate gateway");
            let config = Config::load(opts.config.as_deref())?;
            gateway::serve(config, opts.port).await?;
        }
        Commands::Sync(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            let engine = Engine::from_config(&config);
            let agent = engine.reader.get_agent(&opts.agent_id).await?;
            let binding = engine.reconciler.reconcile(&agent).await?;
            info!(
                "Agent {} reconciled (remote id: {})",
                opts.agent_id,
                binding.remote_id.as_deref().unwrap_or("none")
            );
        }
        Commands::Config(opts) => {
            match opts.action {
                ConfigAction::Show => {
                    let config = Config::load(opts.config.as_deref())?;
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigAction::Validate => {
                    Config::load(opts.config.as_deref())?;
                    info!("Configuration is valid");
                }
                ConfigAction::Init => {
                    Config::write_default(opts.config.as_deref().unwrap_or("voxgate.json"))?;
                    info!("Configuration file created");
                }
            }
        }
        Commands::Version => {
            println!("voxgate {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
