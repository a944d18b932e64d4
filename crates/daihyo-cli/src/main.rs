use clap::{Parser, Subcommand};

use daihyo_core::ShopQuery;
use daihyo_pipeline::Resolver;

#[derive(Debug, Parser)]
#[command(name = "daihyo-cli")]
#[command(about = "Resolve the operator identity behind a shop listing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one resolution and print the terminal record as JSON.
    Resolve {
        /// Shop name as listed.
        #[arg(long)]
        name: String,
        /// Shop address as listed.
        #[arg(long)]
        address: String,
        /// Oracle API key.
        #[arg(long, env = "DAIHYO_ORACLE_API_KEY")]
        key: String,
        /// Oracle model override.
        #[arg(long)]
        model: Option<String>,
        /// Pretty-print the record.
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve {
            name,
            address,
            key,
            model,
            pretty,
        } => {
            let config = daihyo_core::load_app_config_from_env()?;
            let query = ShopQuery::new(&name, &address)?;
            let resolver = Resolver::from_app_config(&config, &key, model.as_deref())?;
            let result = resolver.resolve(&query).await;

            let rendered = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{rendered}");
        }
    }

    Ok(())
}
