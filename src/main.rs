use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use depot::api;
use depot::bot::telegram::TelegramGateway;
use depot::bot::Dispatcher;
use depot::config::Config;
use depot::store::blobs::BlobStore;
use depot::store::Store;

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Telegram file depot bot with owner/admin/user access tiers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port for the webhook endpoint
        #[arg(short, long, default_value = "5000")]
        port: u16,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "depot=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let port = match cli.command {
        Some(Commands::Serve { port }) => port,
        None => 5000,
    };

    let config = Config::from_env()?;

    let data_dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => depot::store::default_data_dir()?,
    };
    let store = Store::open(data_dir.join("depot.db"))?;
    store.migrate()?;
    let blobs = BlobStore::open(data_dir.join("blobs"))?;

    let gateway = TelegramGateway::new(config.bot_token.clone());
    if let Some(base) = &config.public_url {
        let url = format!("{}/webhook/{}", base.trim_end_matches('/'), config.bot_token);
        gateway.delete_webhook().await?;
        gateway.set_webhook(&url).await?;
        tracing::info!("Webhook registered under {base}");
    }

    let token = config.bot_token.clone();
    let dispatcher = Arc::new(Dispatcher::new(&config, store, blobs, gateway));
    let app = api::create_router(dispatcher, token);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("depot listening on http://0.0.0.0:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
