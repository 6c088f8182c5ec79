use docserve::config::Config;
use docserve::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    tracing::info!(
        root = %cfg.document_root.display(),
        scripts = ?cfg.scripts.allow_list,
        "Loaded configuration"
    );

    let server = Server::bind(&cfg).await?;

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
