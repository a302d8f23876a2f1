use novade_notifyd::{start_daemon, Availability};
use novade_notifyd_core::config::ConfigLoader;
use novade_notifyd_core::logging::{init_logging, init_minimal_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            init_minimal_logging();
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    init_logging(&config.logging, false)?;
    tracing::info!("NovaDE notification daemon starting up...");

    let (manager, availability) = start_daemon(&config).await?;
    if availability == Availability::Unavailable {
        tracing::warn!("Another notification server is running, exiting");
        return Ok(());
    }

    let mut availability = manager.subscribe_availability();
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down notification daemon");
        }
        _ = availability.wait_for(|a| *a == Some(Availability::Unavailable)) => {
            tracing::warn!("Replaced by another notification server, exiting");
        }
    }
    Ok(())
}
