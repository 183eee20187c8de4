use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use uuid::Uuid;
use seatwise_api::{app, AppState};
use seatwise_shared::{PassengerDetails, UnassignedPassenger};
use seatwise_store::app_config::{Config, SeedConfig};
use seatwise_store::{seed_coach, InMemorySeatStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatwise_api=debug,seatwise_assign=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Seatwise API on port {}", config.server.port);

    let store = Arc::new(InMemorySeatStore::new());
    if let Some(seed) = &config.seed {
        seed_store(&store, seed).await?;
    }

    let app = app(AppState::new(store, &config.engine));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn seed_store(store: &InMemorySeatStore, seed: &SeedConfig) -> anyhow::Result<()> {
    let (seat_map, _) = seed_coach(store, &seed.name, seed.rows, seed.columns, seed.vehicle_class)
        .await
        .context("Failed to seed seat map")?;

    let transport_id = seed.transport_id.unwrap_or_else(Uuid::new_v4);
    for (index, name) in seed.passengers.iter().enumerate() {
        let passenger = UnassignedPassenger::new(format!("seed-{}", index + 1), PassengerDetails::new(name.as_str()));
        store.add_passenger(transport_id, passenger).await;
    }

    tracing::info!(
        "Seat map {} ready, transport {} has {} waiting passengers",
        seat_map.id,
        transport_id,
        seed.passengers.len()
    );
    Ok(())
}
