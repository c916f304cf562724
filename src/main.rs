use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itinerary_devserver::config::{Args, Config};
use itinerary_devserver::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itinerary_devserver=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(Args::parse());
    let addr = config.bind_address();
    let served = std::path::absolute(&config.root)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Print the link to the server
    println!("  Itinerary dev server at http://127.0.0.1:{}", config.port);
    println!("  Serving:  {}", served.display());
    println!("  POST /api/save-itinerary    write an itinerary");
    println!("  POST /api/delete-itinerary  remove an itinerary");
    println!("  Ctrl+C to stop");

    tracing::info!(address = %addr, root = %served.display(), "listening");

    let app = server::app(config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
