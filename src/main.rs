use pricetracker::configuration::get_configuration;
use pricetracker::create_app;
use pricetracker::errors::Error;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

async fn run() -> Result<(), Error> {
    let configuration = get_configuration()?;
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )?;
    let (app, state) = create_app(&configuration)?;
    state.mount_in_background();

    let listener = TcpListener::bind(addr).await?;
    info!(
        "listening on {addr}, backend at {}",
        configuration.backend.base_url
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricetracker=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
