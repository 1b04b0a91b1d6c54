use clap::Parser;
use gearledger::config::{Config, StartArgs};
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let StartArgs {
        config_path,
        address: host,
        port,
        log_level: level,
    } = StartArgs::parse();

    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::read_or_default(config_path).expect("invalid config file");

    let router = gearledger::app(&config)
        .await
        .expect("unable to open inventory storage");

    let addr = format!("{host}:{port}");

    info!("Now listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("error while starting TCP listener");

    axum::serve(listener, router)
        .await
        .expect("error while starting server");
}
