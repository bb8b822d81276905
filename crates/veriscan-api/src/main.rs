use veriscan_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    veriscan_api::telemetry::init_tracing();

    let config = Config::from_env()?;

    let (_state, router) = veriscan_api::setup::initialize_app(config.clone()).await?;

    veriscan_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
