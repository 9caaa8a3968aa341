use maplerank::server::{
    config::Config, error::Error, router, scheduler::Scheduler, startup,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = startup::build_app_state(&config)?;

    if let Some(cron) = config.refresh_cron.as_deref() {
        Scheduler::new(app_state.clone()).await?.start(cron).await?;
    }

    let app = router::routes().with_state(app_state);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
