use actix_web::{App, HttpServer, middleware, web};
use config::{Config, Environment, File};
use pushkind_salon::db::{establish_connection_pool, migrations};
use pushkind_salon::models::config::ServerConfig;
use pushkind_salon::repository::DieselRepository;
use pushkind_salon::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        log::error!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = load_config()?;

    let pool = establish_connection_pool(&server_config.database_url)
        .map_err(|err| format!("Failed to open database: {err:?}"))?;
    if server_config.run_migrations {
        let applied = migrations::run_pending(&pool)?;
        log::info!("Applied {applied} pending migrations");
    }

    let repo = DieselRepository::new(pool);
    let address = (server_config.address.clone(), server_config.port);
    log::info!("Starting salon service on {}:{}", address.0, address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
