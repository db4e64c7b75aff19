mod errors;
mod home;
mod host;
mod settings;
mod sites;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::host::HostResolver;
use crate::settings::Settings;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::new().context("Could not load settings")?;
    let db = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await
        .context("Could not connect to database")?;
    sqlx::migrate!()
        .run(&db)
        .await
        .context("Could not run migrations")?;

    let resolver = HostResolver::from_settings(&settings.site);
    info!(
        "serving {} on {}:{}",
        settings.site.domain, settings.http.bind_addr, settings.http.port
    );

    let db = web::Data::new(db);
    let resolver = web::Data::new(resolver);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(resolver.clone())
            .configure(home::controller::urls::<PgPool>)
    })
    .bind((settings.http.bind_addr.as_str(), settings.http.port))?
    .run()
    .await
    .context("HTTP server failed")
}
