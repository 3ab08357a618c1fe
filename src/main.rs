use dotenv::dotenv;
use filmhub_backend::configuration::get_configuration;
use filmhub_backend::startup::{run_server, Backends};
use filmhub_backend::store::S3ObjectStore;
use filmhub_backend::telemetry::{get_subscriber, init_subscriber};
use filmhub_backend::util::check_for_necessary_env;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    check_for_necessary_env()?;
    let subscriber = get_subscriber("filmhub_backend", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration("configuration").expect(
        "Failed to read `configuration.json`. Please make sure it exists and is valid JSON.",
    );
    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address.as_str()).expect("Failed to bind");

    let connection_pool = PgPool::connect(configuration.database.connection_string().as_str())
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    let objects = Arc::new(S3ObjectStore::from_settings(&configuration.storage).await);
    let backends = Backends::postgres(connection_pool, objects, &configuration);

    tracing::info!("Listening on {}", address);
    run_server(listener, backends, configuration)?.await
}
