use clap::Parser;
use migration::{Migrator, MigratorTrait};
use poem::{
    endpoint::StaticFilesEndpoint, listener::TcpListener, middleware::Cors, EndpointExt, Route,
    Server,
};
use poem_openapi::OpenApiService;
use sea_orm::Database;

use stockroom_backend::api::{AuthApi, HealthApi, ItemsApi, UsersApi};
use stockroom_backend::cli::{self, Cli, Commands};
use stockroom_backend::config::{init_logging, Settings};
use stockroom_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Parse arguments before touching the database so `--help` stays fast
    let cli = Cli::parse();

    init_logging()?;

    let settings = Settings::from_env()?;

    tracing::info!(database_url = %settings.database_url, "Connecting to database");
    let db = Database::connect(&settings.database_url).await?;

    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations completed");

    let app_data = AppData::init(db, &settings).await?;

    match cli.command {
        None | Some(Commands::Serve) => serve(app_data, settings).await?,
        Some(command) => cli::execute_command(command, &app_data).await?,
    }

    Ok(())
}

async fn serve(app_data: AppData, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let auth_api = AuthApi::new(
        app_data.user_store.clone(),
        app_data.token_service.clone(),
        app_data.gate.clone(),
        app_data.registry.clone(),
    );
    let users_api = UsersApi::new(app_data.user_store.clone(), app_data.gate.clone());
    let items_api = ItemsApi::new(app_data.item_store.clone(), app_data.gate.clone());

    // Compose the OpenAPI service from all endpoint groups
    let api_service = OpenApiService::new(
        (HealthApi, auth_api, users_api, items_api),
        "Stockroom API",
        "1.0.0",
    )
    .server(format!("http://{}/api", settings.listen_addr));

    let ui = api_service.swagger_ui();

    // Nest API under /api and Swagger UI under /swagger
    let mut app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    // Optionally serve a frontend bundle from the root
    if let Some(static_dir) = settings.static_dir.clone() {
        tracing::info!(dir = %static_dir, "Serving static files");
        app = app.nest(
            "/",
            StaticFilesEndpoint::new(static_dir).index_file("index.html"),
        );
    }

    tracing::info!("Starting server on http://{}", settings.listen_addr);
    tracing::info!("Swagger UI available at http://{}/swagger", settings.listen_addr);

    Server::new(TcpListener::bind(settings.listen_addr.clone()))
        .run(app.with(Cors::new().allow_credentials(true)))
        .await?;

    Ok(())
}
