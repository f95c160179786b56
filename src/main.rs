use course_sales::{
    config::{database, seed, settings},
    errors::Result,
    service::{self, CommercialService},
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration, falling back to defaults
    let app_config = settings::load_default_config().unwrap_or_else(|e| {
        warn!("{e}; continuing with default settings");
        settings::AppConfig::default()
    });

    // 4. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed sellers, goals and the default commission rule
    seed::seed_from_config(&db, &app_config)
        .await
        .inspect_err(|e| error!("Failed to seed from configuration: {}", e))?;

    // 6. Summarize and export
    let service = CommercialService::new(db);
    let kpis = service.kpis().await?;
    info!(
        revenue = kpis.revenue,
        registrations = kpis.registrations,
        conversion_rate = kpis.conversion_rate,
        average_cycle_days = kpis.average_cycle_days,
        pipeline = kpis.pipeline,
        "Sales summary"
    );

    let today = service::today();
    for course in service.viability_alerts(today).await? {
        warn!(
            "Course '{}' starts on {} with too few registrations",
            course.topic, course.starts_on
        );
    }

    let written = service
        .export_reports(&app_config.export_dir, today)
        .await?;
    info!("Wrote {} report files", written.len());

    Ok(())
}
