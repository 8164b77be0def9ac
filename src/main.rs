use branding_service::api;
use branding_service::common::init;
use branding_service::settings::AppSettings;
use branding_service::workers::crons;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        "asset-cleanup-cron" => crons::asset_cleanup_cron::serve(settings).await,
        component => anyhow::bail!("Unknown app component: {component}"),
    }
}
