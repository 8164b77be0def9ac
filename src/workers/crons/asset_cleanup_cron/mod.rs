pub mod tasks;

use crate::common::init;
use crate::cron_tasks;
use crate::settings::AppSettings;
use tasks::cleanup_orphaned_logos::cleanup_orphaned_logos;

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let ctx = init::initialize_state(settings).await?;
    let failed_tasks = cron_tasks! {
        &ctx,
        cleanup_orphaned_logos,
    };
    if failed_tasks > 0 {
        anyhow::bail!("{failed_tasks} cron task(s) failed");
    }
    Ok(())
}
