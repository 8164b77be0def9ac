pub mod asset_cleanup_cron;
pub mod tasks;
