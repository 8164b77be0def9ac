/// Runs each task in order against `$ctx`, logging its outcome, and
/// evaluates to the number of tasks that failed.
#[macro_export]
macro_rules! cron_tasks {
    ($ctx:expr, $($t:path),* $(,)?) => {{
        let mut failed_tasks = 0usize;
        $({
            const TASK_NAME: &str = const_str::convert_ascii_case!(upper_camel, stringify!($t));
            let now = std::time::Instant::now();
            tracing::info!("Starting Task {TASK_NAME}");
            match ($t)($ctx).await {
                Ok(v) => tracing::info!("Completed Task {TASK_NAME} in {:?} with result {v:?}", now.elapsed()),
                Err(e) => {
                    failed_tasks += 1;
                    tracing::error!("Error occurred in {TASK_NAME}: {e:?}");
                }
            }
        })*
        failed_tasks
    }};
}
