/// Runs `$block` and logs how long it took at debug level.
#[macro_export]
macro_rules! timer_debug {
    ($msg:literal, $block:expr) => {{
        let started_at = jiff::Timestamp::now();
        let result = $block;
        tracing::debug!(elapsed = %jiff::Timestamp::now().duration_since(started_at), $msg);
        result
    }};
}
