//! Account-level commands.

use nuvem_core::ApiResult;
use nuvem_entity::quota::format_bytes;

use crate::app::App;
use crate::output;

pub async fn usage(app: &App) -> ApiResult<()> {
    let usage = app.usage.usage().await;
    let percent = if usage.quota_bytes > 0 {
        (usage.used_bytes as f64 / usage.quota_bytes as f64) * 100.0
    } else {
        0.0
    };

    println!("Storage usage for {}", app.session.profile.email);
    output::print_kv("Used", &format_bytes(usage.used_bytes));
    output::print_kv("Quota", &format_bytes(usage.quota_bytes));
    output::print_kv("Remaining", &format_bytes(usage.remaining()));
    output::print_kv("Usage", &format!("{percent:.1}%"));
    Ok(())
}
