use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RUST_LOG 未設定時的過濾規則；verbose 會打開本 crate 的 debug（含快取命中與陰曆轉換）
fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("saju_calc=debug,info")
        } else {
            EnvFilter::new("saju_calc=info")
        }
    })
}

/// 單次命盤用。日誌寫到 stderr，stdout 只留命盤本身（--json 時可以直接接 jq）
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .without_time()
                .compact(),
        )
        .init();
}

/// 批次用。每筆跳過的資料列都是一行 JSON，事件欄位攤平在最上層
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .flatten_event(true),
        )
        .init();
}
