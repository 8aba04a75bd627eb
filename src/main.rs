use anyhow::Context;
use eframe::egui;

use orderscope::app::OrderScopeApp;
use orderscope::config::DashboardConfig;
use orderscope::data::loader;

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load().context("loading configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    log::debug!("Configuration: {config:?}");

    // No partial start: a dataset that fails to load aborts the process.
    let dataset = loader::load_file(&config.data_path)
        .with_context(|| format!("loading dataset from {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OrderScope – Order Data Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(OrderScopeApp::new(&config, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
