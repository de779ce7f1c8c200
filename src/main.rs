use grabtest::config::Config;
use grabtest::handler::ServeState;
use grabtest::{logger, SyntheticHandler, TestServer};

/// Config file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Create Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))?;
    Ok(())
}

async fn async_main(cfg: Config) -> grabtest::Result<()> {
    let addr = cfg.socket_addr()?;
    let handler = SyntheticHandler::from_options(cfg.behavior.to_options()?)?;
    let state = ServeState::from_config(handler, &cfg);

    let server = TestServer::bind(addr, state, cfg.performance.keep_alive)?;
    logger::log_server_start(server.addr(), &cfg);

    tokio::signal::ctrl_c().await?;
    logger::log_shutdown();
    server.shutdown().await;
    Ok(())
}
