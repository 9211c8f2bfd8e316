use nocache_serve::config::{Config, ServerConfig};
use nocache_serve::{logger, server, ServeError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load().map_err(ServeError::from)?;
    logger::init(&cfg).map_err(ServeError::Logger)?;

    // Port 80 on every interface, serving the directory we were started in
    let target = ServerConfig::from_cwd().map_err(ServeError::Root)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.performance.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(ServeError::Runtime)?;

    runtime.block_on(server::serve(&target, &cfg))?;
    Ok(())
}
