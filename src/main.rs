use leaky_buffer::config::Config;
use leaky_buffer::pool::LeakyBufferPool;
use leaky_buffer::soak;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration
    let config = Config::parse_args();

    // Initialize tracing
    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("leaky-buffer v{}", env!("CARGO_PKG_VERSION"));

    let pool_config = config.pool_config();
    info!(
        "Configuration: {} slots, {} byte buffers",
        pool_config.slots, pool_config.alloc_size
    );

    let pool = LeakyBufferPool::from_config(&pool_config);
    let report = soak::run(&pool, &config.soak_config())?;

    let stats = report.stats;
    info!(
        "Completed {} cycles in {:?} ({:.0} cycles/s)",
        report.cycles,
        report.elapsed,
        report.throughput()
    );
    info!(
        "Pool: resident={} peak={} hits={} misses={} returns={} replaced={} drops={} hit_rate={:.2}%",
        stats.resident,
        report.peak_resident,
        stats.hits,
        stats.misses,
        stats.returns,
        stats.replaced,
        stats.drops,
        stats.hit_rate() * 100.0
    );

    Ok(())
}
