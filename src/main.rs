//! FlipCache benchmark
//!
//! Compares raw Redis round-trips against the hybrid cache for the same keys.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flipcache::{Config, FlipCacheBuilder, RedisStore, RemoteStore, ValueKind};

/// Full read passes over the key range per benchmark round
const READ_PASSES: usize = 10;

fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flipcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: redis_url={}, name={}, local_max={}, expire_time={:?}, keys={}, rounds={}",
        config.redis_url,
        config.cache_name,
        config.local_max,
        config.expire_time,
        config.bench_keys,
        config.bench_rounds
    );

    let mut raw = RedisStore::connect(&config.redis_url)
        .with_context(|| format!("failed to connect to {}", config.redis_url))?;
    let mut cache = FlipCacheBuilder::<usize, usize>::from_config(&config)
        .value_type(ValueKind::Int)
        .connect(&config.redis_url)
        .context("failed to build cache")?;

    let keys = config.bench_keys;
    let rounds = config.bench_rounds;
    let name = config.cache_name.clone();

    benchmark("redis_set", rounds, || {
        for i in 0..keys {
            raw.set(&format!("{}:{}", name, i), &(i * 2).to_string(), config.expire_time)?;
        }
        Ok(())
    })?;
    benchmark("flipcache_set", rounds, || {
        for i in 0..keys {
            cache.set(i, i * 2)?;
        }
        Ok(())
    })?;

    benchmark("redis_get", rounds, || {
        for _ in 0..READ_PASSES {
            for i in 0..keys {
                raw.get(&format!("{}:{}", name, i))?;
            }
        }
        Ok(())
    })?;
    benchmark("flipcache_get", rounds, || {
        for _ in 0..READ_PASSES {
            for i in 0..keys {
                cache.get(&i)?;
            }
        }
        Ok(())
    })?;

    let stats = cache.stats();
    info!(
        "Cache stats: local_hits={}, remote_hits={}, misses={}, evictions={}, hit_rate={:.3}",
        stats.local_hits,
        stats.remote_hits,
        stats.misses,
        stats.evictions,
        stats.hit_rate()
    );

    Ok(())
}

/// Runs `f` `rounds` times and logs the mean and standard deviation.
fn benchmark<F>(label: &str, rounds: usize, mut f: F) -> Result<()>
where
    F: FnMut() -> flipcache::Result<()>,
{
    let mut times = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let start = Instant::now();
        f().with_context(|| format!("benchmark {} failed", label))?;
        times.push(start.elapsed().as_secs_f64());
    }

    let mean = times.iter().sum::<f64>() / times.len() as f64;
    let std_dev = if times.len() > 1 {
        let variance = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>()
            / (times.len() - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    info!(
        "{}: mean {:.6}s, std dev {:.6}s over {} rounds",
        label, mean, std_dev, rounds
    );
    Ok(())
}
