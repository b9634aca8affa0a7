//! datacache CLI
//!
//! Runs the memoized dataset server and the tooling around it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use datacache_api::{ApiConfig, ApiServer};
use datacache_cache::MemoryStore;
use datacache_core::constants::{CACHE_STATUS_HEADER, DEFAULT_CACHE_KEY, DEFAULT_TTL_SECONDS};
use datacache_core::types::Envelope;
use datacache_generator::{generate_envelope, GeneratorConfig, MemoizedGenerator};

/// datacache - memoized dataset endpoint
#[derive(Parser)]
#[command(name = "datacache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000", env = "PORT")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Exercise a running server and check that responses are cached
    Probe {
        /// Dataset endpoint URL
        #[arg(short, long, default_value = "http://localhost:8000/api/data/")]
        url: String,
        /// Total number of requests to send (at least 2)
        #[arg(short = 'n', long, default_value = "7")]
        requests: usize,
        /// Pause between the first and second request, in milliseconds
        #[arg(short, long, default_value = "2000")]
        delay_ms: u64,
    },

    /// Generate one envelope and print or save it
    Generate {
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare raw generation against memoized hits
    Bench {
        /// Number of iterations per measurement
        #[arg(short, long, default_value = "200")]
        iterations: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Probe {
            url,
            requests,
            delay_ms,
        } => cmd_probe(&url, requests, Duration::from_millis(delay_ms)).await,
        Commands::Generate { output } => cmd_generate(output),
        Commands::Bench { iterations } => cmd_bench(iterations).await,
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "datacache=debug,tower_http=debug,info"
    } else {
        "datacache=info,tower_http=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let config = ApiConfig::from_env().context("Invalid configuration")?;

    println!("{}", "🚀 Starting datacache API server...".cyan().bold());
    println!("   {} http://{}:{}/api/data/", "Dataset:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!(
        "   {} {:?}, key '{}', TTL {}s, on failure: {}",
        "Cache:".dimmed(),
        config.backend,
        config.cache_key,
        config.ttl_seconds,
        config.on_store_failure
    );
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to initialize cache backend")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;
    server.run(addr).await?;

    Ok(())
}

/// One probe response.
struct Sample {
    envelope: Envelope,
    cache_status: String,
    elapsed: Duration,
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<Sample> {
    let start = Instant::now();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Could not connect to server at {}", url))?;
    let elapsed = start.elapsed();

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("HTTP {}: {}", status, body);
    }

    let cache_status = response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let envelope: Envelope = response.json().await.context("Malformed envelope")?;

    Ok(Sample {
        envelope,
        cache_status,
        elapsed,
    })
}

/// Probe a running server
async fn cmd_probe(url: &str, requests: usize, delay: Duration) -> Result<()> {
    if requests < 2 {
        bail!("--requests must be at least 2");
    }

    let client = reqwest::Client::new();

    println!("{} {}", "🔍 Probing:".cyan().bold(), url);

    println!("\n{}", "[1] First request".yellow().bold());
    let first = fetch(&client, url).await?;
    println!("   ✓ {} items in {:.3}s", first.envelope.total_count, first.elapsed.as_secs_f64());
    println!("   {} {}", "Generated at:".dimmed(), first.envelope.generated_at);
    println!("   {} {}", "x-cache:".dimmed(), first.cache_status);
    println!(
        "   {} cached={} key={} ttl={}s",
        "Cache info:".dimmed(),
        first.envelope.cache_info.cached,
        first.envelope.cache_info.cache_key,
        first.envelope.cache_info.ttl_seconds
    );

    tokio::time::sleep(delay).await;

    println!("\n{}", "[2] Second request".yellow().bold());
    let second = fetch(&client, url).await?;
    println!("   ✓ {} items in {:.3}s", second.envelope.total_count, second.elapsed.as_secs_f64());
    println!("   {} {}", "Generated at:".dimmed(), second.envelope.generated_at);
    println!("   {} {}", "x-cache:".dimmed(), second.cache_status);

    let cached = first.envelope.generated_at == second.envelope.generated_at;
    if cached {
        println!("   {} Data is cached (same generation timestamp)", "✅".green());
    } else {
        println!("   {} Data is not cached (different generation timestamp)", "❌".red());
    }

    let rapid = requests - 2;
    let mut timings = Vec::with_capacity(rapid);
    if rapid > 0 {
        println!("\n{} {} rapid requests", "[3]".yellow().bold(), rapid);
        for i in 0..rapid {
            let sample = fetch(&client, url).await?;
            println!(
                "   Request {}: {:.3}s - {} items, {} (generated at {})",
                i + 3,
                sample.elapsed.as_secs_f64(),
                sample.envelope.total_count,
                sample.cache_status,
                sample.envelope.generated_at
            );
            timings.push(sample.elapsed);
        }

        let avg = timings.iter().sum::<Duration>() / timings.len() as u32;
        println!("\n{} {:.3}s", "📈 Average response time:".green(), avg.as_secs_f64());
    }

    if !cached {
        bail!("second response was regenerated; caching is not in effect");
    }

    Ok(())
}

/// Generate one envelope
fn cmd_generate(output: Option<PathBuf>) -> Result<()> {
    let envelope = generate_envelope(chrono::Utc::now(), DEFAULT_CACHE_KEY, DEFAULT_TTL_SECONDS);
    let json = serde_json::to_string_pretty(&envelope)?;

    if let Some(path) = output {
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} {} records to {}",
            "✅ Wrote".green(),
            envelope.total_count,
            path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Run benchmarks
async fn cmd_bench(iterations: u32) -> Result<()> {
    let iterations = iterations.max(1);
    println!("{} {} iterations", "📊 Benchmarking with".cyan().bold(), iterations);

    println!("\n{}", "1. Raw generation...".dimmed());
    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(generate_envelope(
            chrono::Utc::now(),
            DEFAULT_CACHE_KEY,
            DEFAULT_TTL_SECONDS,
        ));
    }
    let generate_time = start.elapsed();
    println!("   ✓ {:?} total, {:?} per envelope", generate_time, generate_time / iterations);

    println!("\n{}", "2. Memoized fetches...".dimmed());
    let generator = MemoizedGenerator::new(Arc::new(MemoryStore::new()), GeneratorConfig::default());
    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(generator.fetch_or_generate().await?);
    }
    let memo_time = start.elapsed();
    println!("   ✓ {:?} total, {:?} per fetch", memo_time, memo_time / iterations);

    println!("\n{}", "📈 Results:".green().bold());
    println!("   Regenerations during memoized run: {}", generator.generations());
    let speedup = generate_time.as_secs_f64() / memo_time.as_secs_f64().max(f64::EPSILON);
    println!("   Speedup from caching: {:.1}x", speedup);

    if generator.generations() == 1 {
        println!("   {} Only the first fetch regenerated", "✅".green());
    } else {
        println!(
            "   {} Expected 1 regeneration, saw {}",
            "❌".red(),
            generator.generations()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_serve_defaults() {
        let cli = Cli::try_parse_from(["datacache", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, bind } => {
                assert_eq!(port, 8000);
                assert_eq!(bind, "0.0.0.0");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_cli_parses_probe() {
        let cli = Cli::try_parse_from([
            "datacache",
            "probe",
            "--url",
            "http://127.0.0.1:9000/api/data/",
            "-n",
            "3",
            "--delay-ms",
            "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Probe {
                url,
                requests,
                delay_ms,
            } => {
                assert_eq!(url, "http://127.0.0.1:9000/api/data/");
                assert_eq!(requests, 3);
                assert_eq!(delay_ms, 0);
            }
            _ => panic!("expected probe"),
        }
    }

    #[tokio::test]
    async fn test_probe_rejects_single_request() {
        let err = cmd_probe("http://127.0.0.1:1/api/data/", 1, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[tokio::test]
    async fn test_probe_against_live_server() {
        let server = ApiServer::new(ApiConfig::default()).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server.serve(listener));

        let url = format!("http://{}/api/data/", addr);
        cmd_probe(&url, 3, Duration::ZERO).await.unwrap();
    }
}
