//! Proxima CLI - demo and benchmark harness for the k-NN engine
//!
//! Everything here drives the core through its public operations only.

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use proxima_core::{Vector, VectorStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "proxima")]
#[command(about = "In-memory brute-force k-NN engine demo", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a store with random vectors and run a sample query
    Demo {
        /// Number of vectors to insert
        #[arg(short = 'n', long, default_value = "10000")]
        vectors: usize,

        /// Vector dimension
        #[arg(short = 'D', long, default_value = "128")]
        dimension: usize,

        /// Number of neighbors to return
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Measure insert throughput and query latency percentiles
    Bench {
        /// Number of vectors to insert
        #[arg(short = 'n', long, default_value = "100000")]
        vectors: usize,

        /// Vector dimension
        #[arg(short = 'D', long, default_value = "128")]
        dimension: usize,

        /// Number of queries to run
        #[arg(short = 'q', long, default_value = "1000")]
        queries: usize,

        /// Number of neighbors per query
        #[arg(short = 'k', long, default_value = "10")]
        top_k: usize,

        /// RNG seed for reproducible workloads
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo {
            vectors,
            dimension,
            top_k,
        } => run_demo(vectors, dimension, top_k),
        Commands::Bench {
            vectors,
            dimension,
            queries,
            top_k,
            seed,
        } => run_bench(vectors, dimension, queries, top_k, seed),
    }
}

fn random_vector(dim: usize, rng: &mut StdRng) -> Vec<f32> {
    (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

fn populate(store: &VectorStore, count: usize, rng: &mut StdRng) -> Result<Duration> {
    let start = Instant::now();
    for i in 0..count {
        store.insert(Vector::new(
            format!("vec-{i}"),
            random_vector(store.dimension(), rng),
        ))?;
    }
    Ok(start.elapsed())
}

fn run_demo(vectors: usize, dimension: usize, top_k: usize) -> Result<()> {
    println!("{}", "Proxima - Vector Similarity Search Engine".bold());
    println!("{}", "=========================================".bold());
    println!("Initializing store with dimension {dimension}");

    let store = VectorStore::new(dimension);
    let mut rng = StdRng::seed_from_u64(rand::random());

    println!("Inserting {vectors} vectors...");
    let insert_time = populate(&store, vectors, &mut rng)?;
    println!(
        "Inserted {} vectors in {:?}",
        store.count().to_string().green(),
        insert_time
    );

    let query = random_vector(dimension, &mut rng);
    println!("\nSearching for {top_k} nearest neighbors...");
    let start = Instant::now();
    let results = store.search(&query, top_k)?;
    println!("Search completed in {:?}\n", start.elapsed());

    println!("{}", "Top results:".bold());
    for (rank, result) in results.iter().enumerate() {
        println!(
            "  {}. {} (distance: {:.4})",
            rank + 1,
            result.id.cyan(),
            result.distance
        );
    }

    println!("\nRun '{}' for the full benchmark", "proxima bench".yellow());
    Ok(())
}

fn run_bench(vectors: usize, dimension: usize, queries: usize, top_k: usize, seed: u64) -> Result<()> {
    println!("{}", "=== Proxima Benchmark ===".bold());
    println!("vectors: {vectors}, dimension: {dimension}, queries: {queries}, k: {top_k}");

    let store = VectorStore::new(dimension);
    let mut rng = StdRng::seed_from_u64(seed);

    println!("\nInserting {vectors} vectors...");
    let insert_time = populate(&store, vectors, &mut rng)?;
    println!(
        "Insert: {:?} total ({} vectors/sec)",
        insert_time,
        format!("{:.0}", vectors as f64 / insert_time.as_secs_f64()).green()
    );

    let query_set: Vec<Vec<f32>> = (0..queries)
        .map(|_| random_vector(dimension, &mut rng))
        .collect();

    // Warmup
    for query in query_set.iter().take(10) {
        store.search(query, top_k)?;
    }

    let mut latencies = Vec::with_capacity(queries);
    let run_start = Instant::now();
    for query in &query_set {
        let start = Instant::now();
        store.search(query, top_k)?;
        latencies.push(start.elapsed());
    }
    let total = run_start.elapsed();

    latencies.sort();
    let qps = queries as f64 / total.as_secs_f64();

    println!("\n{}", "--- Search (Euclidean) ---".bold());
    println!("QPS:           {}", format!("{qps:.2}").green());
    println!("P50 latency:   {:?}", percentile(&latencies, 0.50));
    println!("P99 latency:   {:?}", percentile(&latencies, 0.99));
    println!("P99.9 latency: {:?}", percentile(&latencies, 0.999));

    Ok(())
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let index = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[index]
}
