use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::seq::IndexedRandom;
use rand::Rng;
use server::{FindResponse, RecipeOrchestrator, RecipeOut, StageArgs};

/// Ingredients the benchmark draws its requests from
const PANTRY: &[&str] = &[
    "mushrooms", "cream", "garlic", "onion", "tofu", "chicken", "rice", "pasta", "tomatoes",
    "spinach", "lemon", "parmesan", "eggs", "potatoes", "chickpeas", "coconut milk",
];

/// Recipe finder - find and rank recipes from the web for your ingredients
#[derive(Parser)]
#[command(name = "recipe-finder")]
#[command(about = "Find and rank recipes for a set of ingredients", long_about = None)]
struct Cli {
    #[command(flatten)]
    stages: StageArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find recipes for a set of ingredients
    Find {
        /// Comma-separated ingredients, e.g. "tofu, garlic"
        #[arg(long, value_delimiter = ',', required = true)]
        ingredients: Vec<String>,

        /// Number of recipes to return
        #[arg(long, default_value = "5")]
        top_k: usize,

        /// Print the raw JSON response instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test end-to-end latency
    Benchmark {
        /// Number of pipeline runs to make
        #[arg(long, default_value = "20")]
        requests: usize,

        /// Number of concurrent runs
        #[arg(long, default_value = "4")]
        concurrent: usize,

        /// Recipes requested per run
        #[arg(long, default_value = "3")]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = cli
        .stages
        .into_config()
        .context("Invalid collaborator configuration")?;
    let orchestrator = RecipeOrchestrator::new(config)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Find {
            ingredients,
            top_k,
            json,
        } => handle_find(&orchestrator, ingredients, top_k, json).await?,
        Commands::Benchmark {
            requests,
            concurrent,
            top_k,
        } => handle_benchmark(&orchestrator, requests, concurrent, top_k).await?,
    }

    Ok(())
}

/// Handle the 'find' command
async fn handle_find(
    orchestrator: &RecipeOrchestrator,
    ingredients: Vec<String>,
    top_k: usize,
    json: bool,
) -> Result<()> {
    let start = Instant::now();
    let response = orchestrator
        .find_recipes(&ingredients, top_k)
        .await
        .context("Recipe search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_recipes(&response);
        println!("{} Found {} recipes in {:.2?}", "✓".green(), response.results.len(), start.elapsed());
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: &RecipeOrchestrator,
    requests: usize,
    concurrent: usize,
    top_k: usize,
) -> Result<()> {
    if requests == 0 {
        anyhow::bail!("--requests must be at least 1");
    }

    let ingredient_sets = random_ingredient_sets(requests);

    println!(
        "{}",
        format!("Running {} requests, {} at a time...", requests, concurrent).bold().blue()
    );
    let wall_clock = Instant::now();
    let outcomes = pipeline::fan_out(ingredient_sets, concurrent, move |ingredients| async move {
        let start = Instant::now();
        let result = orchestrator.find_recipes(&ingredients, top_k).await;
        (start.elapsed(), result.is_ok())
    })
    .await;
    let total_time = wall_clock.elapsed();

    let failures = outcomes.iter().filter(|(_, ok)| !ok).count();
    let mut timings: Vec<Duration> = outcomes.into_iter().map(|(elapsed, _)| elapsed).collect();
    timings.sort();

    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let p50 = percentile(&timings, 0.50);
    let p95 = percentile(&timings, 0.95);
    let p99 = percentile(&timings, 0.99);
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Failed requests: {}", failures);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Two to four distinct pantry ingredients per request
fn random_ingredient_sets(count: usize) -> Vec<Vec<String>> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let size = rng.random_range(2..=4);
            PANTRY
                .choose_multiple(&mut rng, size)
                .map(|i| i.to_string())
                .collect()
        })
        .collect()
}

/// Nearest-rank percentile of sorted timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Helper function to format and print recipes
fn print_recipes(response: &FindResponse) {
    print!("{}", "Recipes:\n".bold().blue());
    for (rank, recipe) in response.results.iter().enumerate() {
        print_recipe(rank + 1, recipe);
    }
}

fn print_recipe(rank: usize, recipe: &RecipeOut) {
    println!(
        "{}. {} ({} min)",
        rank.to_string().green(),
        recipe.title.bold(),
        recipe.cook_time_mins
    );
    if !recipe.summary.is_empty() {
        println!("   {}", recipe.summary);
    }
    println!("   {}Ingredients: {}", "• ".cyan(), recipe.ingredients.join(", "));
    if !recipe.tools.is_empty() {
        println!("   {}Tools: {}", "• ".cyan(), recipe.tools.join(", "));
    }
    println!("   {}{} steps", "• ".cyan(), recipe.steps.len());
    println!("   {}", recipe.source_url.dimmed());
}
