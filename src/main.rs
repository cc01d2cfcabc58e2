use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use resilient_get::{
    apis::{CityWeather, CoinPaprika, OpenMeteo, OpenWeather, Placeholder, Ticker},
    ExecutorOptions, RequestExecutor,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    retry: RetryArgs,

    /// Also write the fetched data as pretty JSON to this file.
    #[arg(long, global = true, value_name = "FILE")]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RetryArgs {
    /// Per-attempt timeout in seconds.
    #[arg(long, global = true, default_value_t = 5.0)]
    timeout: f64,

    /// Total number of attempts per request.
    #[arg(long, global = true, default_value_t = 3)]
    attempts: usize,

    /// Seconds to wait between attempts.
    #[arg(long, global = true, default_value_t = 2.0)]
    delay: f64,
}

impl RetryArgs {
    fn options(&self) -> anyhow::Result<ExecutorOptions> {
        Ok(ExecutorOptions {
            timeout_ms: seconds_to_ms(self.timeout).context("invalid --timeout")?,
            max_attempts: self.attempts,
            retry_delay_ms: seconds_to_ms(self.delay).context("invalid --delay")?,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch any URL and print the result envelope
    Get { url: String },
    /// Show one JSONPlaceholder post
    Post { id: u64 },
    /// Create a JSONPlaceholder post (the API echoes it back, nothing is stored)
    CreatePost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long, default_value_t = 1)]
        user_id: u64,
    },
    /// Show one JSONPlaceholder user
    User { id: u64 },
    /// List JSONPlaceholder todos
    Todos {
        #[arg(long)]
        user: Option<u64>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Show the USD price of one or more coins
    Crypto {
        #[arg(required = true)]
        coins: Vec<String>,
    },
    /// List the top coins by market cap
    Top {
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Show the current weather for a city
    Weather { city: String },
    /// Show the current weather for a city from OpenWeatherMap
    Openweather {
        city: String,
        /// OpenWeatherMap API key.
        #[arg(long = "openweather-key", env = "OPENWEATHER_API_KEY", hide_env_values = true)]
        api_key: String,
    },
    /// Delhi weather and the Bitcoin price at a glance
    Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let executor = RequestExecutor::new().with_options(cli.retry.options()?);

    let data = match run(&executor, &cli.command).await {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.save {
        let file = fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &data)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Data saved to {}", path.display());
    }
    Ok(())
}

async fn run(executor: &RequestExecutor, command: &Commands) -> anyhow::Result<Value> {
    match command {
        Commands::Get { url } => {
            let outcome = executor.get(url).await;
            println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
            Ok(outcome.into_result()?)
        }
        Commands::Post { id } => {
            let post = Placeholder::new(executor).post(*id).await?;
            println!("Post #{} by user {}", post.id, post.user_id);
            println!("  {}", post.title);
            println!();
            println!("{}", post.body);
            to_value(&post)
        }
        Commands::User { id } => {
            let user = Placeholder::new(executor).user(*id).await?;
            println!("Name:  {}", user.name);
            println!("Email: {}", user.email);
            println!("Phone: {}", user.phone);
            if let Some(address) = &user.address {
                println!("City:  {}", address.city);
            }
            to_value(&user)
        }
        Commands::Todos { user, completed } => {
            let todos = Placeholder::new(executor).todos(*user, *completed).await?;
            println!("Total todos found: {}", todos.len());
            for (i, todo) in todos.iter().take(10).enumerate() {
                let mark = if todo.completed { "x" } else { " " };
                println!("{:>3}. [{mark}] {}", i + 1, todo.title);
            }
            to_value(&todos)
        }
        Commands::CreatePost {
            title,
            body,
            user_id,
        } => {
            let post = Placeholder::new(executor)
                .create_post(title, body, *user_id)
                .await?;
            println!("Post created with id {}", post.id);
            println!("  {}", post.title);
            to_value(&post)
        }
        Commands::Crypto { coins } => {
            let coins: Vec<&str> = coins.iter().map(String::as_str).collect();
            let results = CoinPaprika::new(executor).compare(&coins).await;
            print_comparison_table(&results);
            anyhow::ensure!(
                results.iter().any(|(_, ticker)| ticker.is_ok()),
                "none of the requested coins could be fetched"
            );
            Ok(comparison_rows(&results))
        }
        Commands::Top { limit } => {
            let tickers = CoinPaprika::new(executor).top(*limit).await?;
            println!("Top {} cryptocurrencies by market cap", tickers.len());
            print_ticker_table(&tickers);
            to_value(&tickers)
        }
        Commands::Weather { city } => {
            let weather = OpenMeteo::new(executor).weather_for_city(city).await?;
            print_weather(&weather);
            to_value(&weather)
        }
        Commands::Openweather { city, api_key } => {
            let report = OpenWeather::new(executor, api_key.as_str())
                .weather(city)
                .await?;
            let divider = "=".repeat(45);
            println!("{divider}");
            match &report.sys.country {
                Some(country) => println!("  OpenWeatherMap - {}, {country}", report.name),
                None => println!("  OpenWeatherMap - {}", report.name),
            }
            println!("{divider}");
            println!("  Temperature: {} °C", report.main.temp);
            println!("  Feels Like: {} °C", report.main.feels_like);
            println!("  Humidity: {}%", report.main.humidity);
            if let Some(wind) = &report.wind {
                println!("  Wind Speed: {} m/s", wind.speed);
            }
            println!("  Condition: {}", report.description());
            println!("{divider}");
            to_value(&report)
        }
        Commands::Dashboard => {
            let weather = OpenMeteo::new(executor).weather_for_city("delhi").await;
            let bitcoin = CoinPaprika::new(executor).ticker("bitcoin").await;

            let weather = match weather {
                Ok(weather) => {
                    print_weather(&weather);
                    to_value(&weather)?
                }
                Err(err) => {
                    eprintln!("Weather unavailable: {err}");
                    Value::Null
                }
            };
            println!();
            let bitcoin = match bitcoin {
                Ok(ticker) => {
                    print_ticker_table(std::slice::from_ref(&ticker));
                    to_value(&ticker)?
                }
                Err(err) => {
                    eprintln!("Bitcoin unavailable: {err}");
                    Value::Null
                }
            };
            anyhow::ensure!(
                !(weather.is_null() && bitcoin.is_null()),
                "dashboard could not fetch any data"
            );
            Ok(json!({ "weather": weather, "bitcoin": bitcoin }))
        }
    }
}

fn print_weather(weather: &CityWeather) {
    let current = &weather.current;
    let divider = "=".repeat(40);
    println!("{divider}");
    match &weather.place.country {
        Some(country) => println!("  Weather in {}, {country}", weather.place.name),
        None => println!("  Weather in {}", weather.place.name),
    }
    println!("{divider}");
    println!("  Temperature: {} °C", current.temperature);
    println!("  Wind Speed: {} km/h", current.windspeed);
    if let Some(direction) = current.winddirection {
        println!("  Wind Direction: {direction}°");
    }
    println!("  Condition: {}", current.condition());
    println!("{divider}");
}

fn print_ticker_table(tickers: &[Ticker]) {
    println!("  {:<6}{:<15}{:>14}  24h Change", "Rank", "Name", "Price");
    println!("  {}", "-".repeat(50));
    for ticker in tickers {
        let usd = ticker.usd();
        println!(
            "  {:<6}{:<15}{:>14.2}  {:+.2}%",
            ticker.rank, ticker.name, usd.price, usd.percent_change_24h
        );
    }
}

/// Prints one row per requested coin; failed lookups show as "Not Found".
fn print_comparison_table(results: &[(String, resilient_get::Result<Ticker>)]) {
    println!("  {:<15}{:<10}{:>14}  24h Change", "Name", "Symbol", "Price (USD)");
    println!("  {}", "-".repeat(55));
    for (coin, result) in results {
        match result {
            Ok(ticker) => {
                let usd = ticker.usd();
                println!(
                    "  {:<15}{:<10}{:>14.2}  {:+.2}%",
                    ticker.name, ticker.symbol, usd.price, usd.percent_change_24h
                );
            }
            Err(_) => println!("  {coin:<15}{:<10}{:>14}  N/A", "N/A", "Not Found"),
        }
    }
    for (coin, result) in results {
        if let Err(err) = result {
            eprintln!("{coin}: {err}");
        }
    }
}

fn comparison_rows(results: &[(String, resilient_get::Result<Ticker>)]) -> Value {
    results
        .iter()
        .map(|(coin, result)| match result {
            Ok(ticker) => json!({
                "name": ticker.name,
                "symbol": ticker.symbol,
                "price": ticker.usd().price,
                "change_24h": ticker.usd().percent_change_24h,
            }),
            Err(_) => json!({
                "name": coin,
                "symbol": "N/A",
                "price": null,
                "change_24h": null,
            }),
        })
        .collect()
}

fn to_value<S: Serialize>(data: &S) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(data)?)
}

fn seconds_to_ms(seconds: f64) -> anyhow::Result<u64> {
    anyhow::ensure!(
        seconds.is_finite() && seconds >= 0.0,
        "expected a non-negative number of seconds, got {seconds}"
    );
    Ok((seconds * 1000.0).round() as u64)
}
