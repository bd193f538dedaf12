//! # Seed Data Generator
//!
//! Populates the sales database with sample sales for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 sales (default)
//! cargo run -p tally-service --bin seed
//!
//! # Generate custom amount
//! cargo run -p tally-service --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p tally-service --bin seed -- --db ./data/sales.db
//! ```
//!
//! Each sale gets 1 to 4 items with quantities spread over all three
//! discount tiers. Every seventh sale is cancelled and every fifth has its
//! first item cancelled.

use anyhow::Context;
use chrono::{Duration, Utc};
use std::env;
use std::path::PathBuf;

use tally_core::{Money, PageRequest, SaleItemInput};
use tally_service::{init_tracing, CreateSale, SalesService, ServiceConfig};

/// Sample products: (product id, name, unit price in cents)
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("BEV-001", "Sparkling Water 500ml", 129),
    ("BEV-002", "Orange Juice 1L", 349),
    ("SNK-001", "Salted Crisps", 199),
    ("SNK-002", "Dark Chocolate Bar", 249),
    ("DRY-001", "Whole Milk 1L", 139),
    ("DRY-002", "Greek Yogurt", 289),
    ("GRO-001", "Penne Pasta 500g", 179),
    ("GRO-002", "Basmati Rice 1kg", 459),
    ("HOU-001", "Dish Soap", 325),
    ("HOU-002", "Paper Towels 6-Pack", 899),
];

const CUSTOMERS: &[&str] = &["CUST-001", "CUST-002", "CUST-003", "CUST-004", "CUST-005"];

const BRANCHES: &[&str] = &["BR-NORTH", "BR-SOUTH", "BR-CENTRAL"];

/// Quantities cycled through so every discount tier shows up.
const QUANTITIES: &[i64] = &[1, 2, 3, 4, 6, 9, 10, 15, 20];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                let value = args.get(i + 1).context("--count needs a value")?;
                count = value
                    .parse()
                    .with_context(|| format!("invalid --count value '{value}'"))?;
                i += 1;
            }
            "--db" | "-d" => {
                let value = args.get(i + 1).context("--db needs a value")?;
                db_path = Some(PathBuf::from(value));
                i += 1;
            }
            "--help" | "-h" => {
                println!("Tally Sales Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of sales to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: from sales.toml)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    let mut config = ServiceConfig::load(None).context("loading configuration")?;
    if let Some(path) = db_path {
        config.database.path = path;
    }
    init_tracing(&config.logging);

    println!("Tally Sales Seed Data Generator");
    println!("===============================");
    println!("Database: {}", config.database.path.display());
    println!("Sales:    {}", count);
    println!();

    let service = SalesService::connect(&config)
        .await
        .context("opening sales database")?;

    let existing = service.list_sales(PageRequest::new(1, 1)).await?.total_items;
    if existing > 0 {
        println!("Database already has {} sales", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let now = Utc::now();
    let mut generated = 0usize;

    for n in 0..count {
        let cmd = CreateSale::new(
            CUSTOMERS[n % CUSTOMERS.len()],
            BRANCHES[n % BRANCHES.len()],
            sample_items(n),
        )
        .with_sale_number(format!("S-{:06}", n + 1))
        .with_date(now - Duration::hours(i64::try_from(count - n).unwrap_or(0)));

        let sale_id = match service.create_sale(cmd).await {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Failed to create sale {}: {}", n + 1, e);
                continue;
            }
        };

        if n % 5 == 0 {
            if let Some(first_item) = service.get_sale(sale_id).await?.items.first() {
                service.cancel_item(sale_id, first_item.id).await?;
            }
        }
        if n % 7 == 0 {
            service.cancel_sale(sale_id).await?;
        }

        generated += 1;
        if generated % 100 == 0 {
            println!("  Generated {} sales...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("Generated {} sales in {:?}", generated, elapsed);

    let first_page = service.list_sales(PageRequest::default()).await?;
    println!(
        "  {} sales over {} pages of {}",
        first_page.total_items,
        first_page.total_pages,
        PageRequest::default().size
    );
    if let Some(oldest) = first_page.data.first() {
        println!("  Oldest: {} total {}", oldest.sale_number, oldest.total);
    }

    println!();
    println!("Seed complete!");

    Ok(())
}

/// Builds 1 to 4 distinct items for the n-th sale.
fn sample_items(n: usize) -> Vec<SaleItemInput> {
    let lines = 1 + n % 4;
    (0..lines)
        .map(|k| {
            let (product_id, name, price) = PRODUCTS[(n * 3 + k) % PRODUCTS.len()];
            let quantity = QUANTITIES[(n + k * 2) % QUANTITIES.len()];
            SaleItemInput::new(product_id, name, Money::from_cents(price), quantity)
        })
        .collect()
}
