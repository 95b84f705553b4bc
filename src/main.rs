//! CLI entry point for booth-client.

use std::process::ExitCode;

use anyhow::{Context, Result};
use booth_client_lib::infrastructure::{ConfigManager, init_logging_with_config};
use booth_client_lib::{ListingPage, MarketplaceService, ProductDetail};
use clap::Parser;
use serde::Serialize;
use tracing::debug;

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;
    if let Some(level) = args.verbosity_level() {
        config.logging.level = level.to_string();
    }

    init_logging_with_config(&config.logging)?;
    debug!(?args, "CLI arguments parsed");

    let service = MarketplaceService::from_config(&config)?;

    match &args.command {
        Command::List { page, filter } => {
            let listing = service.list_products(*page, filter.as_deref()).await?;
            print_listing(&listing, args.json)?;
        }
        Command::Search { term, filter } => {
            let listing = service.search(term, filter.as_deref()).await?;
            print_listing(&listing, args.json)?;
        }
        Command::Get { id } => match service.get_product(id).await? {
            Some(detail) => print_detail(&detail, args.json)?,
            None => {
                eprintln!("Product {id} not found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Download { id, out } => {
            let Some(detail) = service.get_product(id).await? else {
                eprintln!("Product {id} not found");
                return Ok(ExitCode::FAILURE);
            };

            let target = out
                .clone()
                .unwrap_or_else(|| config.download.default_directory.join(detail.id.to_string()));
            let outcome = service.download(&detail, &target).await;

            if args.json {
                print_json(&outcome)?;
            } else {
                println!(
                    "{} downloaded, {} failed -> {}",
                    outcome.successful_downloads,
                    outcome.failed_downloads,
                    target.display()
                );
            }

            if !outcome.is_complete_success() {
                return Ok(ExitCode::from(2));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_listing(listing: &ListingPage, json: bool) -> Result<()> {
    if json {
        return print_json(listing);
    }

    for item in &listing.items {
        println!(
            "{:>10}  {:>8}  {}  [{}]",
            item.id.map_or_else(|| "?".to_string(), |id| id.to_string()),
            item.price.map_or_else(|| "-".to_string(), |price| format!("¥{price}")),
            item.name.as_deref().unwrap_or("(untitled)"),
            item.shop_name.as_deref().unwrap_or("unknown shop"),
        );
    }
    println!("{} items, {} pages total", listing.items.len(), listing.total_pages);
    Ok(())
}

fn print_detail(detail: &ProductDetail, json: bool) -> Result<()> {
    if json {
        return print_json(detail);
    }

    println!("{} ({})", detail.name, detail.id);
    println!("  price:     {}", detail.price);
    println!("  category:  {}", detail.category.name);
    println!("  shop:      {} <{}>", detail.shop.name, detail.shop.url);
    println!("  adult:     {}", detail.is_adult);
    println!("  wishlists: {}", detail.wish_count);
    println!("  images:    {}", detail.images.len());
    for link in &detail.downloadable {
        println!("  file:      {} <{}>", link.name, link.url);
    }
    Ok(())
}
