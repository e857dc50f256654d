//! Purchase Load Tool
//!
//! Fires concurrent purchases at one album and checks that stock never
//! oversells.
//!
//! Run with: cargo run --bin purchase_load --release -- --buyers 50 --stock 20 --quantity 1

use std::time::Instant;

use record_shop::db::Store;
use record_shop::domain::{NewAlbum, NewPurchase, NewUser, Price};
use record_shop::{Config, Repository, RepositoryError};

fn arg(args: &[String], name: &str, default: i32) -> i32 {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let buyers = arg(&args, "--buyers", 50);
    let stock = arg(&args, "--stock", 20);
    let quantity = arg(&args, "--quantity", 1);

    println!("Purchase Load Test - {buyers} buyers x {quantity} against stock {stock}");
    println!("Connecting to database...");

    let config = Config::from_env()?;
    let repository = Repository::new(Store::connect(&config).await?);

    let album_id = repository
        .add_album(&NewAlbum {
            title: "Load Test Pressing".to_string(),
            artist: "purchase_load".to_string(),
            price: "9.99".parse::<Price>()?,
            stock,
        })
        .await?;
    let user_id = repository
        .add_user(&NewUser {
            username: "purchase_load".to_string(),
            email: "load@example.invalid".to_string(),
        })
        .await?;

    let start = Instant::now();
    let mut tasks = Vec::with_capacity(buyers.max(0) as usize);
    for _ in 0..buyers {
        let repository = repository.clone();
        tasks.push(tokio::spawn(async move {
            repository
                .add_purchase(&NewPurchase {
                    user_id,
                    album_id,
                    quantity,
                })
                .await
        }));
    }

    let mut succeeded = 0;
    let mut out_of_stock = 0;
    let mut failed = 0;
    for task in tasks {
        match task.await? {
            Ok(_) => succeeded += 1,
            Err(RepositoryError::InsufficientStock { .. }) => out_of_stock += 1,
            Err(e) => {
                failed += 1;
                eprintln!("Purchase failed: {e}");
            }
        }
    }
    let elapsed = start.elapsed();

    let album = repository.album_by_id(album_id).await?;
    let expected_stock = stock - succeeded * quantity;

    println!("\n=== Load Test Results ===");
    println!("Succeeded: {succeeded}");
    println!("Insufficient stock: {out_of_stock}");
    println!("Other failures: {failed}");
    println!("Final stock: {} (expected {expected_stock})", album.stock);
    println!("Time: {:.2}s", elapsed.as_secs_f64());

    if album.stock != expected_stock || album.stock < 0 {
        anyhow::bail!("stock invariant violated");
    }

    Ok(())
}
