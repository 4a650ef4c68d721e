//! Integration example showing how to use fqdn-liveness in your application
//!
//! This example demonstrates:
//! - Apex vs. FQDN liveness
//! - Batch processing
//! - Caching benefits
//! - Custom options
//!
//! Run with: cargo run --example integration_example --features hickory-transport,tcp-whois

use std::sync::Arc;
use std::time::{Duration, Instant};

use fqdn_liveness::transport::hickory::HickoryTransportFactory;
use fqdn_liveness::transport::tcp_whois::default_whois_transport;
use fqdn_liveness::{create_fqdn_checker, CheckerCollaborators, DnsOptions, FqdnChecker, WhoisOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("fqdn_liveness=info")
        .init();

    println!("🚀 FQDN Liveness Integration Example");
    println!("====================================");

    println!("\n1️⃣ Basic Usage");
    basic_usage_example().await?;

    println!("\n2️⃣ Batch Processing");
    batch_processing_example().await?;

    println!("\n3️⃣ Caching Benefits");
    caching_example().await?;

    println!("\n4️⃣ Custom Options");
    custom_options_example().await?;

    println!("\n✅ All examples completed successfully!");
    Ok(())
}

fn collaborators() -> CheckerCollaborators {
    CheckerCollaborators::new(
        Arc::new(HickoryTransportFactory::new()),
        default_whois_transport(),
    )
}

async fn basic_usage_example() -> Result<(), Box<dyn std::error::Error>> {
    let checker = create_fqdn_checker(
        DnsOptions::default(),
        WhoisOptions::default(),
        collaborators(),
        None,
        None,
    )?;

    let test_cases = vec![
        ("google.com", true),
        ("192.0.2.1", false),
        ("ghost.invalid-example.test", false),
    ];

    for (domain, should_be_alive) in test_cases {
        print!("   Testing {}: ", domain);
        let result = checker.is_fqdn_alive(domain).await;
        if result.alive == should_be_alive {
            println!("✅ as expected (alive={})", result.alive);
        } else {
            println!("❌ unexpected (alive={})", result.alive);
        }
    }

    Ok(())
}

async fn batch_processing_example() -> Result<(), Box<dyn std::error::Error>> {
    let checker = Arc::new(create_fqdn_checker(
        DnsOptions::default(),
        WhoisOptions::default(),
        collaborators(),
        None,
        None,
    )?);

    let domains = vec!["github.com", "stackoverflow.com", "rust-lang.org"];

    println!("   Processing {} domains concurrently...", domains.len());
    let start = Instant::now();

    let mut handles = Vec::new();
    for domain in domains {
        let checker = checker.clone();
        let domain = domain.to_string();
        handles.push(tokio::spawn(async move {
            let result = checker.is_fqdn_alive(&domain).await;
            (domain, result.alive)
        }));
    }

    let mut successful = 0;
    for handle in handles {
        let (domain, alive) = handle.await?;
        println!("   {} {}: alive={}", if alive { "✅" } else { "⚠️ " }, domain, alive);
        if alive {
            successful += 1;
        }
    }

    println!("   📊 {} of {} alive, in {:?}", successful, 3, start.elapsed());
    Ok(())
}

async fn caching_example() -> Result<(), Box<dyn std::error::Error>> {
    let checker = create_fqdn_checker(
        DnsOptions::default(),
        WhoisOptions::default(),
        collaborators(),
        None,
        None,
    )?;
    let domain = "example.com";

    println!("   First lookup (cache miss):");
    let start = Instant::now();
    let result1 = checker.is_fqdn_alive(domain).await;
    let first_time = start.elapsed();
    println!("     Time: {:?}, alive: {}", first_time, result1.alive);

    println!("   Second lookup (served from the checker's result cache):");
    let start = Instant::now();
    let result2 = checker.is_fqdn_alive(domain).await;
    let second_time = start.elapsed();
    println!("     Time: {:?}, alive: {}", second_time, result2.alive);

    if second_time < first_time {
        println!("   🚀 cache hit was faster ({:?} vs {:?})", second_time, first_time);
    }

    Ok(())
}

async fn custom_options_example() -> Result<(), Box<dyn std::error::Error>> {
    let mut dns_options = DnsOptions::default();
    dns_options.confirmations = 1;

    let mut whois_options = WhoisOptions::default();
    whois_options.timeout = Duration::from_millis(2000);
    whois_options.whois_error_count_as_alive = false;

    let checker = create_fqdn_checker(dns_options, whois_options, collaborators(), None, None)?;

    println!("   Using custom options:");
    println!("     - confirmations: 1");
    println!("     - whois timeout: 2s");
    println!("     - whois_error_count_as_alive: false");

    let result = checker.is_fqdn_alive("rust-lang.org").await;
    println!("   ✅ lookup completed, alive: {}", result.alive);

    Ok(())
}
