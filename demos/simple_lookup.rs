//! Simple example of using the fqdn-liveness library
//!
//! Run with: cargo run --example simple_lookup --features hickory-transport,tcp-whois

use std::sync::Arc;

use fqdn_liveness::transport::hickory::HickoryTransportFactory;
use fqdn_liveness::transport::tcp_whois::default_whois_transport;
use fqdn_liveness::{create_fqdn_checker, CheckerCollaborators, DnsOptions, WhoisOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("fqdn_liveness=info")
        .init();

    println!("🔍 FQDN Liveness Example");
    println!("========================");

    let collaborators = CheckerCollaborators::new(
        Arc::new(HickoryTransportFactory::new()),
        default_whois_transport(),
    );
    let checker = create_fqdn_checker(
        DnsOptions::default(),
        WhoisOptions::default(),
        collaborators,
        None,
        None,
    )?;

    let test_domains = vec!["google.com", "github.com", "rust-lang.org", "ghost.invalid-example.test"];

    for domain in test_domains {
        println!("\n📋 Checking: {}", domain);
        println!("{}", "─".repeat(50));

        let result = checker.is_fqdn_alive(domain).await;
        match result.registerable_domain {
            Some(apex) => {
                println!("   Apex: {}", apex);
                println!("   Apex alive: {}", result.registerable_domain_alive);
                println!("   FQDN alive: {}", result.alive);
            }
            None => {
                println!("   ⚠️  Not a registerable domain");
            }
        }
    }

    println!("\n🎉 Example completed!");
    Ok(())
}
