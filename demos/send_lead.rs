//! Sends a test lead to RD Station.
//!
//! Reads RDSTATION_PRIVATE_TOKEN / RDSTATION_PUBLIC_TOKEN from the environment
//! (or `.env`) and the lead email from the first argument.
//!
//! ```text
//! RUST_LOG=debug cargo run --example send_lead -- someone@example.com
//! ```

use rdstation_leads::{ClientConfig, LeadClient, LeadData, LifecycleStage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rdstation_leads=info,send_lead=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let email = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: send_lead <email>"))?;

    let config = ClientConfig::from_env()?;
    let client = LeadClient::from_config(config)?;

    let data = LeadData::new()
        .identifier("rust-demo")
        .name("Demo Lead")
        .tags("demo");

    let delivery = client.create_lead(&email, data, None).await?;
    tracing::info!("Conversion delivered: {} ({:?})", delivery.delivered, delivery.status);

    let delivery = client
        .update_lead_stage_and_opportunity(&email, LifecycleStage::QualifiedLead, true)
        .await?;
    tracing::info!("Stage update delivered: {} ({:?})", delivery.delivered, delivery.status);

    Ok(())
}
