//! `nearby locate`: reverse-geocode a coordinate to a locality name.

use nearby_core::{AppConfig, Coordinate};
use nearby_fetch::GeocodeClient;

pub(crate) async fn run_locate(config: &AppConfig, at: Coordinate) -> anyhow::Result<()> {
    let client = GeocodeClient::from_config(config)?;
    match client.locality(at).await {
        Ok(Some(locality)) => println!("{locality}"),
        Ok(None) => println!("No locality found for {at}"),
        Err(e) => {
            tracing::warn!(%at, error = %e, "reverse geocode failed");
            println!("Error fetching name of your location");
        }
    }
    Ok(())
}
