//! demos/traffic_volume.rs
//!
//! Summarises the I-94 westbound traffic file and, with the `plotting` feature,
//! writes the charts to `charts/traffic`.
//!
//! To run this example:
//! cargo run --example traffic_volume --features plotting -- Metro_Interstate_Traffic_Volume.csv

use std::error::Error;

use datastory::TrafficAnalysis;

const DEFAULT_PATH: &str = "Metro_Interstate_Traffic_Volume.csv";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_string());
    let analysis = TrafficAnalysis::builder().path(path).build();

    let traffic = analysis.load()?;
    let report = datastory::TrafficReport::from_frame(&traffic)?;
    println!("{report}");
    report.write_json("reports/traffic.json")?;

    #[cfg(feature = "plotting")]
    {
        let charts = datastory::chart::render::render_traffic(
            &traffic,
            &report,
            std::path::Path::new("charts/traffic"),
        )?;
        println!("Wrote {} charts to charts/traffic", charts.len());
    }

    Ok(())
}
