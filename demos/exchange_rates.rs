//! demos/exchange_rates.rs
//!
//! Tells the story of the euro against the US dollar from 2015 to 2021, one panel per
//! year. With the `plotting` feature the panels are written to `charts/rates`.
//!
//! To run this example:
//! cargo run --example exchange_rates --features plotting -- euro-daily-hist_1999_2020.csv

use std::error::Error;

use datastory::{Currency, ExchangeRateStory};

const DEFAULT_PATH: &str = "euro-daily-hist_1999_2020.csv";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_string());
    let story = ExchangeRateStory::builder()
        .path(path)
        .currency(Currency::us_dollar())
        .rolling_window(30)
        .build()
        .run()?;

    println!("{story}");
    story.write_json("reports/exchange_rates.json")?;

    #[cfg(feature = "plotting")]
    {
        let charts =
            datastory::chart::render::render_rate_story(&story, std::path::Path::new("charts/rates"))?;
        println!("Wrote {} charts to charts/rates", charts.len());
    }

    Ok(())
}
