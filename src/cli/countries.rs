//! `countries` command.

use anyhow::{Context, Result};

use crate::countries::{countries, country_name};

/// One `code  name` line per country.
fn format_table() -> String {
    countries()
        .map(|(code, name)| format!("{code}  {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run_countries(code: Option<&str>) -> Result<()> {
    match code {
        Some(code) => {
            let name =
                country_name(code).with_context(|| format!("Unknown country code '{code}'"))?;
            println!("{name}");
        }
        None => println!("{}", format_table()),
    }
    Ok(())
}
