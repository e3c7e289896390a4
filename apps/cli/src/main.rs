//! vcf2csv CLI: convert a phone's vCard export into an Outlook CSV import file.
//!
//! Reads vCard 2.1 records, keeps the formatted name and phone numbers, and
//! writes one Outlook 2003 CSV row per contact.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
