//! ISO 20022 Generator - CLI tool for producing payment message XML.

use clap::Parser;
use std::fs::File;
use std::io::{self, Read, Write};

use isopay_system::fx::{self, HttpRateProvider};
use isopay_system::pacs008_format::Pacs008Message;
use isopay_system::pain001_format::Pain001Message;
use isopay_system::types::{ChannelContext, Pacs008Record, Pain001Record};
use isopay_system::{MessageType, Result};

#[derive(Parser)]
#[command(name = "isopay_generator")]
#[command(about = "Generate ISO 20022 payment messages (pain.001, pacs.008)", long_about = None)]
struct Cli {
    /// Input field file path, CSV key,value rows (or stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Message type (pain001, pacs008)
    #[arg(long = "message-type")]
    message_type: String,

    /// Payment channel for pacs.008 (swift, fedwire)
    #[arg(long, default_value = "swift")]
    channel: String,

    /// Fedwire sub-type (domestic, international); required with --channel fedwire
    #[arg(long = "fedwire-type")]
    fedwire_type: Option<String>,

    /// Fetch a live exchange rate when the settlement currency differs
    /// and no rate is supplied in the input
    #[arg(long = "fetch-rate")]
    fetch_rate: bool,

    /// Output file path (or stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let message_type = cli.message_type.parse::<MessageType>()?;

    let fields = if let Some(ref input_path) = cli.input {
        let mut file = File::open(input_path)?;
        read_fields(&mut file)?
    } else {
        let mut stdin = io::stdin();
        read_fields(&mut stdin)?
    };

    let xml = match message_type {
        MessageType::Pain001 => {
            let record = Pain001Record::from_fields(fields)?;
            Pain001Message { record }.to_xml_string()?
        }
        MessageType::Pacs008 => {
            let context = ChannelContext::from_args(&cli.channel, cli.fedwire_type.as_deref())?;
            let mut record = Pacs008Record::from_fields(fields)?;
            if cli.fetch_rate && record.exchange_rate.is_none() {
                resolve_rate(&mut record, context)?;
            }
            Pacs008Message { record, context }.generate()?
        }
    };

    if let Some(ref output_path) = cli.output {
        let mut file = File::create(output_path)?;
        file.write_all(xml.as_bytes())?;
    } else {
        let mut stdout = io::stdout();
        stdout.write_all(xml.as_bytes())?;
    }

    Ok(())
}

/// Read flat `key,value` rows into field pairs. Rows with fewer than two
/// columns are skipped; extra columns are ignored.
fn read_fields<R: Read>(reader: &mut R) -> Result<Vec<(String, String)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut fields = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        if let (Some(key), Some(value)) = (row.get(0), row.get(1)) {
            fields.push((key.trim().to_string(), value.to_string()));
        }
    }
    Ok(fields)
}

/// Populate the record's exchange rate from the live provider when a
/// conversion applies, leaving it unset for same-currency payments.
fn resolve_rate(record: &mut Pacs008Record, context: ChannelContext) -> Result<()> {
    let settlement_ccy = record.effective_settlement_currency().to_string();
    if !fx::needs_conversion(context, &settlement_ccy, &record.instructed_currency) {
        return Ok(());
    }
    let provider = HttpRateProvider::new()?;
    let quote = fx::fetch_rate(&provider, &record.instructed_currency, &settlement_ccy)?;
    tracing::info!(
        rate = %quote.rate,
        source = ?quote.source,
        "resolved exchange rate"
    );
    record.exchange_rate = Some(quote.rate);
    Ok(())
}
