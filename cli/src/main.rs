use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Blind Mint commit-reveal toolkit")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode one value and print its canonical bytes as hex
    Encode {
        /// Field type label, e.g. UInt64 or String
        #[arg(short = 't', long = "type")]
        type_label: String,

        /// Textual value to encode
        #[arg(short, long, allow_hyphen_values = true)]
        value: String,

        /// Add the length prefix used inside multi-field preimages
        #[arg(long)]
        prefixed: bool,
    },

    /// Commit a batch of records and write the pending mints
    Commit {
        /// Config file path
        #[arg(short, long)]
        config: PathBuf,

        /// JSON array of metadata records
        #[arg(short, long)]
        records: PathBuf,

        /// Output file for pending mints (hashes, salts and plaintext)
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Pair pending mints with the identities the chain assigned
    Assign {
        /// Pending mints written by `commit`
        #[arg(short, long)]
        pending: PathBuf,

        /// Assigned identities, in batch order
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u64>,

        /// Output file for minted items
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Verify reveal records against minted items
    Verify {
        /// Config file path
        #[arg(short, long)]
        config: PathBuf,

        /// Minted items written by `assign`
        #[arg(short, long)]
        minted: PathBuf,

        /// JSON array of reveal records
        #[arg(short, long)]
        reveals: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    // Parse command-line arguments
    let args = Args::parse();

    match args.command {
        Command::Encode { type_label, value, prefixed } => {
            println!("{}", commands::encode(&type_label, &value, prefixed)?);
        }
        Command::Commit { config, records, out } => {
            let count = commands::commit(&config, &records, &out)?;
            info!("Wrote {} pending mints to {}", count, out.display());
        }
        Command::Assign { pending, ids, out } => {
            let count = commands::assign(&pending, &ids, &out)?;
            info!("Wrote {} minted items to {}", count, out.display());
        }
        Command::Verify { config, minted, reveals } => {
            let reports = commands::verify(&config, &minted, &reveals)?;
            let failures = reports.iter().filter(|r| !r.ok).count();

            println!("{}", serde_json::to_string_pretty(&reports)?);

            if failures > 0 {
                error!("{} of {} reveals failed", failures, reports.len());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
