use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use passnest::{Dialect, HashKind, HashParams, SaltRecord, crypto::DEFAULT_COST, format};
use serde::Serialize;
use std::process::ExitCode;
mod auth;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    /// HMAC-SHA256 blocks: $F$CC$B$...
    Blocks,
    /// Repeated SHA-256: $F$CC$...
    Legacy,
}

#[derive(Debug, clap::Args)]
struct HashArgs {
    /// Work factor, log2 of the iteration count (clamped to 4..=31)
    #[arg(long, env = "PASSNEST_COST", default_value_t = DEFAULT_COST)]
    cost: u32,

    /// Use the $F$ fallback even when bcrypt is available
    #[arg(long, default_value_t = false)]
    fallback: bool,

    /// Fallback dialect for new hashes
    #[arg(long, value_enum, default_value_t = DialectArg::Blocks)]
    dialect: DialectArg,

    /// Number of 32-byte blocks for the blocks dialect (1-9)
    #[arg(long, default_value_t = 1)]
    blocks: u8,
}

impl HashArgs {
    fn to_hash_params(&self) -> Result<HashParams> {
        let dialect = match self.dialect {
            DialectArg::Blocks => Dialect::Blocks(self.blocks),
            DialectArg::Legacy => Dialect::Legacy,
        };

        Ok(HashParams::new(self.cost, dialect)?.with_prefer_native(!self.fallback))
    }
}

#[derive(Debug, Parser)]
#[command(name = "passnest")]
#[command(
    version,
    about = "Salted password hashes with bcrypt and a portable HMAC-SHA256 fallback."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password
    Hash {
        #[command(flatten)]
        params: HashArgs,
    },

    /// Checks a password against a stored hash
    #[command(arg_required_else_help = true)]
    Verify { hash: String },

    /// Shows the parameters embedded in a stored hash
    #[command(arg_required_else_help = true)]
    Inspect {
        hash: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Prints LEN random bytes as hex
    #[command(arg_required_else_help = true)]
    RandomBytes { len: usize },

    /// Prints a random key of LEN characters from ./0-9A-Za-z
    #[command(arg_required_else_help = true)]
    RandomKey { len: usize },
}

#[derive(Serialize)]
struct Inspection<'a> {
    scheme: &'static str,
    #[serde(flatten)]
    record: Option<&'a SaltRecord>,
}

fn inspect(hash: &str, json: bool) -> Result<()> {
    let kind = format::identify(hash).context("unable to read hash")?;
    let record = match &kind {
        HashKind::Fallback(record) => Some(record),
        HashKind::Native => None,
    };

    if json {
        let inspection = Inspection {
            scheme: if record.is_some() { "fallback" } else { "native" },
            record,
        };
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    match record {
        None => println!("scheme:  native"),
        Some(record) => {
            match record.dialect() {
                Dialect::Blocks(n) => println!("scheme:  fallback (blocks, {n})"),
                Dialect::Legacy => println!("scheme:  fallback (legacy)"),
            }
            println!("cost:    {}", record.cost());
            println!("salt:    {}", record.salt());
            if !record.rest().is_empty() {
                println!("hash:    {}", record.rest());
            }
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Cli::parse();
    match args.command {
        Commands::Hash { params } => {
            let params = params.to_hash_params()?;
            let password = auth::read_new_password_with_confirmation()?;
            let hash = passnest::hash_with(password.as_bytes(), &params)
                .context("failed to hash password")?;
            println!("{hash}");
        }
        Commands::Verify { hash } => {
            let password = auth::read_password()?;
            if passnest::validate(password.as_bytes(), &hash) {
                println!("match");
            } else {
                println!("no match");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect { hash, json } => inspect(&hash, json)?,
        Commands::RandomBytes { len } => {
            let bytes = passnest::random_bytes(len);
            println!("{}", bytes.to_hex());
        }
        Commands::RandomKey { len } => println!("{}", passnest::random_key(len)),
    }

    Ok(ExitCode::SUCCESS)
}
