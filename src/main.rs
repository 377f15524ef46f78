//! Shamir Stego - hide threshold-shared secrets in images.
//!
//! Thin driver over the library: key management, embedding, recovery and
//! capacity planning from the command line.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use shamir_stego::stego::{load_carrier, plan};
use shamir_stego::{KeyPair, StegoArtifacts, StegoConfig, StegoPipeline};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shamir-stego")]
#[command(author, version, long_about = None)]
#[command(
    about = "Hide a secret in an image as Shamir shares",
    long_about = "Splits a secret into threshold shares, writes one share per image block into the pixel value channel, and protects the block grid with RSA-OAEP."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ShareArgs {
    /// JSON configuration file (overrides the flags below)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shares required to recover the secret
    #[arg(short = 'k', long, default_value = "3")]
    threshold: u8,

    /// Shares to distribute
    #[arg(short = 'n', long, default_value = "5")]
    shares: u8,

    /// RSA key size used when a new key has to be generated
    #[arg(long, default_value = "2048")]
    key_bits: usize,
}

impl ShareArgs {
    fn resolve(&self) -> Result<StegoConfig> {
        let config = match &self.config {
            Some(path) => StegoConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => StegoConfig::new(self.threshold, self.shares).with_key_bits(self.key_bits),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
struct SecretArgs {
    /// Secret text
    #[arg(long, conflicts_with = "secret_file")]
    secret: Option<String>,

    /// File holding the secret text (default: stdin)
    #[arg(long, conflicts_with = "secret")]
    secret_file: Option<PathBuf>,
}

impl SecretArgs {
    fn read(&self) -> Result<String> {
        match (&self.secret, &self.secret_file) {
            (Some(s), None) => Ok(s.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading secret from {}", path.display())),
            (None, None) => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
            (Some(_), Some(_)) => unreachable!(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an RSA keypair
    Keygen {
        /// Private key file
        #[arg(long, default_value = "private_key.pem")]
        key: PathBuf,

        /// Modulus size in bits
        #[arg(long, default_value = "2048")]
        bits: usize,

        /// Also write the public key here
        #[arg(long)]
        public_out: Option<PathBuf>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Embed a secret into a carrier image
    Embed {
        /// Carrier image
        carrier: PathBuf,

        /// Output base path (writes <base>.png and <base>_cols.bin)
        #[arg(long, default_value = "stego_image")]
        output: PathBuf,

        /// Private key file (generated if missing)
        #[arg(long, default_value = "private_key.pem")]
        key: PathBuf,

        #[command(flatten)]
        secret: SecretArgs,

        #[command(flatten)]
        shares: ShareArgs,
    },

    /// Recover a secret from a stego image
    Recover {
        /// Stego base path (reads <base>.png and <base>_cols.bin)
        #[arg(default_value = "stego_image")]
        stego: PathBuf,

        /// Private key file
        #[arg(long, default_value = "private_key.pem")]
        key: PathBuf,

        /// Length of the secret in bytes
        #[arg(long)]
        secret_len: usize,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        shares: ShareArgs,
    },

    /// Show the block grid a secret would use in a carrier
    Capacity {
        /// Carrier image
        carrier: PathBuf,

        #[command(flatten)]
        secret: SecretArgs,

        #[command(flatten)]
        shares: ShareArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Keygen {
            key,
            bits,
            public_out,
            force,
        } => cmd_keygen(&key, bits, public_out.as_deref(), force),

        Commands::Embed {
            carrier,
            output,
            key,
            secret,
            shares,
        } => cmd_embed(&carrier, &output, &key, &secret, &shares),

        Commands::Recover {
            stego,
            key,
            secret_len,
            output,
            shares,
        } => cmd_recover(&stego, &key, secret_len, output.as_deref(), &shares),

        Commands::Capacity {
            carrier,
            secret,
            shares,
        } => cmd_capacity(&carrier, &secret, &shares),
    }
}

fn cmd_keygen(key: &Path, bits: usize, public_out: Option<&Path>, force: bool) -> Result<()> {
    if key.exists() && !force {
        bail!("{} already exists (use --force to replace it)", key.display());
    }

    let keys = KeyPair::generate(bits)?;
    keys.save(key)
        .with_context(|| format!("writing {}", key.display()))?;
    if let Some(path) = public_out {
        keys.save_public(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    println!("Generated {}-bit RSA key: {}", bits, key.display());
    println!("  Fingerprint: {}", keys.fingerprint()?);

    Ok(())
}

fn cmd_embed(
    carrier: &Path,
    output: &Path,
    key: &Path,
    secret: &SecretArgs,
    shares: &ShareArgs,
) -> Result<()> {
    let config = shares.resolve()?;
    let secret = secret.read()?;
    let image = load_carrier(carrier)
        .with_context(|| format!("loading carrier {}", carrier.display()))?;
    let keys = KeyPair::load_or_generate(key, config.key_bits)?;

    let pipeline = StegoPipeline::new(config, keys)?;
    let embedded = pipeline.embed(&secret, &image)?;

    let artifacts = StegoArtifacts::from_base(output);
    artifacts.save(&embedded.image, &embedded.encrypted_columns)?;

    println!("Embedded {} bytes", secret.len());
    println!("  Stego image:  {}", artifacts.image_path.display());
    println!("  Geometry:     {}", artifacts.geometry_path.display());
    println!(
        "  Shares:       {} of {}",
        pipeline.config().threshold,
        pipeline.config().share_count
    );
    println!("  Secret len:   {} (needed for recovery)", secret.len());

    Ok(())
}

fn cmd_recover(
    stego: &Path,
    key: &Path,
    secret_len: usize,
    output: Option<&Path>,
    shares: &ShareArgs,
) -> Result<()> {
    let config = shares.resolve()?;
    let keys = KeyPair::load(key)?;
    let (image, encrypted_columns) = StegoArtifacts::from_base(stego).load()?;

    let pipeline = StegoPipeline::new(config, keys)?;
    let secret = pipeline.recover(&image, &encrypted_columns, secret_len)?;

    match output {
        Some(path) => {
            std::fs::write(path, &secret)?;
            println!("Wrote {} bytes to {}", secret.len(), path.display());
        }
        None => {
            io::stdout().write_all(secret.as_bytes())?;
        }
    }

    Ok(())
}

fn cmd_capacity(carrier: &Path, secret: &SecretArgs, shares: &ShareArgs) -> Result<()> {
    let config = shares.resolve()?;
    let secret = secret.read()?;
    let image = load_carrier(carrier)
        .with_context(|| format!("loading carrier {}", carrier.display()))?;

    let plan = plan(&config, &secret, image.dimensions())?;

    println!("Capacity Plan");
    println!("=============");
    println!("Carrier:          {}x{}", image.width(), image.height());
    println!(
        "Grid:             {} columns x {} rows",
        plan.geometry.columns, plan.geometry.rows
    );
    println!(
        "Block size:       {}x{} ({} pixels)",
        plan.block_size.0,
        plan.block_size.1,
        plan.block_pixels()
    );
    println!("Pixels per byte:  {}", plan.capacity);
    println!("Pixels needed:    {}", plan.required_pixels);

    Ok(())
}
