//! Hill cipher command line.
//!
//! # Usage
//! ```bash
//! hill keygen --block-length 4 --seed 42 --out key.json
//! hill encrypt --key key.json --text "ATTACK∆AT∆DAWN"
//! hill decrypt --key key.json --text "<ciphertext>"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hill_crypto::keypair::DEFAULT_MAX_ATTEMPTS;
use hill_crypto::{HillCipher, KeyManager, SerializedKey, StringCodec};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "hill")]
#[command(about = "Hill cipher over Z_n with the default 29-symbol alphabet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random invertible key
    Keygen {
        /// Key matrix dimension
        #[arg(long)]
        block_length: usize,

        /// Seed for reproducible keys
        #[arg(long)]
        seed: Option<u64>,

        /// Candidates drawn before giving up
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,

        /// Write the key here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Encrypt text with a stored key
    Encrypt {
        /// Key file written by `keygen`
        #[arg(long)]
        key: PathBuf,

        /// Text over the default alphabet
        #[arg(long)]
        text: String,

        /// Seed for padding and filler symbols
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Decrypt text with a stored key
    Decrypt {
        /// Key file written by `keygen`
        #[arg(long)]
        key: PathBuf,

        /// Ciphertext over the default alphabet
        #[arg(long)]
        text: String,

        /// Seed for padding and filler symbols
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn load_cipher(path: &Path) -> Result<HillCipher> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading key file {}", path.display()))?;
    let serialized = SerializedKey::from_json(&data)
        .with_context(|| format!("parsing key file {}", path.display()))?;
    let keys = KeyManager::from_serialized(&serialized).context("loading key")?;

    log::debug!(
        "loaded {}x{} key over Z_{}",
        keys.block_length(),
        keys.block_length(),
        keys.ring().modulus()
    );

    Ok(HillCipher::from_key_manager(StringCodec::new()?, keys)?)
}

fn keygen(
    block_length: usize,
    seed: Option<u64>,
    max_attempts: usize,
    out: Option<PathBuf>,
) -> Result<()> {
    let codec = StringCodec::new()?;
    let mut keys = KeyManager::new(codec.ring().clone(), block_length)?
        .with_max_attempts(max_attempts);
    keys.generate(&mut rng_from(seed))
        .context("generating key")?;

    let json = keys.to_serialized()?.to_json()?;
    match out {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("writing key file {}", path.display()))?;
            log::info!("key written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen {
            block_length,
            seed,
            max_attempts,
            out,
        } => keygen(block_length, seed, max_attempts, out)?,
        Commands::Encrypt { key, text, seed } => {
            let cipher = load_cipher(&key)?;
            let ciphertext = cipher
                .encrypt(&text, &mut rng_from(seed))
                .context("encrypting")?;
            println!("{ciphertext}");
        }
        Commands::Decrypt { key, text, seed } => {
            let cipher = load_cipher(&key)?;
            let plaintext = cipher
                .decrypt(&text, &mut rng_from(seed))
                .context("decrypting")?;
            println!("{plaintext}");
        }
    }

    Ok(())
}
