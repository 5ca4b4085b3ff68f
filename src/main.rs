//! `seal-sign` command line: generate a key pair, sign a message, verify a signed file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use seal_sign::{HashAlgorithm, KeyKind, SignerConfig, SigningService, Verdict, Verifier};

/// Global level when neither `RUST_LOG` nor `--log-level` is given.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// RSA PKCS#1 v1.5 message signing
#[derive(Parser, Debug)]
#[command(name = "seal-sign")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "SEAL_SIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding public.key / private.key
    #[arg(long)]
    key_dir: Option<PathBuf>,

    /// Directory where signed files are written
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the global level of RUST_LOG
    #[arg(long, env = "SEAL_SIGN_LOG_LEVEL")]
    log_level: Option<Level>,

    /// Log format
    #[arg(long, env = "SEAL_SIGN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Plain,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new key pair, replacing the stored one
    Generate,

    /// Print or copy one stored key (public | private)
    ExportKey {
        kind: KeyKind,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Sign a message with the stored private key
    Sign {
        /// Message text
        #[arg(short, long, required_unless_present = "message_file", conflicts_with = "message_file")]
        message: Option<String>,

        /// Read the message from a file
        #[arg(long)]
        message_file: Option<PathBuf>,

        /// Hash algorithm (sha224, sha256, sha384, sha512)
        #[arg(long)]
        hash: Option<HashAlgorithm>,
    },

    /// Verify a signed file against a public key; exits 1 when the signature does not match
    Verify {
        /// Signed message file
        #[arg(short, long)]
        artifact: PathBuf,

        /// Public key PEM file
        #[arg(short, long)]
        public_key: PathBuf,

        /// Hash algorithm used when signing
        #[arg(long)]
        hash: Option<HashAlgorithm>,
    },
}

/// `RUST_LOG` directives (or the default level), with `--log-level` replacing the
/// global level only when it was given.
fn build_filter(level: Option<Level>, env_directives: Option<&str>) -> Result<EnvFilter> {
    let filter = match env_directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {} directives", EnvFilter::DEFAULT_ENV))?,
        None => EnvFilter::new(DEFAULT_LOG_LEVEL),
    };
    Ok(match level {
        Some(level) => filter.add_directive(level.into()),
        None => filter,
    })
}

fn setup_logging(level: Option<Level>, format: LogFormat) -> Result<()> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, env_directives.as_deref())?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };
    installed.map_err(|e| anyhow::Error::msg(e).context("Failed to set subscriber"))
}

/// Config file, then environment, then command-line flags.
fn build_config(cli: &Cli) -> Result<SignerConfig> {
    let config = match &cli.config {
        Some(path) => SignerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SignerConfig::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(dir) = &cli.key_dir {
        config.key_dir = dir.clone();
    }
    if let Some(dir) = &cli.artifact_dir {
        config.artifact_dir = dir.clone();
    }
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Verification only reads the two supplied files; no store is opened.
fn verify_files(artifact: &Path, public_key: &Path, hash: HashAlgorithm) -> Result<ExitCode> {
    let artifact_text = read_file(artifact)?;
    let verifier = Verifier::from_pem(&read_file(public_key)?)?;
    Ok(match verifier.verify(&artifact_text, hash)? {
        Verdict::Valid => {
            println!("valid: signature matches");
            ExitCode::SUCCESS
        }
        Verdict::Invalid => {
            println!("invalid: signature does not match");
            ExitCode::from(1)
        }
    })
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli)?;

    match cli.command {
        Command::Verify {
            artifact,
            public_key,
            hash,
        } => return verify_files(&artifact, &public_key, hash.unwrap_or(config.default_hash)),
        Command::Generate => {
            let service = SigningService::new(config)?;
            service.generate_key_pair()?;
            println!(
                "Key pair generated in {}",
                service.config().key_dir.display()
            );
        }
        Command::ExportKey { kind, out } => {
            let pem = SigningService::new(config)?.export_key(kind)?;
            match out {
                Some(path) => {
                    fs::write(&path, pem)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("{kind} key written to {}", path.display());
                }
                None => print!("{pem}"),
            }
        }
        Command::Sign {
            message,
            message_file,
            hash,
        } => {
            let message = match (message, message_file) {
                (Some(message), _) => message,
                (None, Some(path)) => read_file(&path)?,
                (None, None) => anyhow::bail!("either --message or --message-file is required"),
            };
            let outcome = SigningService::new(config)?.sign(&message, hash)?;
            println!("Signature ({}):\n{}", outcome.hash, outcome.signature_base64);
            println!("Signed file: {}", outcome.path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = setup_logging(cli.log_level, cli.log_format) {
        eprintln!("warning: {err:#}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<seal_sign::Error>() {
                Some(e) => eprintln!("error: {}", e.user_message()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{Layer, Registry};

    fn max_level(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn test_rust_log_sets_level_without_flag() {
        let filter = build_filter(None, Some("debug")).unwrap();
        assert_eq!(max_level(&filter), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_default_level_is_warn() {
        let filter = build_filter(None, None).unwrap();
        assert_eq!(max_level(&filter), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_flag_sets_level() {
        let filter = build_filter(Some(Level::INFO), None).unwrap();
        assert_eq!(max_level(&filter), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let parsed = Cli::try_parse_from(["seal-sign", "--log-level", "loud", "generate"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from(["seal-sign", "--log-level", "debug", "generate"]).unwrap();
        assert_eq!(parsed.log_level, Some(Level::DEBUG));
    }

    #[test]
    fn test_bad_rust_log_is_an_error() {
        assert!(build_filter(None, Some("seal_sign=loud")).is_err());
    }
}
