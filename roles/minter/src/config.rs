use ext_config::{Config, ConfigError, File, FileFormat};
use nft_mint::{BuilderPolicy, RawMintParams, RetryPolicy};
use serde::Deserialize;

/// TOML configuration for one mint rehearsal.
#[derive(Debug, Clone, Deserialize)]
pub struct MinterConfig {
    /// Public address of the wallet that will sign the real mint.
    pub signer_address: String,
    /// Raw mint parameters, validated before anything runs.
    pub mint: RawMintParams,
    #[serde(default)]
    pub policy: BuilderPolicy,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub rehearsal: RehearsalConfig,
}

/// Failure injection for the dry run, to watch the retry handling work
/// before any real submission is on the line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RehearsalConfig {
    /// Inject this many transient failures into the metadata step.
    pub metadata_transient_failures: u32,
}

impl MinterConfig {
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::new(path, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
