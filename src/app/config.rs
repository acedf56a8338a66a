// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::parsing::parse_address_list;
use crate::domain::constants;
use crate::domain::error::AppError;
use crate::network::gateway::FeeMode;
use alloy::primitives::{Address, U256};
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub log_json: bool,

    // Network
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Detected from the node when absent.
    pub chain_id: Option<u64>,
    #[serde(default = "default_false")]
    pub legacy_transactions: bool,

    // Identity
    pub wallet_key: String,
    pub wallet_address: Option<Address>,

    // Registry
    pub registry_address: Option<Address>,
    /// Truffle artifact (`{"abi": [...]}`) or bare ABI array.
    pub registry_artifact_path: Option<String>,
    #[serde(default = "default_accreditation_class")]
    pub accreditation_class: u64,
    #[serde(default = "default_true")]
    pub enforce_roles: bool,

    // Workflow
    #[serde(default, deserialize_with = "deserialize_address_list")]
    pub single_recipients: Vec<Address>,
    #[serde(default, deserialize_with = "deserialize_address_list")]
    pub batch_recipients: Vec<Address>,
    #[serde(default, deserialize_with = "deserialize_address_list")]
    pub inspect_addresses: Vec<Address>,

    // Transaction
    #[serde(default = "default_gas_ceiling")]
    pub gas_ceiling: u64,
    pub per_recipient_gas: Option<u64>,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    #[serde(default = "default_receipt_timeout_ms")]
    pub receipt_timeout_ms: u64,
    #[serde(default = "default_receipt_confirm_blocks")]
    pub receipt_confirm_blocks: u64,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_rpc_url() -> String {
    constants::DEFAULT_RPC_URL.to_string()
}
fn default_accreditation_class() -> u64 {
    constants::DEFAULT_ACCREDITATION_CLASS
}
fn default_gas_ceiling() -> u64 {
    constants::DEFAULT_GAS_CEILING
}
fn default_receipt_poll_ms() -> u64 {
    constants::DEFAULT_RECEIPT_POLL_MS
}
fn default_receipt_timeout_ms() -> u64 {
    constants::DEFAULT_RECEIPT_TIMEOUT_MS
}
fn default_receipt_confirm_blocks() -> u64 {
    constants::DEFAULT_RECEIPT_CONFIRM_BLOCKS
}

fn deserialize_address_list<'de, D>(deserializer: D) -> Result<Vec<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, SeqAccess, Visitor};
    use std::fmt;

    struct AddressListVisitor;

    impl<'de> Visitor<'de> for AddressListVisitor {
        type Value = Vec<Address>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a sequence of addresses or a comma-separated string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            parse_address_list(v).map_err(|bad| E::custom(format!("invalid address '{bad}'")))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(elem) = seq.next_element::<String>()? {
                let mut parsed = parse_address_list(&elem)
                    .map_err(|bad| A::Error::custom(format!("invalid address '{bad}'")))?;
                out.append(&mut parsed);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(AddressListVisitor)
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let selected_config = resolve_config_path(path);
        let mut builder = Config::builder();

        if let Some(ref selected_path) = selected_config {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // CLI (in main) > env/.env > selected profile file.
        builder = builder.add_source(Environment::default());

        let mut settings: GlobalSettings = builder.build()?.try_deserialize()?;

        // Short alias kept for operators used to a single recipient list.
        if let Ok(raw) = std::env::var("RECIPIENTS") {
            settings.single_recipients = parse_address_list(&raw)
                .map_err(|bad| AppError::InvalidAddress(bad.to_string()))?;
        }

        if settings.wallet_key.trim().is_empty() {
            return Err(AppError::Config("WALLET_KEY is missing".to_string()));
        }
        if settings.gas_ceiling == 0 {
            return Err(AppError::Config("gas_ceiling must be positive".to_string()));
        }

        tracing::debug!(
            target: "config",
            file = selected_config.as_deref().unwrap_or("<none>"),
            rpc = %settings.rpc_url,
            "Settings loaded"
        );
        Ok(settings)
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    pub fn registry_address(&self) -> Result<Address, AppError> {
        self.registry_address
            .ok_or_else(|| AppError::Config("REGISTRY_ADDRESS is missing".to_string()))
    }

    pub fn accreditation_class(&self) -> U256 {
        U256::from(self.accreditation_class)
    }

    /// Configured artifact, else the truffle build output when it exists.
    pub fn artifact_path(&self) -> Option<PathBuf> {
        if let Some(path) = self
            .registry_artifact_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            return Some(PathBuf::from(path));
        }
        let fallback = Path::new(constants::DEFAULT_ARTIFACT_DIR)
            .join(format!("{}.json", constants::REGISTRY_CONTRACT_NAME));
        fallback.exists().then_some(fallback)
    }

    pub fn fee_mode(&self) -> FeeMode {
        if self.legacy_transactions {
            FeeMode::Legacy
        } else {
            FeeMode::Eip1559
        }
    }

    pub fn per_recipient_gas_value(&self) -> Option<u64> {
        self.per_recipient_gas.filter(|g| *g > 0)
    }

    pub fn receipt_poll_ms_value(&self) -> u64 {
        self.receipt_poll_ms.max(constants::MIN_RECEIPT_POLL_MS)
    }

    pub fn receipt_timeout_ms_value(&self) -> u64 {
        self.receipt_timeout_ms.max(self.receipt_poll_ms_value())
    }

    pub fn receipt_confirm_blocks_value(&self) -> u64 {
        self.receipt_confirm_blocks.max(1)
    }
}

fn resolve_config_path(path: Option<&str>) -> Option<String> {
    if let Some(path) = path {
        return Some(path.to_string());
    }
    detect_active_config_file()
}

/// Named profiles win over whatever else sits in the working directory.
const PROFILE_PRIORITY: [&str; 5] = [
    "config.prod.toml",
    "config.dev.toml",
    "config.testnet.toml",
    "config.local.toml",
    "config.toml",
];

fn detect_active_config_file() -> Option<String> {
    let mut scanned: Vec<String> = fs::read_dir(".")
        .map(|entries| {
            entries
                .flatten()
                .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                .filter(|name| name.starts_with("config.") && name.ends_with(".toml"))
                .collect()
        })
        .unwrap_or_default();
    scanned.sort();

    PROFILE_PRIORITY
        .iter()
        .map(|name| name.to_string())
        .chain(scanned)
        .find(|candidate| is_active_profile(Path::new(candidate)))
}

/// A profile is active when it sets `THIS_ACTIVE = true`.
fn is_active_profile(path: &Path) -> bool {
    path.is_file()
        && Config::builder()
            .add_source(File::from(path))
            .build()
            .ok()
            .and_then(|cfg| cfg.get_bool("THIS_ACTIVE").ok())
            .unwrap_or(false)
}
