// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::app::config::GlobalSettings;
use crate::common::parsing::{parse_address_hex, parse_b256_hex};
use alloy::primitives::{Address, B256};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "accreditation registry orchestrator")]
pub struct Cli {
    /// Path to config file (default: active config.*.toml, else config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// RPC endpoint: http(s)://, ws(s):// or an IPC socket path
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Registry contract address (overrides config/env)
    #[arg(long, global = true, value_parser = parse_address_arg)]
    pub registry: Option<Address>,

    /// Gas ceiling for every mint transaction
    #[arg(long, global = true)]
    pub gas_ceiling: Option<u64>,

    /// How long to wait for inclusion before reporting the transaction as pending
    #[arg(long, global = true)]
    pub receipt_timeout_ms: Option<u64>,

    /// Submit mints even when the signer lacks the minter role
    #[arg(long, global = true, default_value_t = false)]
    pub no_enforce_roles: bool,

    /// Emit JSON logs on stderr
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClassArg {
    /// Accreditation class (overrides config/env)
    #[arg(long)]
    pub class: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Preconditions, configured mints, then holdings of every recipient
    Run {
        #[command(flatten)]
        class: ClassArg,
        /// Single-mint recipients (replaces the configured list)
        #[arg(long = "to", value_delimiter = ',', value_parser = parse_address_arg)]
        single: Vec<Address>,
        /// Batch recipients (replaces the configured list)
        #[arg(long = "batch", value_delimiter = ',', value_parser = parse_address_arg)]
        batch: Vec<Address>,
        /// Owners to enumerate afterwards (default: all recipients)
        #[arg(long, value_delimiter = ',', value_parser = parse_address_arg)]
        inspect: Vec<Address>,
    },
    /// Read pause state and the signer's roles
    Check {
        #[command(flatten)]
        class: ClassArg,
    },
    /// Mint one token to one recipient
    Mint {
        #[command(flatten)]
        class: ClassArg,
        #[arg(long, value_parser = parse_address_arg)]
        to: Address,
    },
    /// Mint one token to each recipient in a single transaction
    MintBatch {
        #[command(flatten)]
        class: ClassArg,
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',', value_parser = parse_address_arg)]
        to: Vec<Address>,
    },
    /// Enumerate tokens held by one or more owners
    Holdings {
        #[arg(required = true, value_parser = parse_address_arg)]
        owners: Vec<Address>,
    },
    /// Look up a submitted transaction
    Status {
        #[arg(value_parser = parse_tx_hash_arg)]
        tx_hash: B256,
    },
    /// List the functions of the registry artifact and check the declared operations
    Interface,
}

fn parse_address_arg(raw: &str) -> Result<Address, String> {
    parse_address_hex(raw).ok_or_else(|| format!("invalid address '{raw}'"))
}

fn parse_tx_hash_arg(raw: &str) -> Result<B256, String> {
    parse_b256_hex(raw).ok_or_else(|| format!("invalid transaction hash '{raw}'"))
}

impl Cli {
    /// CLI flags take precedence over env and the config file.
    pub fn apply_overrides(&self, settings: &mut GlobalSettings) {
        if let Some(url) = &self.rpc_url {
            settings.rpc_url = url.clone();
        }
        if let Some(registry) = self.registry {
            settings.registry_address = Some(registry);
        }
        if let Some(ceiling) = self.gas_ceiling.filter(|g| *g > 0) {
            settings.gas_ceiling = ceiling;
        }
        if let Some(timeout) = self.receipt_timeout_ms {
            settings.receipt_timeout_ms = timeout;
        }
        if self.no_enforce_roles {
            settings.enforce_roles = false;
        }
        if self.json_logs {
            settings.log_json = true;
        }
        if self.debug {
            settings.debug = true;
        }

        let class = match &self.command {
            Command::Run { class, .. }
            | Command::Check { class }
            | Command::Mint { class, .. }
            | Command::MintBatch { class, .. } => class.class,
            _ => None,
        };
        if let Some(class) = class {
            settings.accreditation_class = class;
        }

        if let Command::Run {
            single,
            batch,
            inspect,
            ..
        } = &self.command
        {
            if !single.is_empty() {
                settings.single_recipients = single.clone();
            }
            if !batch.is_empty() {
                settings.batch_recipients = batch.clone();
            }
            if !inspect.is_empty() {
                settings.inspect_addresses = inspect.clone();
            }
        }
    }

    /// Only commands that touch the registry need its address and a live signer.
    pub fn needs_registry(&self) -> bool {
        !matches!(self.command, Command::Status { .. } | Command::Interface)
    }
}
