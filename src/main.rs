// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use accreditation_orchestrator::app::cli::{Cli, Command};
use accreditation_orchestrator::app::config::GlobalSettings;
use accreditation_orchestrator::app::logging::setup_logging;
use accreditation_orchestrator::domain::constants::REGISTRY_CONTRACT_NAME;
use accreditation_orchestrator::domain::error::AppError;
use accreditation_orchestrator::infrastructure::data::abi::{AbiRegistry, verify_interface};
use accreditation_orchestrator::infrastructure::data::registry_abi::required_operations;
use accreditation_orchestrator::infrastructure::network::gateway::{
    AlloyGateway, GatewaySettings, LedgerGateway,
};
use accreditation_orchestrator::infrastructure::network::provider::{ConnectionFactory, Endpoint};
use accreditation_orchestrator::services::registry::{
    Orchestrator, RegistryClient, RunPlan, TransactionSubmitter,
};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Unknown(anyhow::anyhow!("report serialization failed: {e}")))?;
    println!("{body}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InterfaceReport {
    contract: String,
    artifact: String,
    functions: Vec<String>,
    declared_operations: Vec<&'static str>,
}

/// Loads the artifact (file or truffle build directory) and checks that every
/// declared operation is published.
fn load_interface(path: &Path) -> Result<InterfaceReport, AppError> {
    let mut abis = AbiRegistry::new();
    let contract = if path.is_dir() {
        abis.load_from_directory(&path.to_string_lossy())?;
        REGISTRY_CONTRACT_NAME.to_string()
    } else {
        abis.load_file(path)?
    };
    let abi = abis.get(&contract).ok_or_else(|| {
        AppError::Config(format!("{contract} not found in {}", path.display()))
    })?;
    verify_interface(&contract, abi)?;
    Ok(InterfaceReport {
        functions: abis.function_signatures(&contract).unwrap_or_default(),
        contract,
        artifact: path.display().to_string(),
        declared_operations: required_operations().into_iter().map(|(sig, _)| sig).collect(),
    })
}

async fn connect_gateway(settings: &GlobalSettings) -> Result<Arc<AlloyGateway>, AppError> {
    let signer = PrivateKeySigner::from_str(settings.wallet_key.trim())
        .map_err(|e| AppError::Config(format!("Invalid wallet key: {}", e)))?;
    if let Some(expected) = settings.wallet_address
        && expected != signer.address()
    {
        return Err(AppError::Config(format!(
            "wallet_address {} does not match wallet_key address {}",
            expected,
            signer.address()
        )));
    }

    let endpoint = Endpoint::parse(&settings.rpc_url)?;
    let provider = ConnectionFactory::connect(&endpoint).await?;
    let chain_id = match settings.chain_id {
        Some(id) => id,
        None => provider
            .get_chain_id()
            .await
            .map_err(|e| AppError::Connection(format!("chain_id detect failed: {e}")))?,
    };

    tracing::info!(
        target: "config",
        chain_id,
        rpc = %settings.rpc_url,
        signer = %format!("{:#x}", signer.address()),
        fee_mode = ?settings.fee_mode(),
        "Gateway ready"
    );

    Ok(Arc::new(AlloyGateway::new(
        provider,
        signer,
        GatewaySettings {
            chain_id,
            fee_mode: settings.fee_mode(),
            receipt_poll: Duration::from_millis(settings.receipt_poll_ms_value()),
            confirm_blocks: settings.receipt_confirm_blocks_value(),
        },
    )))
}

async fn build_orchestrator(
    settings: &GlobalSettings,
    gateway: Arc<AlloyGateway>,
) -> Result<Orchestrator, AppError> {
    let registry = settings.registry_address()?;
    if !gateway.has_code(registry).await? {
        return Err(AppError::Initialization(format!(
            "no contract code at registry address {registry:#x} on chain {}",
            gateway.chain_id()
        )));
    }
    if let Some(path) = settings.artifact_path() {
        load_interface(&path)?;
    } else {
        tracing::debug!(target: "config", "No registry artifact configured; skipping interface check");
    }

    let submitter = TransactionSubmitter::new(
        gateway.clone(),
        Duration::from_millis(settings.receipt_timeout_ms_value()),
    );
    let client = RegistryClient::new(gateway, registry, submitter);
    Ok(Orchestrator::new(client, settings.gas_ceiling)
        .with_enforce_roles(settings.enforce_roles)
        .with_per_recipient_gas(settings.per_recipient_gas_value()))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);
    setup_logging(settings.log_level(), settings.log_json);

    if cli.needs_registry() {
        settings.registry_address()?;
    }

    if let Command::Interface = cli.command {
        let path = settings.artifact_path().ok_or_else(|| {
            AppError::Config("REGISTRY_ARTIFACT_PATH is missing and no build artifact found".into())
        })?;
        return print_json(&load_interface(&path)?);
    }

    let gateway = connect_gateway(&settings).await?;

    if let Command::Status { tx_hash } = cli.command {
        let info = gateway.get_transaction(tx_hash).await?;
        if info.is_none() {
            tracing::warn!(target: "driver", tx_hash = %format!("{:#x}", tx_hash), "Transaction unknown to the node");
        }
        return print_json(&info);
    }

    let orchestrator = build_orchestrator(&settings, gateway).await?;
    let class = settings.accreditation_class();

    match cli.command {
        Command::Run { .. } => {
            let plan = RunPlan {
                class,
                single_recipients: settings.single_recipients.clone(),
                batch_recipients: settings.batch_recipients.clone(),
                inspect: settings.inspect_addresses.clone(),
            };
            if !plan.has_mints() {
                tracing::warn!(target: "driver", "No recipients configured; run will only read state");
            }
            let report = orchestrator.run(&plan).await;
            print_json(&report)?;
            if let Some(failure) = report.failure {
                return Err(AppError::Unknown(anyhow::anyhow!(
                    "run stopped at {} ({}): {}",
                    failure.step,
                    failure.operation,
                    failure.error
                )));
            }
            Ok(())
        }
        Command::Check { .. } => {
            let pre = orchestrator
                .check_preconditions(class)
                .await
                .map_err(|(_, e)| AppError::Registry(e))?;
            print_json(&pre)
        }
        Command::Mint { to, .. } => print_json(&orchestrator.mint_one(class, to).await?),
        Command::MintBatch { to, .. } => print_json(&orchestrator.mint_batch(class, &to).await?),
        Command::Holdings { owners } => {
            let mut snapshots = Vec::with_capacity(owners.len());
            for owner in owners {
                snapshots.push(orchestrator.holdings(owner).await?);
            }
            print_json(&snapshots)
        }
        Command::Status { .. } | Command::Interface => Ok(()),
    }
}
