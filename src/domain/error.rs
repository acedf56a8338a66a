// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Contract interface mismatch for {contract}: missing {missing}")]
    InterfaceMismatch { contract: String, missing: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Failures surfaced by the registry workflow. Every variant propagates
/// unchanged to the driver; nothing here is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Call {operation} reverted: {reason}")]
    CallReverted { operation: String, reason: String },

    #[error("Transaction {operation} rejected by gateway: {reason}")]
    TransactionRejected { operation: String, reason: String },

    #[error("Transaction {tx_hash:#x} ({operation}) reverted after using {gas_used} gas")]
    TransactionReverted {
        operation: String,
        tx_hash: B256,
        gas_used: u64,
    },

    #[error("Transaction {tx_hash:#x} ({operation}) still pending after {waited_ms}ms")]
    TransactionPending {
        operation: String,
        tx_hash: B256,
        waited_ms: u64,
    },

    #[error("Index {index} out of range for owner {owner:#x}: {reason}")]
    IndexOutOfRange {
        owner: Address,
        index: u64,
        reason: String,
    },

    #[error("Batch mint for class {class} has no recipients")]
    EmptyBatch { class: U256 },

    #[error("Gas ceiling must be positive for {operation}")]
    InvalidGasCeiling { operation: String },

    #[error("Gas ceiling {gas_ceiling} below estimate {estimate} for {recipients} recipients")]
    GasCeilingTooLow {
        gas_ceiling: u64,
        estimate: u64,
        recipients: usize,
    },

    #[error("Registry is paused; {operation} not submitted")]
    RegistryPaused { operation: String },

    #[error("{account:#x} lacks {role} role; {operation} not submitted")]
    MissingRole {
        operation: String,
        account: Address,
        role: String,
    },

    #[error("Failed to decode {operation} result: {reason}")]
    AbiDecode { operation: String, reason: String },

    #[error("Inconsistent enumeration for {owner:#x}: {detail}")]
    InconsistentEnumeration { owner: Address, detail: String },
}

impl RegistryError {
    /// Only transport failures are safe for an operator to simply re-issue.
    pub fn is_transport(&self) -> bool {
        matches!(self, RegistryError::GatewayUnavailable(_))
    }

    /// Outcome is unknown and must be re-queried rather than treated as a failure.
    pub fn is_pending(&self) -> bool {
        matches!(self, RegistryError::TransactionPending { .. })
    }

    pub fn pending_hash(&self) -> Option<B256> {
        match self {
            RegistryError::TransactionPending { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}
