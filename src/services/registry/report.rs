// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::RegistryError;
use crate::domain::types::{
    AccreditationClass, HoldingsSnapshot, TransactionInfo, TransactionReceipt, serialize_u256_dec,
    serialize_u256_dec_vec,
};
use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    pub paused: bool,
    pub is_admin: bool,
    pub is_minter: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MintKind {
    Single,
    Batch,
}

/// One included mint as the operator sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintOutcome {
    pub kind: MintKind,
    pub recipient_count: usize,
    pub gas_used: u64,
    pub gas_ceiling: u64,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    #[serde(serialize_with = "serialize_u256_dec_vec")]
    pub minted_token_ids: Vec<U256>,
}

impl MintOutcome {
    pub fn from_receipt(kind: MintKind, recipient_count: usize, receipt: &TransactionReceipt) -> Self {
        Self {
            kind,
            recipient_count,
            gas_used: receipt.gas_used,
            gas_ceiling: receipt.gas_ceiling,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            minted_token_ids: receipt.minted_token_ids.clone(),
        }
    }
}

/// The step that stopped a run, with enough context to diagnose it without
/// looking at transport internals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFailure {
    pub step: String,
    pub operation: String,
    pub arguments: String,
    pub error: String,
    pub kind: &'static str,
    /// Set when the step timed out waiting for inclusion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_transaction: Option<TransactionInfo>,
}

impl StepFailure {
    pub fn new(step: &str, operation: &str, arguments: String, error: &RegistryError) -> Self {
        Self {
            step: step.to_string(),
            operation: operation.to_string(),
            arguments,
            error: error.to_string(),
            kind: error_kind(error),
            pending_transaction: None,
        }
    }
}

pub fn error_kind(error: &RegistryError) -> &'static str {
    match error {
        RegistryError::GatewayUnavailable(_) => "GatewayUnavailable",
        RegistryError::CallReverted { .. } => "CallReverted",
        RegistryError::TransactionRejected { .. } => "TransactionRejected",
        RegistryError::TransactionReverted { .. } => "TransactionReverted",
        RegistryError::TransactionPending { .. } => "TransactionPending",
        RegistryError::IndexOutOfRange { .. } => "IndexOutOfRange",
        RegistryError::EmptyBatch { .. } => "EmptyBatch",
        RegistryError::InvalidGasCeiling { .. } => "InvalidGasCeiling",
        RegistryError::GasCeilingTooLow { .. } => "GasCeilingTooLow",
        RegistryError::RegistryPaused { .. } => "RegistryPaused",
        RegistryError::MissingRole { .. } => "MissingRole",
        RegistryError::AbiDecode { .. } => "AbiDecode",
        RegistryError::InconsistentEnumeration { .. } => "InconsistentEnumeration",
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub registry: Address,
    pub signer: Address,
    #[serde(serialize_with = "serialize_u256_dec")]
    pub accreditation_class: AccreditationClass,
    pub preconditions: Option<Preconditions>,
    pub mints: Vec<MintOutcome>,
    pub holdings: Vec<HoldingsSnapshot>,
    pub failure: Option<StepFailure>,
}

impl RunReport {
    pub fn new(registry: Address, signer: Address, class: AccreditationClass) -> Self {
        Self {
            generated_at: Utc::now(),
            registry,
            signer,
            accreditation_class: class,
            preconditions: None,
            mints: Vec::new(),
            holdings: Vec::new(),
            failure: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::HoldingEntry;

    #[test]
    fn holdings_render_as_ordered_uri_token_records() {
        let mut report = RunReport::new(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            U256::from(100u64),
        );
        report.holdings.push(HoldingsSnapshot {
            owner: Address::repeat_byte(3),
            balance_at_start: 2,
            tokens: vec![
                HoldingEntry {
                    uri: "ipfs://one".into(),
                    token_id: U256::from(7u64),
                },
                HoldingEntry {
                    uri: "ipfs://two".into(),
                    token_id: U256::from(9u64),
                },
            ],
        });
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["accreditationClass"], "100");
        let tokens = &json["holdings"][0]["tokens"];
        assert_eq!(tokens[0]["uri"], "ipfs://one");
        assert_eq!(tokens[0]["tokenId"], "7");
        assert_eq!(tokens[1]["tokenId"], "9");
        assert!(json["failure"].is_null());
    }

    #[test]
    fn failure_carries_kind_and_context() {
        let err = RegistryError::RegistryPaused {
            operation: "mintToken".into(),
        };
        let failure = StepFailure::new("mint", "mintToken", "class=100".into(), &err);
        let json = serde_json::to_value(&failure).expect("serialize");
        assert_eq!(json["kind"], "RegistryPaused");
        assert_eq!(json["arguments"], "class=100");
        assert!(json.get("pendingTransaction").is_none());
    }
}
