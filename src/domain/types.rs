// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, B256, Bytes, U256};
use serde::{Serialize, Serializer};

/// Groups tokens minted for the same accreditation purpose.
pub type AccreditationClass = U256;

/// Assigned by the registry at mint time, never chosen by this client.
pub type TokenId = U256;

pub fn serialize_u256_dec<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn serialize_u256_dec_vec<S: Serializer>(
    values: &[U256],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| v.to_string()))
}

/// A state-mutating call bound to an operation name, its arguments and a gas
/// ceiling. Lives only for the duration of one submission.
#[derive(Clone, Debug)]
pub struct SubmissionRequest {
    pub operation: &'static str,
    /// Human readable argument summary for logs and reports.
    pub arguments: String,
    pub contract: Address,
    pub input: Bytes,
    pub gas_ceiling: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// What the ledger reports once a transaction is included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
    pub logs: Vec<ReceiptLog>,
}

/// Outcome of a successfully included submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub operation: String,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub gas_ceiling: u64,
    #[serde(serialize_with = "serialize_u256_dec_vec")]
    pub minted_token_ids: Vec<TokenId>,
}

/// Diagnostic view of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub tx_hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub gas_limit: u64,
    pub block_number: Option<u64>,
}

impl TransactionInfo {
    pub fn is_included(&self) -> bool {
        self.block_number.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingEntry {
    pub uri: String,
    #[serde(serialize_with = "serialize_u256_dec")]
    pub token_id: TokenId,
}

/// Ordered `{tokenId, uri}` pairs for one owner, valid only at the instant it
/// was assembled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSnapshot {
    pub owner: Address,
    pub balance_at_start: u64,
    pub tokens: Vec<HoldingEntry>,
}

impl HoldingsSnapshot {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_ids(&self) -> Vec<TokenId> {
        self.tokens.iter().map(|t| t.token_id).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMintSummary {
    #[serde(serialize_with = "serialize_u256_dec")]
    pub accreditation_class: AccreditationClass,
    pub recipient_count: usize,
    /// Mint `Transfer` logs found in the receipt; differs from
    /// `recipient_count` only when the registry misbehaves.
    pub minted: usize,
    pub gas_used: u64,
    pub receipt: TransactionReceipt,
}
