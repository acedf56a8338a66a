// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::error::RegistryError;
use crate::domain::types::{LedgerReceipt, ReceiptLog, TransactionInfo};
use crate::network::provider::LedgerProvider;
use alloy::consensus::{SignableTransaction, Transaction as ConsensusTxTrait, TxEip1559, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::{TransactionResponse, TxSignerSync};
use alloy::primitives::{Address, B256, Bytes, TxKind, U256};
use alloy::providers::Provider;
use alloy::rpc::types::eth::{TransactionInput, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::{RpcError, TransportErrorKind};
use alloy_consensus::TxEnvelope;
use alloy_sol_types::decode_revert_reason;
use async_trait::async_trait;
use std::time::Duration;

/// The external ledger as seen by the client: read-only calls, signed
/// submissions, receipt waits and diagnostic lookups.
///
/// One handle is safe for sequential reuse. Several in-flight submissions from
/// the same signer need nonce coordination this trait does not provide.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Account that signs every `send`.
    fn signer_address(&self) -> Address;

    async fn call(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
    ) -> Result<Bytes, RegistryError>;

    /// Submit a signed transaction; resolves as soon as the gateway admits it.
    async fn send(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
        gas_ceiling: u64,
    ) -> Result<B256, RegistryError>;

    /// Suspends until the ledger reports inclusion. Never times out by itself;
    /// callers bound it.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<LedgerReceipt, RegistryError>;

    async fn get_transaction(&self, tx_hash: B256)
    -> Result<Option<TransactionInfo>, RegistryError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeMode {
    Eip1559,
    Legacy,
}

#[derive(Clone, Debug)]
pub struct GatewaySettings {
    pub chain_id: u64,
    pub fee_mode: FeeMode,
    pub receipt_poll: Duration,
    pub confirm_blocks: u64,
}

/// JSON-RPC gateway signing locally with an injected key.
pub struct AlloyGateway {
    provider: LedgerProvider,
    signer: PrivateKeySigner,
    settings: GatewaySettings,
}

impl AlloyGateway {
    pub fn new(provider: LedgerProvider, signer: PrivateKeySigner, settings: GatewaySettings) -> Self {
        Self {
            provider,
            signer,
            settings,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.settings.chain_id
    }

    pub async fn has_code(&self, contract: Address) -> Result<bool, RegistryError> {
        self.provider
            .get_code_at(contract)
            .await
            .map(|code| !code.is_empty())
            .map_err(|e| RegistryError::GatewayUnavailable(format!("eth_getCode failed: {e}")))
    }

    fn receipt_is_confirmed(current_head: u64, receipt_block: u64, confirm_blocks: u64) -> bool {
        let needed_head = receipt_block.saturating_add(confirm_blocks.saturating_sub(1));
        current_head >= needed_head
    }

    /// A failed head lookup counts as head 0, so the receipt stays unconfirmed
    /// until a later poll succeeds.
    fn confirmation_head<E: std::fmt::Display>(head: Result<u64, E>, tx_hash: B256) -> u64 {
        head.unwrap_or_else(|e| {
            tracing::debug!(
                target: "gateway",
                error = %e,
                tx_hash = %format!("{:#x}", tx_hash),
                "Block number lookup error; polling again"
            );
            0
        })
    }

    /// The signed hash is the one tracked; a node echoing another is logged.
    fn admitted_hash_matches(operation: &str, signed: B256, reported: B256) -> bool {
        if signed == reported {
            return true;
        }
        tracing::warn!(
            target: "gateway",
            operation,
            signed = %format!("{:#x}", signed),
            reported = %format!("{:#x}", reported),
            "Node reported a different transaction hash"
        );
        false
    }

    async fn sign(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
        gas_ceiling: u64,
        nonce: u64,
    ) -> Result<(Vec<u8>, B256), RegistryError> {
        let rejected = |reason: String| RegistryError::TransactionRejected {
            operation: operation.to_string(),
            reason,
        };
        let signed: TxEnvelope = match self.settings.fee_mode {
            FeeMode::Eip1559 => {
                let fees = self
                    .provider
                    .estimate_eip1559_fees()
                    .await
                    .map_err(|e| {
                        RegistryError::GatewayUnavailable(format!("fee estimation failed: {e}"))
                    })?;
                let mut tx = TxEip1559 {
                    chain_id: self.settings.chain_id,
                    nonce,
                    max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
                    max_fee_per_gas: fees.max_fee_per_gas,
                    gas_limit: gas_ceiling,
                    to: TxKind::Call(contract),
                    value: U256::ZERO,
                    access_list: Default::default(),
                    input,
                };
                let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
                    .map_err(|e| rejected(format!("sign tx failed: {e}")))?;
                tx.into_signed(sig).into()
            }
            FeeMode::Legacy => {
                let gas_price = self
                    .provider
                    .get_gas_price()
                    .await
                    .map_err(|e| {
                        RegistryError::GatewayUnavailable(format!("gas price lookup failed: {e}"))
                    })?;
                let mut tx = TxLegacy {
                    chain_id: Some(self.settings.chain_id),
                    nonce,
                    gas_price,
                    gas_limit: gas_ceiling,
                    to: TxKind::Call(contract),
                    value: U256::ZERO,
                    input,
                };
                let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
                    .map_err(|e| rejected(format!("sign tx failed: {e}")))?;
                tx.into_signed(sig).into()
            }
        };
        let raw = signed.encoded_2718();
        Ok((raw, *signed.tx_hash()))
    }
}

/// JSON-RPC error responses mean the node processed the request and refused
/// it; everything else never reached the ledger.
fn rpc_refusal(err: &RpcError<TransportErrorKind>) -> Option<String> {
    match err {
        RpcError::ErrorResp(payload) => {
            let decoded = payload
                .as_revert_data()
                .and_then(|data| decode_revert_reason(&data));
            Some(match decoded {
                Some(reason) => reason,
                None => payload.message.to_string(),
            })
        }
        _ => None,
    }
}

#[async_trait]
impl LedgerGateway for AlloyGateway {
    fn signer_address(&self) -> Address {
        self.signer.address()
    }

    async fn call(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
    ) -> Result<Bytes, RegistryError> {
        let request = TransactionRequest {
            from: Some(self.signer.address()),
            to: Some(TxKind::Call(contract)),
            input: TransactionInput::new(input),
            ..Default::default()
        };
        self.provider.call(request).await.map_err(|e| match rpc_refusal(&e) {
            Some(reason) => RegistryError::CallReverted {
                operation: operation.to_string(),
                reason,
            },
            None => RegistryError::GatewayUnavailable(format!("{operation}: {e}")),
        })
    }

    async fn send(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
        gas_ceiling: u64,
    ) -> Result<B256, RegistryError> {
        let from = self.signer.address();
        let nonce = self
            .provider
            .get_transaction_count(from)
            .pending()
            .await
            .map_err(|e| RegistryError::GatewayUnavailable(format!("nonce lookup failed: {e}")))?;

        let (raw, tx_hash) = self
            .sign(operation, contract, input, gas_ceiling, nonce)
            .await?;

        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| match rpc_refusal(&e) {
                Some(reason) => RegistryError::TransactionRejected {
                    operation: operation.to_string(),
                    reason,
                },
                None => RegistryError::GatewayUnavailable(format!("{operation}: {e}")),
            })?;
        Self::admitted_hash_matches(operation, tx_hash, *pending.tx_hash());

        tracing::debug!(
            target: "gateway",
            operation,
            nonce,
            gas_ceiling,
            tx_hash = %format!("{:#x}", tx_hash),
            "Transaction admitted"
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<LedgerReceipt, RegistryError> {
        let poll = self.settings.receipt_poll;
        let confirm_blocks = self.settings.confirm_blocks.max(1);

        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(rcpt)) => {
                    let block_number = rcpt.block_number;
                    let confirmed = match block_number {
                        Some(receipt_block) if confirm_blocks > 1 => {
                            let head = Self::confirmation_head(
                                self.provider.get_block_number().await,
                                tx_hash,
                            );
                            Self::receipt_is_confirmed(
                                head.max(receipt_block),
                                receipt_block,
                                confirm_blocks,
                            )
                        }
                        _ => true,
                    };
                    if confirmed {
                        let logs = rcpt
                            .inner
                            .logs()
                            .iter()
                            .map(|log| ReceiptLog {
                                address: log.inner.address,
                                topics: log.inner.data.topics().to_vec(),
                                data: log.inner.data.data.clone(),
                            })
                            .collect();
                        return Ok(LedgerReceipt {
                            tx_hash,
                            block_number,
                            gas_used: rcpt.gas_used,
                            success: rcpt.status(),
                            logs,
                        });
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        target: "gateway",
                        error = %e,
                        tx_hash = %format!("{:#x}", tx_hash),
                        "Receipt lookup error; polling again"
                    );
                }
            }

            tokio::time::sleep(poll).await;
        }
    }

    async fn get_transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionInfo>, RegistryError> {
        let tx = self
            .provider
            .get_transaction_by_hash(tx_hash)
            .await
            .map_err(|e| RegistryError::GatewayUnavailable(format!("getTransaction: {e}")))?;
        Ok(tx.map(|tx| TransactionInfo {
            tx_hash,
            from: TransactionResponse::from(&tx),
            to: ConsensusTxTrait::to(&tx),
            nonce: ConsensusTxTrait::nonce(&tx),
            gas_limit: ConsensusTxTrait::gas_limit(&tx),
            block_number: TransactionResponse::block_number(&tx),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_confirmation_depth_window() {
        assert!(AlloyGateway::receipt_is_confirmed(100, 100, 1));
        assert!(!AlloyGateway::receipt_is_confirmed(101, 100, 3));
        assert!(AlloyGateway::receipt_is_confirmed(102, 100, 3));
    }

    #[test]
    fn failed_head_lookup_keeps_receipt_unconfirmed() {
        let tx_hash = B256::repeat_byte(0x11);
        let head = AlloyGateway::confirmation_head(Err::<u64, _>("connection reset"), tx_hash);
        assert_eq!(head, 0);
        assert!(!AlloyGateway::receipt_is_confirmed(head.max(100), 100, 3));
        assert_eq!(AlloyGateway::confirmation_head(Ok::<u64, &str>(105), tx_hash), 105);
    }

    #[test]
    fn admitted_hash_is_compared_with_signed_hash() {
        let signed = B256::repeat_byte(0x22);
        assert!(AlloyGateway::admitted_hash_matches("mintToken", signed, signed));
        assert!(!AlloyGateway::admitted_hash_matches(
            "mintToken",
            signed,
            B256::repeat_byte(0x23)
        ));
    }

    #[test]
    fn error_responses_are_refusals_transport_failures_are_not() {
        let resp: RpcError<TransportErrorKind> = RpcError::ErrorResp(
            serde_json::from_str(r#"{"code":-32000,"message":"nonce too low"}"#)
                .expect("payload"),
        );
        assert_eq!(rpc_refusal(&resp).as_deref(), Some("nonce too low"));

        let transport: RpcError<TransportErrorKind> = TransportErrorKind::backend_gone();
        assert_eq!(rpc_refusal(&transport), None);
    }

    #[test]
    fn revert_data_is_decoded_into_reason() {
        // Error(string) "ERC721Enumerable: owner index out of bounds"
        let data = "0x08c379a0\
            0000000000000000000000000000000000000000000000000000000000000020\
            000000000000000000000000000000000000000000000000000000000000002b\
            455243373231456e756d657261626c653a206f776e657220696e646578206f75\
            74206f6620626f756e6473000000000000000000000000000000000000000000";
        let body = format!(
            r#"{{"code":3,"message":"execution reverted","data":"{data}"}}"#
        );
        let resp: RpcError<TransportErrorKind> =
            RpcError::ErrorResp(serde_json::from_str(&body).expect("payload"));
        let reason = rpc_refusal(&resp).expect("refusal");
        assert!(reason.contains("ERC721Enumerable: owner index out of bounds"));
    }
}
