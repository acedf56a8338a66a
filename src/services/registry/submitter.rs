// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::RegistryError;
use crate::domain::types::{LedgerReceipt, SubmissionRequest, TransactionReceipt};
use crate::infrastructure::data::registry_abi::decode_mint_transfer;
use crate::network::gateway::LedgerGateway;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Submits one state-mutating call and resolves it to a receipt.
///
/// No retries: rejected or reverted transactions go back to the caller as-is,
/// since a resubmission is a new transaction with its own side effects.
#[derive(Clone)]
pub struct TransactionSubmitter {
    gateway: Arc<dyn LedgerGateway>,
    receipt_timeout: Duration,
}

impl TransactionSubmitter {
    pub fn new(gateway: Arc<dyn LedgerGateway>, receipt_timeout: Duration) -> Self {
        Self {
            gateway,
            receipt_timeout,
        }
    }

    pub async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<TransactionReceipt, RegistryError> {
        if request.gas_ceiling == 0 {
            return Err(RegistryError::InvalidGasCeiling {
                operation: request.operation.to_string(),
            });
        }

        let tx_hash = self
            .gateway
            .send(
                request.operation,
                request.contract,
                request.input.clone(),
                request.gas_ceiling,
            )
            .await?;
        tracing::info!(
            target: "submitter",
            operation = request.operation,
            args = %request.arguments,
            gas_ceiling = request.gas_ceiling,
            tx_hash = %format!("{:#x}", tx_hash),
            "Transaction submitted; awaiting inclusion"
        );

        let started = Instant::now();
        let receipt =
            match tokio::time::timeout(self.receipt_timeout, self.gateway.wait_for_receipt(tx_hash))
                .await
            {
                Ok(res) => res?,
                Err(_) => {
                    let waited_ms = started.elapsed().as_millis() as u64;
                    tracing::warn!(
                        target: "submitter",
                        operation = request.operation,
                        tx_hash = %format!("{:#x}", tx_hash),
                        waited_ms,
                        "Inclusion wait timed out; outcome unknown"
                    );
                    return Err(RegistryError::TransactionPending {
                        operation: request.operation.to_string(),
                        tx_hash,
                        waited_ms,
                    });
                }
            };

        self.resolve(&request, receipt)
    }

    fn resolve(
        &self,
        request: &SubmissionRequest,
        receipt: LedgerReceipt,
    ) -> Result<TransactionReceipt, RegistryError> {
        if !receipt.success {
            tracing::warn!(
                target: "submitter",
                operation = request.operation,
                tx_hash = %format!("{:#x}", receipt.tx_hash),
                gas_used = receipt.gas_used,
                gas_ceiling = request.gas_ceiling,
                "Transaction reverted"
            );
            return Err(RegistryError::TransactionReverted {
                operation: request.operation.to_string(),
                tx_hash: receipt.tx_hash,
                gas_used: receipt.gas_used,
            });
        }

        let minted_token_ids = receipt
            .logs
            .iter()
            .filter(|log| log.address == request.contract)
            .filter_map(|log| decode_mint_transfer(&log.topics))
            .map(|(_, token_id)| token_id)
            .collect();

        tracing::info!(
            target: "submitter",
            operation = request.operation,
            tx_hash = %format!("{:#x}", receipt.tx_hash),
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction included"
        );

        Ok(TransactionReceipt {
            operation: request.operation.to_string(),
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            gas_ceiling: request.gas_ceiling,
            minted_token_ids,
        })
    }
}
