// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::RegistryError;
use crate::domain::types::{AccreditationClass, BatchMintSummary};
use crate::services::registry::client::RegistryClient;
use alloy::primitives::Address;

/// Mints one class to many recipients in a single transaction under a fixed
/// gas ceiling. The ledger guarantees all-or-nothing; a failed batch is
/// reported whole and never split or retried here.
#[derive(Clone)]
pub struct BatchMinter {
    client: RegistryClient,
    gas_ceiling: u64,
    per_recipient_gas: Option<u64>,
}

impl BatchMinter {
    pub fn new(client: RegistryClient, gas_ceiling: u64) -> Self {
        Self {
            client,
            gas_ceiling,
            per_recipient_gas: None,
        }
    }

    /// Refuse batches whose estimated cost does not fit under the ceiling
    /// instead of letting them revert on-chain.
    pub fn with_per_recipient_gas(mut self, per_recipient_gas: Option<u64>) -> Self {
        self.per_recipient_gas = per_recipient_gas.filter(|g| *g > 0);
        self
    }

    fn check_fits(&self, recipients: usize) -> Result<(), RegistryError> {
        let Some(per_recipient) = self.per_recipient_gas else {
            return Ok(());
        };
        let estimate = per_recipient.saturating_mul(recipients as u64);
        if estimate >= self.gas_ceiling {
            return Err(RegistryError::GasCeilingTooLow {
                gas_ceiling: self.gas_ceiling,
                estimate,
                recipients,
            });
        }
        Ok(())
    }

    pub async fn mint(
        &self,
        class: AccreditationClass,
        recipients: &[Address],
    ) -> Result<BatchMintSummary, RegistryError> {
        if recipients.is_empty() {
            return Err(RegistryError::EmptyBatch { class });
        }
        self.check_fits(recipients.len())?;

        let receipt = self
            .client
            .mint_many(class, recipients, self.gas_ceiling)
            .await?;

        let minted = receipt.minted_token_ids.len();
        if minted != 0 && minted != recipients.len() {
            tracing::warn!(
                target: "batch",
                class = %class,
                recipients = recipients.len(),
                minted,
                tx_hash = %format!("{:#x}", receipt.tx_hash),
                "Minted token count differs from recipient count"
            );
        }

        tracing::info!(
            target: "batch",
            class = %class,
            recipients = recipients.len(),
            gas_used = receipt.gas_used,
            "Batch mint included"
        );

        Ok(BatchMintSummary {
            accreditation_class: class,
            recipient_count: recipients.len(),
            minted,
            gas_used: receipt.gas_used,
            receipt,
        })
    }
}
