// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::RegistryError;
use crate::domain::types::{
    AccreditationClass, SubmissionRequest, TokenId, TransactionInfo, TransactionReceipt,
};
use crate::infrastructure::data::registry_abi::XAccreditationRegistry;
use crate::network::gateway::LedgerGateway;
use crate::services::registry::submitter::TransactionSubmitter;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;

/// Typed view of the registry contract. Every method is a fresh round trip;
/// nothing read here is cached.
#[derive(Clone)]
pub struct RegistryClient {
    gateway: Arc<dyn LedgerGateway>,
    registry: Address,
    submitter: TransactionSubmitter,
}

fn format_addresses(addrs: &[Address]) -> String {
    addrs
        .iter()
        .map(|a| format!("{a:#x}"))
        .collect::<Vec<_>>()
        .join(",")
}

impl RegistryClient {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        registry: Address,
        submitter: TransactionSubmitter,
    ) -> Self {
        Self {
            gateway,
            registry,
            submitter,
        }
    }

    pub fn registry(&self) -> Address {
        self.registry
    }

    pub fn signer(&self) -> Address {
        self.gateway.signer_address()
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<C::Return, RegistryError> {
        let raw = self
            .gateway
            .call(C::SIGNATURE, self.registry, Bytes::from(call.abi_encode()))
            .await?;
        C::abi_decode_returns(&raw).map_err(|e| RegistryError::AbiDecode {
            operation: C::SIGNATURE.to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn is_paused(&self) -> Result<bool, RegistryError> {
        self.read(XAccreditationRegistry::pausedCall {}).await
    }

    pub async fn has_admin_role(&self, account: Address) -> Result<bool, RegistryError> {
        self.read(XAccreditationRegistry::isAdminCall { account })
            .await
    }

    /// Minter role is scoped per accreditation class.
    pub async fn has_minter_role(
        &self,
        class: AccreditationClass,
        account: Address,
    ) -> Result<bool, RegistryError> {
        self.read(XAccreditationRegistry::isAccreditationMinterCall {
            accreditationId: class,
            account,
        })
        .await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256, RegistryError> {
        self.read(XAccreditationRegistry::balanceOfCall { owner })
            .await
    }

    /// The only revert path of an enumerable `tokenOfOwnerByIndex` is an
    /// index past the owner's balance.
    pub async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: u64,
    ) -> Result<TokenId, RegistryError> {
        self.read(XAccreditationRegistry::tokenOfOwnerByIndexCall {
            owner,
            index: U256::from(index),
        })
        .await
        .map_err(|e| match e {
            RegistryError::CallReverted { reason, .. } => RegistryError::IndexOutOfRange {
                owner,
                index,
                reason,
            },
            other => other,
        })
    }

    pub async fn token_uri(&self, token_id: TokenId) -> Result<String, RegistryError> {
        self.read(XAccreditationRegistry::tokenURICall { tokenId: token_id })
            .await
    }

    pub fn mint_one_request(
        &self,
        class: AccreditationClass,
        recipient: Address,
        gas_ceiling: u64,
    ) -> SubmissionRequest {
        let call = XAccreditationRegistry::mintTokenCall {
            accreditationId: class,
            to: recipient,
        };
        SubmissionRequest {
            operation: "mintToken",
            arguments: format!("class={class} to={recipient:#x}"),
            contract: self.registry,
            input: Bytes::from(call.abi_encode()),
            gas_ceiling,
        }
    }

    /// Duplicates are passed through; the registry decides what they mean.
    pub fn mint_many_request(
        &self,
        class: AccreditationClass,
        recipients: &[Address],
        gas_ceiling: u64,
    ) -> SubmissionRequest {
        let call = XAccreditationRegistry::mintAccreditationToManyUsersCall {
            accreditationId: class,
            to: recipients.to_vec(),
        };
        SubmissionRequest {
            operation: "mintAccreditationToManyUsers",
            arguments: format!(
                "class={class} recipients={} [{}]",
                recipients.len(),
                format_addresses(recipients)
            ),
            contract: self.registry,
            input: Bytes::from(call.abi_encode()),
            gas_ceiling,
        }
    }

    pub async fn mint_one(
        &self,
        class: AccreditationClass,
        recipient: Address,
        gas_ceiling: u64,
    ) -> Result<TransactionReceipt, RegistryError> {
        self.submitter
            .submit(self.mint_one_request(class, recipient, gas_ceiling))
            .await
    }

    pub async fn mint_many(
        &self,
        class: AccreditationClass,
        recipients: &[Address],
        gas_ceiling: u64,
    ) -> Result<TransactionReceipt, RegistryError> {
        if recipients.is_empty() {
            return Err(RegistryError::EmptyBatch { class });
        }
        self.submitter
            .submit(self.mint_many_request(class, recipients, gas_ceiling))
            .await
    }

    pub async fn transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionInfo>, RegistryError> {
        self.gateway.get_transaction(tx_hash).await
    }
}
