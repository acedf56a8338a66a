// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::RegistryError;
use crate::domain::types::{HoldingEntry, HoldingsSnapshot, TokenId};
use crate::services::registry::client::RegistryClient;
use alloy::primitives::Address;
use std::collections::HashSet;

/// Walks an owner's tokens by index, strictly one round trip at a time so the
/// registry's own index order is preserved.
#[derive(Clone)]
pub struct HoldingsEnumerator {
    client: RegistryClient,
}

/// Cursor over one enumeration. Finite and not resumable: restarting means
/// calling [`HoldingsEnumerator::walk`] again.
pub struct HoldingsWalk<'a> {
    client: &'a RegistryClient,
    owner: Address,
    balance: u64,
    next_index: u64,
    seen: HashSet<TokenId>,
}

impl HoldingsEnumerator {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    /// Reads the balance once; that count bounds the walk.
    pub async fn walk(&self, owner: Address) -> Result<HoldingsWalk<'_>, RegistryError> {
        let raw_balance = self.client.balance_of(owner).await?;
        let balance =
            u64::try_from(raw_balance).map_err(|_| RegistryError::InconsistentEnumeration {
                owner,
                detail: format!("balance {raw_balance} exceeds u64"),
            })?;
        tracing::debug!(target: "holdings", owner = %format!("{:#x}", owner), balance, "Enumerating holdings");
        Ok(HoldingsWalk {
            client: &self.client,
            owner,
            balance,
            next_index: 0,
            seen: HashSet::new(),
        })
    }

    pub async fn snapshot(&self, owner: Address) -> Result<HoldingsSnapshot, RegistryError> {
        let mut walk = self.walk(owner).await?;
        let mut tokens = Vec::new();
        while let Some(entry) = walk.next().await {
            tokens.push(entry?);
        }
        Ok(HoldingsSnapshot {
            owner,
            balance_at_start: walk.balance(),
            tokens,
        })
    }
}

impl HoldingsWalk<'_> {
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// `None` once `balance` entries were produced or after the first error.
    /// An index that vanished mid-walk surfaces as `IndexOutOfRange`.
    pub async fn next(&mut self) -> Option<Result<HoldingEntry, RegistryError>> {
        if self.next_index >= self.balance {
            return None;
        }
        let index = self.next_index;
        let result = self.fetch(index).await;
        self.next_index = if result.is_ok() {
            index + 1
        } else {
            self.balance
        };
        if let Err(e) = &result {
            tracing::warn!(
                target: "holdings",
                owner = %format!("{:#x}", self.owner),
                index,
                balance = self.balance,
                error = %e,
                "Enumeration aborted"
            );
        }
        Some(result)
    }

    async fn fetch(&mut self, index: u64) -> Result<HoldingEntry, RegistryError> {
        let token_id = self
            .client
            .token_of_owner_by_index(self.owner, index)
            .await?;
        if !self.seen.insert(token_id) {
            return Err(RegistryError::InconsistentEnumeration {
                owner: self.owner,
                detail: format!("token {token_id} returned again at index {index}"),
            });
        }
        let uri = self.client.token_uri(token_id).await?;
        Ok(HoldingEntry { uri, token_id })
    }
}
