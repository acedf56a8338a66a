// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! In-process registry standing in for the ledger in tests. Decodes calldata
//! against the declared interface and mimics ERC-721 enumerable semantics,
//! gas exhaustion included.

use crate::common::error::RegistryError;
use crate::domain::types::{LedgerReceipt, ReceiptLog, TransactionInfo};
use crate::infrastructure::data::registry_abi::XAccreditationRegistry;
use crate::network::gateway::LedgerGateway;
use alloy::primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub(crate) const MINT_ONE_GAS: u64 = 120_000;
pub(crate) const BATCH_BASE_GAS: u64 = 45_000;
pub(crate) const PER_RECIPIENT_GAS: u64 = 95_000;
const REVERT_GAS: u64 = 30_000;

#[derive(Default)]
struct State {
    paused: bool,
    admins: HashSet<Address>,
    minters: HashSet<(U256, Address)>,
    owned: HashMap<Address, Vec<U256>>,
    uris: HashMap<U256, String>,
    next_token_id: u64,
    nonce: u64,
    block: u64,
    receipts: HashMap<B256, LedgerReceipt>,
    submitted: HashMap<B256, TransactionInfo>,
    sends: usize,
    operations: Vec<String>,
    reject_next: Option<String>,
    stall: bool,
    unavailable: bool,
    burn_after_balance: Option<Address>,
    repeat_first_index: Option<Address>,
    reported_balance: HashMap<Address, U256>,
    drop_last_transfer_log: bool,
}

pub(crate) struct SimulatedRegistry {
    registry: Address,
    signer: Address,
    state: Mutex<State>,
}

impl SimulatedRegistry {
    /// Unpaused registry where the signer is admin and minter for classes 50 and 100.
    pub(crate) fn new() -> Self {
        let signer = Address::repeat_byte(0xad);
        let mut state = State {
            next_token_id: 1,
            block: 1,
            ..Default::default()
        };
        state.admins.insert(signer);
        state.minters.insert((U256::from(50u64), signer));
        state.minters.insert((U256::from(100u64), signer));
        Self {
            registry: Address::repeat_byte(0x5e),
            signer,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn registry(&self) -> Address {
        self.registry
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.state().paused = paused;
    }

    pub(crate) fn revoke_admin(&self, account: Address) {
        self.state().admins.remove(&account);
    }

    pub(crate) fn revoke_minter(&self, class: U256, account: Address) {
        self.state().minters.remove(&(class, account));
    }

    pub(crate) fn reject_next_send(&self, reason: &str) {
        self.state().reject_next = Some(reason.to_string());
    }

    pub(crate) fn stall_receipts(&self, stall: bool) {
        self.state().stall = stall;
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// The owner's last token disappears right after its balance is read.
    pub(crate) fn burn_after_balance_read(&self, owner: Address) {
        self.state().burn_after_balance = Some(owner);
    }

    /// Every index of the owner resolves to the token at index 0.
    pub(crate) fn repeat_first_index(&self, owner: Address) {
        self.state().repeat_first_index = Some(owner);
    }

    /// `balanceOf` answers with `balance` regardless of what the owner holds.
    pub(crate) fn report_balance(&self, owner: Address, balance: U256) {
        self.state().reported_balance.insert(owner, balance);
    }

    /// Receipts of successful mints lose their final `Transfer` log.
    pub(crate) fn drop_last_transfer_log(&self, drop: bool) {
        self.state().drop_last_transfer_log = drop;
    }

    pub(crate) fn sends(&self) -> usize {
        self.state().sends
    }

    pub(crate) fn operations(&self) -> Vec<String> {
        self.state().operations.clone()
    }

    pub(crate) fn owned(&self, owner: Address) -> Vec<U256> {
        self.state().owned.get(&owner).cloned().unwrap_or_default()
    }

    fn reverted(operation: &str, reason: &str) -> RegistryError {
        RegistryError::CallReverted {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    fn mint(state: &mut State, registry: Address, class: U256, to: Address) -> ReceiptLog {
        let token_id = U256::from(state.next_token_id);
        state.next_token_id += 1;
        state.owned.entry(to).or_default().push(token_id);
        state.uris.insert(
            token_id,
            format!("https://accreditations.example/{class}/{token_id}.json"),
        );
        ReceiptLog {
            address: registry,
            topics: vec![
                XAccreditationRegistry::Transfer::SIGNATURE_HASH,
                Address::ZERO.into_word(),
                to.into_word(),
                B256::from(token_id.to_be_bytes::<32>()),
            ],
            data: Bytes::new(),
        }
    }

    /// Applies a mint atomically: either every recipient gets a token or none does.
    fn execute(
        &self,
        state: &mut State,
        input: &[u8],
        gas_ceiling: u64,
    ) -> (bool, u64, Vec<ReceiptLog>) {
        let (class, recipients, cost) =
            if let Ok(call) = XAccreditationRegistry::mintTokenCall::abi_decode(input) {
                (call.accreditationId, vec![call.to], MINT_ONE_GAS)
            } else if let Ok(call) =
                XAccreditationRegistry::mintAccreditationToManyUsersCall::abi_decode(input)
            {
                let cost = BATCH_BASE_GAS + PER_RECIPIENT_GAS * call.to.len() as u64;
                (call.accreditationId, call.to, cost)
            } else {
                return (false, REVERT_GAS.min(gas_ceiling), Vec::new());
            };

        if state.paused || !state.minters.contains(&(class, self.signer)) || recipients.is_empty()
        {
            return (false, REVERT_GAS.min(gas_ceiling), Vec::new());
        }
        if cost > gas_ceiling {
            return (false, gas_ceiling, Vec::new());
        }
        let logs = recipients
            .into_iter()
            .map(|to| Self::mint(state, self.registry, class, to))
            .collect();
        (true, cost, logs)
    }
}

#[async_trait]
impl LedgerGateway for SimulatedRegistry {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn call(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
    ) -> Result<Bytes, RegistryError> {
        let mut state = self.state();
        if state.unavailable {
            return Err(RegistryError::GatewayUnavailable("connection refused".into()));
        }
        state.operations.push(operation.to_string());
        if contract != self.registry {
            return Ok(Bytes::new());
        }

        use XAccreditationRegistry::*;
        let out = if pausedCall::abi_decode(&input).is_ok() {
            (state.paused,).abi_encode_params()
        } else if let Ok(call) = isAdminCall::abi_decode(&input) {
            (state.admins.contains(&call.account),).abi_encode_params()
        } else if let Ok(call) = isAccreditationMinterCall::abi_decode(&input) {
            (state
                .minters
                .contains(&(call.accreditationId, call.account)),)
                .abi_encode_params()
        } else if let Ok(call) = balanceOfCall::abi_decode(&input) {
            let held = U256::from(state.owned.get(&call.owner).map(Vec::len).unwrap_or(0));
            let balance = state
                .reported_balance
                .get(&call.owner)
                .copied()
                .unwrap_or(held);
            if state.burn_after_balance == Some(call.owner) {
                state.burn_after_balance = None;
                if let Some(tokens) = state.owned.get_mut(&call.owner) {
                    tokens.pop();
                }
            }
            (balance,).abi_encode_params()
        } else if let Ok(call) = tokenOfOwnerByIndexCall::abi_decode(&input) {
            let tokens = state.owned.get(&call.owner).cloned().unwrap_or_default();
            let index = if state.repeat_first_index == Some(call.owner) {
                U256::ZERO
            } else {
                call.index
            };
            let token = usize::try_from(index)
                .ok()
                .and_then(|i| tokens.get(i).copied())
                .ok_or_else(|| {
                    Self::reverted(operation, "ERC721Enumerable: owner index out of bounds")
                })?;
            (token,).abi_encode_params()
        } else if let Ok(call) = tokenURICall::abi_decode(&input) {
            let uri = state.uris.get(&call.tokenId).cloned().ok_or_else(|| {
                Self::reverted(operation, "ERC721Metadata: URI query for nonexistent token")
            })?;
            (uri,).abi_encode_params()
        } else {
            return Err(Self::reverted(operation, "unknown selector"));
        };
        Ok(Bytes::from(out))
    }

    async fn send(
        &self,
        operation: &str,
        contract: Address,
        input: Bytes,
        gas_ceiling: u64,
    ) -> Result<B256, RegistryError> {
        let mut state = self.state();
        if state.unavailable {
            return Err(RegistryError::GatewayUnavailable("connection refused".into()));
        }
        if let Some(reason) = state.reject_next.take() {
            return Err(RegistryError::TransactionRejected {
                operation: operation.to_string(),
                reason,
            });
        }
        state.sends += 1;
        state.operations.push(operation.to_string());

        let nonce = state.nonce;
        state.nonce += 1;
        let tx_hash = keccak256(nonce.to_be_bytes());
        let mut info = TransactionInfo {
            tx_hash,
            from: self.signer,
            to: Some(contract),
            nonce,
            gas_limit: gas_ceiling,
            block_number: None,
        };

        if !state.stall {
            let (success, gas_used, mut logs) = self.execute(&mut state, &input, gas_ceiling);
            if state.drop_last_transfer_log {
                logs.pop();
            }
            state.block += 1;
            info.block_number = Some(state.block);
            let receipt = LedgerReceipt {
                tx_hash,
                block_number: Some(state.block),
                gas_used,
                success,
                logs,
            };
            state.receipts.insert(tx_hash, receipt);
        }
        state.submitted.insert(tx_hash, info);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<LedgerReceipt, RegistryError> {
        let receipt = self.state().receipts.get(&tx_hash).cloned();
        match receipt {
            Some(receipt) => Ok(receipt),
            None => std::future::pending().await,
        }
    }

    async fn get_transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionInfo>, RegistryError> {
        Ok(self.state().submitted.get(&tx_hash).cloned())
    }
}
