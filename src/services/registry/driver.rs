// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::RegistryError;
use crate::domain::types::{
    AccreditationClass, BatchMintSummary, HoldingsSnapshot, TransactionReceipt,
};
use crate::services::registry::batch::BatchMinter;
use crate::services::registry::client::RegistryClient;
use crate::services::registry::holdings::HoldingsEnumerator;
use crate::services::registry::report::{
    MintKind, MintOutcome, Preconditions, RunReport, StepFailure,
};
use alloy::primitives::Address;

/// What one operator run should do.
#[derive(Clone, Debug, Default)]
pub struct RunPlan {
    pub class: AccreditationClass,
    /// Each gets its own `mintToken` transaction, in order.
    pub single_recipients: Vec<Address>,
    /// Minted together in one `mintAccreditationToManyUsers` transaction.
    pub batch_recipients: Vec<Address>,
    /// Owners to enumerate afterwards. Empty means every recipient above.
    pub inspect: Vec<Address>,
}

impl RunPlan {
    pub fn has_mints(&self) -> bool {
        !self.single_recipients.is_empty() || !self.batch_recipients.is_empty()
    }

    /// Owners to enumerate, first occurrence order, duplicates dropped.
    pub fn owners_to_inspect(&self) -> Vec<Address> {
        let source: Vec<Address> = if self.inspect.is_empty() {
            self.single_recipients
                .iter()
                .chain(self.batch_recipients.iter())
                .copied()
                .collect()
        } else {
            self.inspect.clone()
        };
        let mut owners: Vec<Address> = Vec::with_capacity(source.len());
        for addr in source {
            if !owners.contains(&addr) {
                owners.push(addr);
            }
        }
        owners
    }
}

/// Sequences precondition reads, mints and post-mint enumeration. Steps run
/// one after another and the first failure ends the run.
#[derive(Clone)]
pub struct Orchestrator {
    client: RegistryClient,
    minter: BatchMinter,
    holdings: HoldingsEnumerator,
    gas_ceiling: u64,
    enforce_roles: bool,
}

impl Orchestrator {
    pub fn new(client: RegistryClient, gas_ceiling: u64) -> Self {
        Self {
            minter: BatchMinter::new(client.clone(), gas_ceiling),
            holdings: HoldingsEnumerator::new(client.clone()),
            client,
            gas_ceiling,
            enforce_roles: true,
        }
    }

    /// When disabled, a missing minter role is reported but mints are still
    /// submitted and the registry has the final word.
    pub fn with_enforce_roles(mut self, enforce: bool) -> Self {
        self.enforce_roles = enforce;
        self
    }

    pub fn with_per_recipient_gas(mut self, per_recipient_gas: Option<u64>) -> Self {
        self.minter = self.minter.with_per_recipient_gas(per_recipient_gas);
        self
    }

    pub async fn check_preconditions(
        &self,
        class: AccreditationClass,
    ) -> Result<Preconditions, (&'static str, RegistryError)> {
        let signer = self.client.signer();
        let paused = self
            .client
            .is_paused()
            .await
            .map_err(|e| ("paused()", e))?;
        let is_admin = self
            .client
            .has_admin_role(signer)
            .await
            .map_err(|e| ("isAdmin(address)", e))?;
        let is_minter = self
            .client
            .has_minter_role(class, signer)
            .await
            .map_err(|e| ("isAccreditationMinter(uint256,address)", e))?;

        let pre = Preconditions {
            paused,
            is_admin,
            is_minter,
        };
        tracing::info!(
            target: "driver",
            class = %class,
            signer = %format!("{:#x}", signer),
            paused,
            is_admin,
            is_minter,
            "Preconditions read"
        );
        Ok(pre)
    }

    /// Pause always short-circuits; a missing minter role only when roles are enforced.
    fn guard(&self, pre: &Preconditions, operation: &str) -> Result<(), RegistryError> {
        if pre.paused {
            return Err(RegistryError::RegistryPaused {
                operation: operation.to_string(),
            });
        }
        if !pre.is_minter {
            if self.enforce_roles {
                return Err(RegistryError::MissingRole {
                    operation: operation.to_string(),
                    account: self.client.signer(),
                    role: "accreditation minter".to_string(),
                });
            }
            tracing::warn!(
                target: "driver",
                operation,
                "Signer lacks minter role; submitting anyway"
            );
        }
        if !pre.is_admin {
            tracing::warn!(target: "driver", operation, "Signer is not a registry admin");
        }
        Ok(())
    }

    async fn fresh_guard(
        &self,
        class: AccreditationClass,
        operation: &str,
    ) -> Result<(), RegistryError> {
        let pre = self
            .check_preconditions(class)
            .await
            .map_err(|(_, e)| e)?;
        self.guard(&pre, operation)
    }

    /// Single mint with a fresh precondition check.
    pub async fn mint_one(
        &self,
        class: AccreditationClass,
        recipient: Address,
    ) -> Result<TransactionReceipt, RegistryError> {
        self.fresh_guard(class, "mintToken").await?;
        self.client
            .mint_one(class, recipient, self.gas_ceiling)
            .await
    }

    /// Batch mint with a fresh precondition check.
    pub async fn mint_batch(
        &self,
        class: AccreditationClass,
        recipients: &[Address],
    ) -> Result<BatchMintSummary, RegistryError> {
        if recipients.is_empty() {
            return Err(RegistryError::EmptyBatch { class });
        }
        self.fresh_guard(class, "mintAccreditationToManyUsers")
            .await?;
        self.minter.mint(class, recipients).await
    }

    pub async fn holdings(&self, owner: Address) -> Result<HoldingsSnapshot, RegistryError> {
        self.holdings.snapshot(owner).await
    }

    async fn fail(&self, report: &mut RunReport, mut failure: StepFailure, error: &RegistryError) {
        if let Some(tx_hash) = error.pending_hash() {
            match self.client.transaction(tx_hash).await {
                Ok(info) => failure.pending_transaction = info,
                Err(e) => tracing::warn!(
                    target: "driver",
                    tx_hash = %format!("{:#x}", tx_hash),
                    error = %e,
                    "Pending transaction lookup failed"
                ),
            }
        }
        tracing::error!(
            target: "driver",
            step = %failure.step,
            operation = %failure.operation,
            args = %failure.arguments,
            error = %error,
            "Run stopped"
        );
        report.failure = Some(failure);
    }

    pub async fn run(&self, plan: &RunPlan) -> RunReport {
        let mut report = RunReport::new(self.client.registry(), self.client.signer(), plan.class);

        let pre = match self.check_preconditions(plan.class).await {
            Ok(pre) => pre,
            Err((operation, e)) => {
                let failure =
                    StepFailure::new("preconditions", operation, format!("class={}", plan.class), &e);
                self.fail(&mut report, failure, &e).await;
                return report;
            }
        };
        report.preconditions = Some(pre);

        for recipient in &plan.single_recipients {
            let request = self
                .client
                .mint_one_request(plan.class, *recipient, self.gas_ceiling);
            let result = match self.guard(&pre, request.operation) {
                Ok(()) => self.client.mint_one(plan.class, *recipient, self.gas_ceiling).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(receipt) => report
                    .mints
                    .push(MintOutcome::from_receipt(MintKind::Single, 1, &receipt)),
                Err(e) => {
                    let failure =
                        StepFailure::new("mint", request.operation, request.arguments, &e);
                    self.fail(&mut report, failure, &e).await;
                    return report;
                }
            }
        }

        if !plan.batch_recipients.is_empty() {
            let request =
                self.client
                    .mint_many_request(plan.class, &plan.batch_recipients, self.gas_ceiling);
            let result = match self.guard(&pre, request.operation) {
                Ok(()) => self.minter.mint(plan.class, &plan.batch_recipients).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(summary) => report.mints.push(MintOutcome::from_receipt(
                    MintKind::Batch,
                    summary.recipient_count,
                    &summary.receipt,
                )),
                Err(e) => {
                    let failure =
                        StepFailure::new("mint-batch", request.operation, request.arguments, &e);
                    self.fail(&mut report, failure, &e).await;
                    return report;
                }
            }
        }

        for owner in plan.owners_to_inspect() {
            match self.holdings.snapshot(owner).await {
                Ok(snapshot) => report.holdings.push(snapshot),
                Err(e) => {
                    let failure =
                        StepFailure::new("holdings", "enumerate", format!("owner={owner:#x}"), &e);
                    self.fail(&mut report, failure, &e).await;
                    return report;
                }
            }
        }

        tracing::info!(
            target: "driver",
            mints = report.mints.len(),
            owners = report.holdings.len(),
            "Run complete"
        );
        report
    }
}
