// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

pub mod batch;
pub mod client;
pub mod driver;
pub mod holdings;
pub mod report;
pub mod submitter;

#[cfg(test)]
pub(crate) mod mock;

pub use batch::BatchMinter;
pub use client::RegistryClient;
pub use driver::{Orchestrator, RunPlan};
pub use holdings::{HoldingsEnumerator, HoldingsWalk};
pub use report::RunReport;
pub use submitter::TransactionSubmitter;
