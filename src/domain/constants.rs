// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

// =============================================================================
// REGISTRY CONSTANTS
// =============================================================================

/// Contract name used for artifact lookup (`<dir>/<name>.json`).
pub const REGISTRY_CONTRACT_NAME: &str = "XAccreditationRegistry";

/// Ceiling historically used for both single and batch mints.
pub const DEFAULT_GAS_CEILING: u64 = 6_521_975;

// =============================================================================
// RECEIPT TRACKING
// =============================================================================

pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;
pub const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_RECEIPT_CONFIRM_BLOCKS: u64 = 1;
pub const MIN_RECEIPT_POLL_MS: u64 = 100;

// =============================================================================
// NETWORK
// =============================================================================

pub const DEFAULT_RPC_URL: &str = "http://localhost:7545";

// =============================================================================
// WORKFLOW DEFAULTS
// =============================================================================

pub const DEFAULT_ACCREDITATION_CLASS: u64 = 100;

/// Truffle build output, searched when no artifact path is configured.
pub const DEFAULT_ARTIFACT_DIR: &str = "build/contracts";
