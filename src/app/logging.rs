// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const NOISY_TRANSPORT: &str =
    "h2=info,hyper=info,hyper_util=info,tokio_tungstenite=info,alloy_transport_http=info,alloy_rpc_client=info,alloy_pubsub=info";

/// A bare level gets the transport crates pinned to `info`; a directive string
/// containing `,` or `=` is used verbatim.
pub fn filter_spec(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("{normalized},{NOISY_TRANSPORT}")
    }
}

/// Logs go to stderr so stdout carries only the JSON report.
pub fn setup_logging(log_level: &str, json_format: bool) {
    let spec = filter_spec(log_level);
    let filter = EnvFilter::from_str(&spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json_format {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false);
        subscriber.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact();
        subscriber.with(fmt_layer).init();
    }

    let base = spec.split(',').next().map(str::trim).unwrap_or("info");
    tracing::debug!(
        base,
        format = if json_format { "json" } else { "compact" },
        "Logging initialized"
    );
}
