// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use alloy::network::Ethereum;
use alloy::providers::RootProvider;
use alloy_rpc_client::BuiltInConnectionString;
use std::path::PathBuf;
use url::Url;

pub type LedgerProvider = RootProvider<Ethereum>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Http(Url),
    Ws(String),
    Ipc(PathBuf),
}

impl Endpoint {
    /// `http(s)://` and `ws(s)://` URLs map to their transports; anything else
    /// is treated as an IPC socket path.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Config("RPC endpoint is empty".into()));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|e| AppError::Config(format!("Invalid RPC URL: {}", e)))?;
            return Ok(Endpoint::Http(url));
        }
        if lower.starts_with("ws://") || lower.starts_with("wss://") {
            Url::parse(trimmed).map_err(|e| AppError::Config(format!("Invalid WS URL: {}", e)))?;
            return Ok(Endpoint::Ws(trimmed.to_string()));
        }
        if lower.contains("://") {
            return Err(AppError::Config(format!(
                "Unsupported RPC scheme in {}",
                trimmed
            )));
        }
        Ok(Endpoint::Ipc(PathBuf::from(trimmed)))
    }
}

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub async fn connect(endpoint: &Endpoint) -> Result<LedgerProvider, AppError> {
        match endpoint {
            Endpoint::Http(url) => Ok(RootProvider::new_http(url.clone())),
            Endpoint::Ws(url) => Self::ws(url).await,
            Endpoint::Ipc(path) => Self::ipc(path.clone()).await,
        }
    }

    pub async fn ws(ws_url: &str) -> Result<LedgerProvider, AppError> {
        let provider = RootProvider::connect(ws_url)
            .await
            .map_err(|e| AppError::Connection(format!("WS Connection failed: {}", e)))?;

        Ok(provider)
    }

    pub async fn ipc(path: PathBuf) -> Result<LedgerProvider, AppError> {
        let conn = BuiltInConnectionString::Ipc(path);
        let provider: LedgerProvider = RootProvider::connect_with(conn)
            .await
            .map_err(|e| AppError::Connection(format!("IPC Connection failed: {}", e)))?;

        Ok(provider)
    }
}
