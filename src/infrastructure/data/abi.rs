// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::infrastructure::data::registry_abi::required_operations;
use alloy_json_abi::JsonAbi;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Contract interfaces keyed by contract name. Accepts truffle/hardhat
/// artifacts (`{"abi": [...]}`) as well as bare ABI arrays.
#[derive(Default)]
pub struct AbiRegistry {
    abis: HashMap<String, JsonAbi>,
}

impl AbiRegistry {
    pub fn new() -> Self {
        Self {
            abis: HashMap::new(),
        }
    }

    pub fn load_from_directory(&mut self, dir_path: &str) -> Result<(), AppError> {
        let path = Path::new(dir_path);

        if !path.exists() {
            return Err(AppError::Config(format!(
                "ABI directory not found: {}",
                dir_path
            )));
        }

        for entry in fs::read_dir(path).map_err(|e| AppError::Initialization(e.to_string()))? {
            let entry = entry.map_err(|e| AppError::Initialization(e.to_string()))?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                self.load_file(&path)?;
            }
        }
        Ok(())
    }

    /// Load a single artifact; the file stem becomes the contract name.
    pub fn load_file(&mut self, path: &Path) -> Result<String, AppError> {
        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let file_content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read ABI {}: {}", file_stem, e)))?;
        let abi = parse_artifact(&file_content)
            .map_err(|e| AppError::Config(format!("Failed to parse ABI {}: {}", file_stem, e)))?;

        tracing::info!(target: "config", contract = %file_stem, functions = abi.functions().count(), "Loaded ABI");
        self.abis.insert(file_stem.clone(), abi);
        Ok(file_stem)
    }

    pub fn insert(&mut self, name: &str, abi: JsonAbi) {
        self.abis.insert(name.to_string(), abi);
    }

    pub fn get(&self, name: &str) -> Option<&JsonAbi> {
        self.abis.get(name)
    }

    /// Function signatures of a contract, sorted for stable output.
    pub fn function_signatures(&self, name: &str) -> Option<Vec<String>> {
        let abi = self.get(name)?;
        let mut out: Vec<String> = abi.functions().map(|f| f.signature()).collect();
        out.sort();
        Some(out)
    }
}

fn parse_artifact(raw: &str) -> Result<JsonAbi, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Object(mut obj) if obj.contains_key("abi") => {
            let abi = obj.remove("abi").unwrap_or(Value::Null);
            serde_json::from_value(abi)
        }
        other => serde_json::from_value(other),
    }
}

/// Fail fast when the published interface lacks an operation the client issues.
pub fn verify_interface(name: &str, abi: &JsonAbi) -> Result<(), AppError> {
    let published: HashSet<[u8; 4]> = abi.functions().map(|f| f.selector().0).collect();
    let missing: Vec<&str> = required_operations()
        .into_iter()
        .filter(|(_, selector)| !published.contains(selector))
        .map(|(signature, _)| signature)
        .collect();

    if missing.is_empty() {
        tracing::info!(target: "config", contract = %name, "Registry interface verified");
        return Ok(());
    }
    Err(AppError::InterfaceMismatch {
        contract: name.to_string(),
        missing: missing.join(", "),
    })
}
