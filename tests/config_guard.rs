use regex::Regex;
use std::fs;
use std::path::Path;

fn config_candidates() -> Vec<String> {
    let mut files: Vec<String> = [".env.example", "config.toml"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if let Ok(entries) = fs::read_dir(".") {
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str()
                && name.starts_with("config.")
                && name.ends_with(".toml")
                && !files.iter().any(|f| f == name)
            {
                files.push(name.to_string());
            }
        }
    }
    files
}

/// Fail CI if config files contain 64-hex private keys or obvious secrets.
#[test]
fn no_committed_hex_keys_in_configs() {
    let re = Regex::new(r"0x?[a-fA-F0-9]{64}").unwrap();
    for file in config_candidates() {
        if !Path::new(&file).exists() {
            continue;
        }
        let body = fs::read_to_string(&file).expect("read config");
        for (idx, line) in body.lines().enumerate() {
            if re.is_match(line) {
                panic!("Secret-looking hex in {} at line {}", file, idx + 1);
            }
        }
    }
}

#[test]
fn guard_pattern_catches_wallet_keys_but_not_addresses() {
    let re = Regex::new(r"0x?[a-fA-F0-9]{64}").unwrap();
    assert!(re.is_match(&format!("wallet_key = \"0x{}\"", "a1".repeat(32))));
    assert!(!re.is_match("registry_address = \"0xd855d15cdA2DC5866c681876434710De246011F8\""));
}
