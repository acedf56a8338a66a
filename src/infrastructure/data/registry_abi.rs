// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Statically declared operation set of the accreditation registry.
//! Checked against the published artifact at startup (see `abi::verify_interface`).

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy_sol_types::{SolCall, SolEvent};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface XAccreditationRegistry {
        function paused() external view returns (bool);
        function isAdmin(address account) external view returns (bool);
        function isAccreditationMinter(uint256 accreditationId, address account) external view returns (bool);

        function mintToken(uint256 accreditationId, address to) external;
        function mintAccreditationToManyUsers(uint256 accreditationId, address[] to) external;

        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string);

        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
    }
}

/// `(signature, selector)` for every operation the client issues.
pub fn required_operations() -> Vec<(&'static str, [u8; 4])> {
    use XAccreditationRegistry::*;
    vec![
        (pausedCall::SIGNATURE, pausedCall::SELECTOR),
        (isAdminCall::SIGNATURE, isAdminCall::SELECTOR),
        (
            isAccreditationMinterCall::SIGNATURE,
            isAccreditationMinterCall::SELECTOR,
        ),
        (mintTokenCall::SIGNATURE, mintTokenCall::SELECTOR),
        (
            mintAccreditationToManyUsersCall::SIGNATURE,
            mintAccreditationToManyUsersCall::SELECTOR,
        ),
        (balanceOfCall::SIGNATURE, balanceOfCall::SELECTOR),
        (
            tokenOfOwnerByIndexCall::SIGNATURE,
            tokenOfOwnerByIndexCall::SELECTOR,
        ),
        (tokenURICall::SIGNATURE, tokenURICall::SELECTOR),
    ]
}

/// Decode an ERC-721 mint (`Transfer` from the zero address) from raw log parts.
/// Returns `(recipient, tokenId)`.
pub fn decode_mint_transfer(topics: &[alloy::primitives::B256]) -> Option<(Address, U256)> {
    if topics.len() != 4 || topics[0] != XAccreditationRegistry::Transfer::SIGNATURE_HASH {
        return None;
    }
    let from = Address::from_word(topics[1]);
    if from != Address::ZERO {
        return None;
    }
    let to = Address::from_word(topics[2]);
    let token_id = U256::from_be_bytes(topics[3].0);
    Some((to, token_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;

    #[test]
    fn erc721_selectors_match_known_values() {
        use XAccreditationRegistry::*;
        assert_eq!(hex::encode(balanceOfCall::SELECTOR), "70a08231");
        assert_eq!(hex::encode(tokenOfOwnerByIndexCall::SELECTOR), "2f745c59");
        assert_eq!(hex::encode(tokenURICall::SELECTOR), "c87b56dd");
        assert_eq!(hex::encode(pausedCall::SELECTOR), "5c975abb");
    }

    #[test]
    fn batch_mint_call_roundtrips() {
        let call = XAccreditationRegistry::mintAccreditationToManyUsersCall {
            accreditationId: U256::from(50u64),
            to: vec![Address::from([1u8; 20]), Address::from([2u8; 20])],
        };
        let encoded = call.abi_encode();
        let decoded =
            XAccreditationRegistry::mintAccreditationToManyUsersCall::abi_decode(&encoded)
                .expect("decode batch mint");
        assert_eq!(decoded, call);
    }

    #[test]
    fn mint_transfer_decodes_only_from_zero_address() {
        let to = Address::from([0xab; 20]);
        let topics = vec![
            XAccreditationRegistry::Transfer::SIGNATURE_HASH,
            B256::ZERO,
            to.into_word(),
            B256::from(U256::from(42u64).to_be_bytes::<32>()),
        ];
        assert_eq!(decode_mint_transfer(&topics), Some((to, U256::from(42u64))));

        let mut transfer = topics.clone();
        transfer[1] = Address::from([0x01; 20]).into_word();
        assert_eq!(decode_mint_transfer(&transfer), None);
        assert_eq!(decode_mint_transfer(&topics[..3]), None);
    }

    #[test]
    fn required_operations_are_unique() {
        let ops = required_operations();
        let mut selectors: Vec<[u8; 4]> = ops.iter().map(|(_, s)| *s).collect();
        selectors.sort();
        selectors.dedup();
        assert_eq!(selectors.len(), ops.len());
    }
}
