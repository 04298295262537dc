//! Test utilities for utxo-codec

use crate::networks::Network;

/// Macro to generate rstest test function with #[case] for all networks in Network::ALL
/// This ensures the test cases stay in sync with Network::ALL
#[macro_export]
macro_rules! test_all_networks {
    ($test_name:ident, $network:ident, $body:block) => {
        #[rstest::rstest]
        #[case::bitcoin($crate::Network::Bitcoin)]
        #[case::bitcoin_testnet($crate::Network::BitcoinTestnet)]
        #[case::bitcoin_cash($crate::Network::BitcoinCash)]
        #[case::bitcoin_cash_testnet($crate::Network::BitcoinCashTestnet)]
        #[case::ecash($crate::Network::Ecash)]
        #[case::ecash_testnet($crate::Network::EcashTestnet)]
        #[case::bitcoin_gold($crate::Network::BitcoinGold)]
        #[case::bitcoin_gold_testnet($crate::Network::BitcoinGoldTestnet)]
        #[case::bitcoin_sv($crate::Network::BitcoinSV)]
        #[case::bitcoin_sv_testnet($crate::Network::BitcoinSVTestnet)]
        #[case::dash($crate::Network::Dash)]
        #[case::dash_testnet($crate::Network::DashTestnet)]
        #[case::dogecoin($crate::Network::Dogecoin)]
        #[case::dogecoin_testnet($crate::Network::DogecoinTestnet)]
        #[case::litecoin($crate::Network::Litecoin)]
        #[case::litecoin_testnet($crate::Network::LitecoinTestnet)]
        #[case::zcash($crate::Network::Zcash)]
        #[case::zcash_testnet($crate::Network::ZcashTestnet)]
        fn $test_name(#[case] $network: $crate::Network) $body
    };
}

/// One address vector: `(script type, output script hex, address)`
pub type AddressVector = (String, String, String);

/// Fixture file stem for a network, e.g. `bitcoincashTestnet` or `ecash-cashaddr`.
pub fn address_fixture_name(network: Network, cashaddr: bool) -> String {
    if cashaddr {
        format!("{}-cashaddr", network.utxolib_name())
    } else {
        network.utxolib_name().to_string()
    }
}

pub fn load_address_fixture(name: &str) -> Vec<AddressVector> {
    let fixture_path = format!("test/fixtures/address/{}.json", name);
    let content = std::fs::read_to_string(&fixture_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", fixture_path));

    let parsed: Vec<serde_json::Value> = serde_json::from_str(&content)
        .unwrap_or_else(|_| panic!("Failed to parse fixture: {}", fixture_path));

    parsed
        .iter()
        .map(|item| {
            let arr = item.as_array().unwrap();
            (
                arr[0].as_str().unwrap().to_string(),
                arr[1].as_str().unwrap().to_string(),
                arr[2].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

/// Raw bytes of a hex block fixture under `test/fixtures/block/`
pub fn load_block_fixture(name: &str) -> Vec<u8> {
    let fixture_path = format!("test/fixtures/block/{}.hex", name);
    let content = std::fs::read_to_string(&fixture_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", fixture_path));
    hex::decode(content.trim())
        .unwrap_or_else(|_| panic!("Failed to decode fixture: {}", fixture_path))
}

/// Three distinct compressed-looking keys. Not valid curve points.
pub fn test_pubkeys() -> [[u8; 33]; 3] {
    let mut keys = [[0u8; 33]; 3];
    for (i, key) in keys.iter_mut().enumerate() {
        key[0] = 0x02 + (i as u8 % 2);
        key[1..].fill(0x11 * (i as u8 + 1));
    }
    keys
}
