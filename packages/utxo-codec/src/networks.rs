//! Definitions of various bitcoin-like networks
// Inspired by https://github.com/BitGo/BitGoJS/blob/master/modules/utxo-lib/src/networks.ts but
// with a few naming improvements.
//
// The parameter values for the fork coins can be found in these files:
//
// property       filename                  varname
// -------------------------------------------------------------------------------
// message_prefix src/validation.cpp        strMessageMagic
// bech32         src/chainparams.cpp       bech32_hrp
// bip32.public   src/chainparams.cpp       base58Prefixes[EXT_PUBLIC_KEY]
// bip32.private  src/chainparams.cpp       base58Prefixes[EXT_SECRET_KEY]
// pub_key_hash   src/chainparams.cpp       base58Prefixes[PUBKEY_ADDRESS]
// script_hash    src/chainparams.cpp       base58Prefixes[SCRIPT_ADDRESS]
// wif            src/chainparams.cpp       base58Prefixes[SECRET_KEY]
// fork_id        src/script/interpreter.h  FORKID_*
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
    #[error("more than one testnet for {mainnet}: {testnets:?}")]
    AmbiguousTestnet {
        mainnet: Network,
        testnets: Vec<Network>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Network {
    // https://github.com/bitcoin/bitcoin/blob/master/src/validation.cpp
    // https://github.com/bitcoin/bitcoin/blob/master/src/chainparams.cpp
    Bitcoin,
    BitcoinTestnet,

    // https://github.com/bitcoin-cash-node/bitcoin-cash-node/blob/master/src/validation.cpp
    // https://github.com/bitcoin-cash-node/bitcoin-cash-node/blob/master/src/chainparams.cpp
    BitcoinCash,
    BitcoinCashTestnet,

    // https://github.com/Bitcoin-ABC/bitcoin-abc/blob/master/src/validation.cpp
    // https://github.com/Bitcoin-ABC/bitcoin-abc/blob/master/src/chainparams.cpp
    Ecash,
    EcashTestnet,

    // https://github.com/BTCGPU/BTCGPU/blob/master/src/validation.cpp
    // https://github.com/BTCGPU/BTCGPU/blob/master/src/chainparams.cpp
    BitcoinGold,
    BitcoinGoldTestnet,

    // https://github.com/bitcoin-sv/bitcoin-sv/blob/master/src/validation.cpp
    // https://github.com/bitcoin-sv/bitcoin-sv/blob/master/src/chainparams.cpp
    BitcoinSV,
    BitcoinSVTestnet,

    // https://github.com/dashpay/dash/blob/master/src/validation.cpp
    // https://github.com/dashpay/dash/blob/master/src/chainparams.cpp
    Dash,
    DashTestnet,

    // https://github.com/dogecoin/dogecoin/blob/master/src/validation.cpp
    // https://github.com/dogecoin/dogecoin/blob/master/src/chainparams.cpp
    Dogecoin,
    DogecoinTestnet,

    // https://github.com/litecoin-project/litecoin/blob/master/src/validation.cpp
    // https://github.com/litecoin-project/litecoin/blob/master/src/chainparams.cpp
    Litecoin,
    LitecoinTestnet,

    // https://github.com/zcash/zcash/blob/master/src/validation.cpp
    // https://github.com/zcash/zcash/blob/master/src/chainparams.cpp
    Zcash,
    ZcashTestnet,
}

/// BIP32 extended key version bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip32Versions {
    pub public: u32,
    pub private: u32,
}

/// Cashaddr prefix and type bytes (Bitcoin Cash and eCash only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashAddrParams {
    pub prefix: &'static str,
    pub pub_key_hash: u8,
    pub script_hash: u8,
}

/// Immutable parameter set of a single chain variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    pub message_prefix: &'static str,
    /// Base58Check P2PKH version. Two bytes wide for Zcash.
    pub pub_key_hash: u32,
    /// Base58Check P2SH version. Two bytes wide for Zcash.
    pub script_hash: u32,
    pub wif: u8,
    pub bip32: Bip32Versions,
    pub bech32: Option<&'static str>,
    pub cash_addr: Option<CashAddrParams>,
    /// Signature hash domain separation for replay-protected forks
    pub fork_id: Option<u32>,
    /// `(transaction version, consensus branch id)` pairs
    pub consensus_branch_ids: Option<&'static [(u32, u32)]>,
}

// base58 'xpub' / 'xprv'
const BIP32_MAINNET: Bip32Versions = Bip32Versions {
    public: 0x0488b21e,
    private: 0x0488ade4,
};

// base58 'tpub' / 'tprv'
const BIP32_TESTNET: Bip32Versions = Bip32Versions {
    public: 0x043587cf,
    private: 0x04358394,
};

const BITCOIN_MESSAGE_PREFIX: &str = "\x18Bitcoin Signed Message:\n";

// https://github.com/zcash/zcash/blob/v4.5.1/src/consensus/upgrades.cpp
// v4 uses the Canopy branch id (https://zips.z.cash/zip-0251)
const ZCASH_CONSENSUS_BRANCH_IDS: &[(u32, u32)] =
    &[(1, 0), (2, 0), (3, 0x5ba81b19), (4, 0xe9ff75a6)];

static BITCOIN: NetworkParams = NetworkParams {
    message_prefix: BITCOIN_MESSAGE_PREFIX,
    pub_key_hash: 0x00,
    script_hash: 0x05,
    wif: 0x80,
    bip32: BIP32_MAINNET,
    bech32: Some("bc"),
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

static BITCOIN_TESTNET: NetworkParams = NetworkParams {
    message_prefix: BITCOIN_MESSAGE_PREFIX,
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: Some("tb"),
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

// https://github.com/bitcoincashorg/bitcoincash.org/blob/master/spec/cashaddr.md
static BITCOIN_CASH: NetworkParams = NetworkParams {
    message_prefix: BITCOIN_MESSAGE_PREFIX,
    pub_key_hash: 0x00,
    script_hash: 0x05,
    wif: 0x80,
    bip32: BIP32_MAINNET,
    bech32: None,
    cash_addr: Some(CashAddrParams {
        prefix: "bitcoincash",
        pub_key_hash: 0x00,
        script_hash: 0x08,
    }),
    fork_id: Some(0x00),
    consensus_branch_ids: None,
};

static BITCOIN_CASH_TESTNET: NetworkParams = NetworkParams {
    message_prefix: BITCOIN_MESSAGE_PREFIX,
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: None,
    cash_addr: Some(CashAddrParams {
        prefix: "bchtest",
        pub_key_hash: 0x00,
        script_hash: 0x08,
    }),
    fork_id: Some(0x00),
    consensus_branch_ids: None,
};

// https://github.com/Bitcoin-ABC/bitcoin-abc/blob/master/src/util/message.cpp
static ECASH: NetworkParams = NetworkParams {
    message_prefix: "\x16eCash Signed Message:\n",
    pub_key_hash: 0x00,
    script_hash: 0x05,
    wif: 0x80,
    bip32: BIP32_MAINNET,
    bech32: None,
    cash_addr: Some(CashAddrParams {
        prefix: "ecash",
        pub_key_hash: 0x00,
        script_hash: 0x08,
    }),
    fork_id: Some(0x00),
    consensus_branch_ids: None,
};

static ECASH_TESTNET: NetworkParams = NetworkParams {
    message_prefix: "\x16eCash Signed Message:\n",
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: None,
    cash_addr: Some(CashAddrParams {
        prefix: "ectest",
        pub_key_hash: 0x00,
        script_hash: 0x08,
    }),
    fork_id: Some(0x00),
    consensus_branch_ids: None,
};

// https://github.com/BTCGPU/BTCGPU/blob/master/src/script/interpreter.h
static BITCOIN_GOLD: NetworkParams = NetworkParams {
    message_prefix: "\x18Bitcoin Gold Signed Message:\n",
    pub_key_hash: 0x26,
    script_hash: 0x17,
    wif: 0x80,
    bip32: BIP32_MAINNET,
    bech32: Some("btg"),
    cash_addr: None,
    fork_id: Some(79),
    consensus_branch_ids: None,
};

static BITCOIN_GOLD_TESTNET: NetworkParams = NetworkParams {
    message_prefix: "\x18Bitcoin Gold Signed Message:\n",
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: Some("tbtg"),
    cash_addr: None,
    fork_id: Some(79),
    consensus_branch_ids: None,
};

static BITCOIN_SV: NetworkParams = NetworkParams {
    message_prefix: BITCOIN_MESSAGE_PREFIX,
    pub_key_hash: 0x00,
    script_hash: 0x05,
    wif: 0x80,
    bip32: BIP32_MAINNET,
    bech32: None,
    cash_addr: None,
    fork_id: Some(0x00),
    consensus_branch_ids: None,
};

static BITCOIN_SV_TESTNET: NetworkParams = NetworkParams {
    message_prefix: BITCOIN_MESSAGE_PREFIX,
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: None,
    cash_addr: None,
    fork_id: Some(0x00),
    consensus_branch_ids: None,
};

static DASH: NetworkParams = NetworkParams {
    message_prefix: "\x19DarkCoin Signed Message:\n",
    pub_key_hash: 0x4c,
    script_hash: 0x10,
    wif: 0xcc,
    bip32: BIP32_MAINNET,
    bech32: None,
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

static DASH_TESTNET: NetworkParams = NetworkParams {
    message_prefix: "\x19DarkCoin Signed Message:\n",
    pub_key_hash: 0x8c,
    script_hash: 0x13,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: None,
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

// Mainnet bip32 does not match dogecoin core (see BG-53241)
static DOGECOIN: NetworkParams = NetworkParams {
    message_prefix: "\x19Dogecoin Signed Message:\n",
    pub_key_hash: 0x1e,
    script_hash: 0x16,
    wif: 0x9e,
    bip32: BIP32_MAINNET,
    bech32: None,
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

static DOGECOIN_TESTNET: NetworkParams = NetworkParams {
    message_prefix: "\x19Dogecoin Signed Message:\n",
    pub_key_hash: 0x71,
    script_hash: 0xc4,
    wif: 0xf1,
    bip32: BIP32_TESTNET,
    bech32: None,
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

static LITECOIN: NetworkParams = NetworkParams {
    message_prefix: "\x19Litecoin Signed Message:\n",
    pub_key_hash: 0x30,
    script_hash: 0x32,
    wif: 0xb0,
    bip32: BIP32_MAINNET,
    bech32: Some("ltc"),
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

static LITECOIN_TESTNET: NetworkParams = NetworkParams {
    message_prefix: "\x19Litecoin Signed Message:\n",
    pub_key_hash: 0x6f,
    script_hash: 0x3a,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: Some("tltc"),
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: None,
};

static ZCASH: NetworkParams = NetworkParams {
    message_prefix: "\x18ZCash Signed Message:\n",
    pub_key_hash: 0x1cb8,
    script_hash: 0x1cbd,
    wif: 0x80,
    bip32: BIP32_MAINNET,
    bech32: None,
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: Some(ZCASH_CONSENSUS_BRANCH_IDS),
};

static ZCASH_TESTNET: NetworkParams = NetworkParams {
    message_prefix: "\x18ZCash Signed Message:\n",
    pub_key_hash: 0x1d25,
    script_hash: 0x1cba,
    wif: 0xef,
    bip32: BIP32_TESTNET,
    bech32: None,
    cash_addr: None,
    fork_id: None,
    consensus_branch_ids: Some(ZCASH_CONSENSUS_BRANCH_IDS),
};

impl Network {
    /// Array containing all network variants
    pub const ALL: &'static [Network] = &[
        Network::Bitcoin,
        Network::BitcoinTestnet,
        Network::BitcoinCash,
        Network::BitcoinCashTestnet,
        Network::Ecash,
        Network::EcashTestnet,
        Network::BitcoinGold,
        Network::BitcoinGoldTestnet,
        Network::BitcoinSV,
        Network::BitcoinSVTestnet,
        Network::Dash,
        Network::DashTestnet,
        Network::Dogecoin,
        Network::DogecoinTestnet,
        Network::Litecoin,
        Network::LitecoinTestnet,
        Network::Zcash,
        Network::ZcashTestnet,
    ];

    /// Returns the canonical string name of this network
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bitcoin => "Bitcoin",
            Network::BitcoinTestnet => "BitcoinTestnet",
            Network::BitcoinCash => "BitcoinCash",
            Network::BitcoinCashTestnet => "BitcoinCashTestnet",
            Network::Ecash => "Ecash",
            Network::EcashTestnet => "EcashTestnet",
            Network::BitcoinGold => "BitcoinGold",
            Network::BitcoinGoldTestnet => "BitcoinGoldTestnet",
            Network::BitcoinSV => "BitcoinSV",
            Network::BitcoinSVTestnet => "BitcoinSVTestnet",
            Network::Dash => "Dash",
            Network::DashTestnet => "DashTestnet",
            Network::Dogecoin => "Dogecoin",
            Network::DogecoinTestnet => "DogecoinTestnet",
            Network::Litecoin => "Litecoin",
            Network::LitecoinTestnet => "LitecoinTestnet",
            Network::Zcash => "Zcash",
            Network::ZcashTestnet => "ZcashTestnet",
        }
    }

    pub fn from_name_exact(name: &str) -> Option<Network> {
        Network::ALL.iter().copied().find(|n| n.as_str() == name)
    }

    /// Name of this network in @bitgo/utxo-lib
    pub fn utxolib_name(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::BitcoinTestnet => "testnet",
            Network::BitcoinCash => "bitcoincash",
            Network::BitcoinCashTestnet => "bitcoincashTestnet",
            Network::Ecash => "ecash",
            Network::EcashTestnet => "ecashTest",
            Network::BitcoinGold => "bitcoingold",
            Network::BitcoinGoldTestnet => "bitcoingoldTestnet",
            Network::BitcoinSV => "bitcoinsv",
            Network::BitcoinSVTestnet => "bitcoinsvTestnet",
            Network::Dash => "dash",
            Network::DashTestnet => "dashTest",
            Network::Dogecoin => "dogecoin",
            Network::DogecoinTestnet => "dogecoinTest",
            Network::Litecoin => "litecoin",
            Network::LitecoinTestnet => "litecoinTest",
            Network::Zcash => "zcash",
            Network::ZcashTestnet => "zcashTest",
        }
    }

    /// Convert a network name from @bitgo/utxo-lib to a Network enum value.
    pub fn from_utxolib_name(name: &str) -> Option<Network> {
        Network::ALL.iter().copied().find(|n| n.utxolib_name() == name)
    }

    /// Convert from a bitgo coin name to a Network enum value.
    pub fn from_coin_name(name: &str) -> Option<Network> {
        Network::ALL.iter().copied().find(|n| n.to_coin_name() == name)
    }

    /// Convert to a BitGo coin name.
    pub fn to_coin_name(&self) -> &'static str {
        match self {
            Network::Bitcoin => "btc",
            Network::BitcoinTestnet => "tbtc",
            Network::BitcoinCash => "bch",
            Network::BitcoinCashTestnet => "tbch",
            Network::Ecash => "bcha",
            Network::EcashTestnet => "tbcha",
            Network::BitcoinGold => "btg",
            Network::BitcoinGoldTestnet => "tbtg",
            Network::BitcoinSV => "bsv",
            Network::BitcoinSVTestnet => "tbsv",
            Network::Dash => "dash",
            Network::DashTestnet => "tdash",
            Network::Dogecoin => "doge",
            Network::DogecoinTestnet => "tdoge",
            Network::Litecoin => "ltc",
            Network::LitecoinTestnet => "tltc",
            Network::Zcash => "zec",
            Network::ZcashTestnet => "tzec",
        }
    }

    pub fn params(self) -> &'static NetworkParams {
        match self {
            Network::Bitcoin => &BITCOIN,
            Network::BitcoinTestnet => &BITCOIN_TESTNET,
            Network::BitcoinCash => &BITCOIN_CASH,
            Network::BitcoinCashTestnet => &BITCOIN_CASH_TESTNET,
            Network::Ecash => &ECASH,
            Network::EcashTestnet => &ECASH_TESTNET,
            Network::BitcoinGold => &BITCOIN_GOLD,
            Network::BitcoinGoldTestnet => &BITCOIN_GOLD_TESTNET,
            Network::BitcoinSV => &BITCOIN_SV,
            Network::BitcoinSVTestnet => &BITCOIN_SV_TESTNET,
            Network::Dash => &DASH,
            Network::DashTestnet => &DASH_TESTNET,
            Network::Dogecoin => &DOGECOIN,
            Network::DogecoinTestnet => &DOGECOIN_TESTNET,
            Network::Litecoin => &LITECOIN,
            Network::LitecoinTestnet => &LITECOIN_TESTNET,
            Network::Zcash => &ZCASH,
            Network::ZcashTestnet => &ZCASH_TESTNET,
        }
    }

    pub fn mainnet(self) -> Network {
        match self {
            Network::Bitcoin | Network::BitcoinTestnet => Network::Bitcoin,
            Network::BitcoinCash | Network::BitcoinCashTestnet => Network::BitcoinCash,
            Network::Ecash | Network::EcashTestnet => Network::Ecash,
            Network::BitcoinGold | Network::BitcoinGoldTestnet => Network::BitcoinGold,
            Network::BitcoinSV | Network::BitcoinSVTestnet => Network::BitcoinSV,
            Network::Dash | Network::DashTestnet => Network::Dash,
            Network::Dogecoin | Network::DogecoinTestnet => Network::Dogecoin,
            Network::Litecoin | Network::LitecoinTestnet => Network::Litecoin,
            Network::Zcash | Network::ZcashTestnet => Network::Zcash,
        }
    }

    /// The testnet of this coin, if it has one. Testnets return themselves.
    pub fn testnet(self) -> Option<Network> {
        registry().get_testnet(self).ok().flatten()
    }

    pub fn is_mainnet(self) -> bool {
        self == self.mainnet()
    }

    pub fn is_testnet(self) -> bool {
        !self.is_mainnet()
    }

    pub fn is_same_coin(self, other: Network) -> bool {
        self.mainnet() == other.mainnet()
    }

    pub fn is_bitcoin(self) -> bool {
        self.mainnet() == Network::Bitcoin
    }

    pub fn is_bitcoin_cash(self) -> bool {
        self.mainnet() == Network::BitcoinCash
    }

    pub fn is_ecash(self) -> bool {
        self.mainnet() == Network::Ecash
    }

    pub fn is_bitcoin_gold(self) -> bool {
        self.mainnet() == Network::BitcoinGold
    }

    pub fn is_bitcoin_sv(self) -> bool {
        self.mainnet() == Network::BitcoinSV
    }

    pub fn is_dash(self) -> bool {
        self.mainnet() == Network::Dash
    }

    pub fn is_dogecoin(self) -> bool {
        self.mainnet() == Network::Dogecoin
    }

    pub fn is_litecoin(self) -> bool {
        self.mainnet() == Network::Litecoin
    }

    pub fn is_zcash(self) -> bool {
        self.mainnet() == Network::Zcash
    }

    pub fn supports_segwit(self) -> bool {
        matches!(
            self.mainnet(),
            Network::Bitcoin | Network::Litecoin | Network::BitcoinGold
        )
    }

    /// In the context of this library, only bitcoin supports taproot
    pub fn supports_taproot(self) -> bool {
        self.mainnet() == Network::Bitcoin
    }

    pub fn uses_fork_id(self) -> bool {
        self.params().fork_id.is_some()
    }

    /// Zcash consensus branch id for a transaction version
    pub fn consensus_branch_id(self, tx_version: u32) -> Option<u32> {
        self.params()
            .consensus_branch_ids?
            .iter()
            .find(|(version, _)| *version == tx_version)
            .map(|(_, branch_id)| *branch_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::from_name_exact(s).ok_or_else(|| NetworkError::InvalidNetwork(s.to_string()))
    }
}

/// A row of the network table: the network, the mainnet it belongs to and its parameters.
#[derive(Debug, Clone, Copy)]
pub struct NetworkEntry {
    pub network: Network,
    pub mainnet: Network,
    pub params: &'static NetworkParams,
}

impl NetworkEntry {
    pub fn of(network: Network) -> Self {
        NetworkEntry {
            network,
            mainnet: network.mainnet(),
            params: network.params(),
        }
    }
}

/// Validated, read-only view of the network table.
///
/// Construction checks the mainnet/testnet relationship so that lookups never have to.
#[derive(Debug)]
pub struct NetworkRegistry {
    entries: Vec<NetworkEntry>,
    mainnets: HashMap<Network, Network>,
    testnets: HashMap<Network, Option<Network>>,
}

impl NetworkRegistry {
    pub fn new(entries: &[NetworkEntry]) -> Result<Self, NetworkError> {
        let mut mainnets = HashMap::new();
        for entry in entries {
            if mainnets.insert(entry.network, entry.mainnet).is_some() {
                return Err(NetworkError::InvalidNetwork(format!(
                    "duplicate entry for {}",
                    entry.network
                )));
            }
        }

        let mut testnets: HashMap<Network, Vec<Network>> = HashMap::new();
        for entry in entries {
            if entry.network == entry.mainnet {
                testnets.entry(entry.network).or_default();
                continue;
            }
            match mainnets.get(&entry.mainnet) {
                Some(m) if *m == entry.mainnet => {}
                _ => {
                    return Err(NetworkError::InvalidNetwork(format!(
                        "{} refers to {} which is not a mainnet of this table",
                        entry.network, entry.mainnet
                    )))
                }
            }
            testnets.entry(entry.mainnet).or_default().push(entry.network);
        }

        let mut single = HashMap::new();
        for (mainnet, mut candidates) in testnets {
            if candidates.len() > 1 {
                candidates.sort();
                return Err(NetworkError::AmbiguousTestnet {
                    mainnet,
                    testnets: candidates,
                });
            }
            single.insert(mainnet, candidates.pop());
        }

        Ok(NetworkRegistry {
            entries: entries.to_vec(),
            mainnets,
            testnets: single,
        })
    }

    pub fn list_networks(&self) -> Vec<Network> {
        self.entries.iter().map(|e| e.network).collect()
    }

    pub fn params(&self, network: Network) -> Result<&'static NetworkParams, NetworkError> {
        self.entries
            .iter()
            .find(|e| e.network == network)
            .map(|e| e.params)
            .ok_or_else(|| NetworkError::InvalidNetwork(network.to_string()))
    }

    /// Resolve a parameter set to its network by value.
    pub fn network_of(&self, params: &NetworkParams) -> Result<Network, NetworkError> {
        let mut matches = self.entries.iter().filter(|e| e.params == params);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.network),
            (Some(_), Some(_)) => Err(NetworkError::InvalidNetwork(
                "parameters match more than one network".to_string(),
            )),
            (None, _) => Err(NetworkError::InvalidNetwork(
                "parameters do not match any network".to_string(),
            )),
        }
    }

    /// Utxolib-style name of a parameter set, `None` if it is not part of the table.
    pub fn name_of(&self, params: &NetworkParams) -> Option<&'static str> {
        self.network_of(params).ok().map(|n| n.utxolib_name())
    }

    pub fn get_mainnet(&self, network: Network) -> Result<Network, NetworkError> {
        self.mainnets
            .get(&network)
            .copied()
            .ok_or_else(|| NetworkError::InvalidNetwork(network.to_string()))
    }

    /// Testnets map to themselves. Mainnets without a testnet yield `None`.
    pub fn get_testnet(&self, network: Network) -> Result<Option<Network>, NetworkError> {
        if self.is_testnet(network)? {
            return Ok(Some(network));
        }
        self.testnets
            .get(&network)
            .copied()
            .ok_or_else(|| NetworkError::InvalidNetwork(network.to_string()))
    }

    pub fn is_mainnet(&self, network: Network) -> Result<bool, NetworkError> {
        Ok(self.get_mainnet(network)? == network)
    }

    pub fn is_testnet(&self, network: Network) -> Result<bool, NetworkError> {
        Ok(self.get_mainnet(network)? != network)
    }

    pub fn is_same_coin(&self, a: Network, b: Network) -> Result<bool, NetworkError> {
        Ok(self.get_mainnet(a)? == self.get_mainnet(b)?)
    }
}

static REGISTRY: Lazy<NetworkRegistry> = Lazy::new(|| {
    let entries: Vec<NetworkEntry> = Network::ALL.iter().map(|&n| NetworkEntry::of(n)).collect();
    // the table is static, a failure here is a programming error
    NetworkRegistry::new(&entries).unwrap_or_else(|e| panic!("invalid network table: {}", e))
});

/// The process-wide registry built from [`Network::ALL`].
pub fn registry() -> &'static NetworkRegistry {
    &REGISTRY
}
