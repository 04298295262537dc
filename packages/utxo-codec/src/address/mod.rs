//! Address encoding and decoding for multiple networks and formats.
//!
//! # Supported Address Formats
//!
//! - **Base58Check**: P2PKH and P2SH addresses. Zcash uses two-byte version prefixes.
//! - **Bech32/Bech32m**: witness programs (P2WPKH, P2WSH and P2TR)
//! - **Cashaddr**: Bitcoin Cash and eCash
//!
//! Each format is an [`AddressCodec`] configured from the network parameters. The functions in
//! [`networks`] pick the codecs for a network and address format.

mod base58check;
mod bech32;
pub mod cashaddr;
pub mod networks;

pub use base58check::{from_base58_check, to_base58_check, Base58CheckCodec};
pub use self::bech32::{from_bech32, to_bech32, Bech32Codec, TaprootCodec};
pub use cashaddr::{
    from_output_script_to_cash_addr, to_output_script_from_cash_addr, CashAddrCodec,
};
pub use networks::{
    from_output_script_with_coin, from_output_script_with_coin_and_format,
    from_output_script_with_network, from_output_script_with_network_and_format,
    get_supported_address_formats, is_supported_address_format, to_canonical_format,
    to_canonical_format_with_coin, to_output_script_and_format, to_output_script_try_formats,
    to_output_script_with_coin, to_output_script_with_format, to_output_script_with_network,
    AddressFormat,
};

use crate::bitcoin::{Script, ScriptBuf};
use crate::networks::{Network, NetworkError};
use log::debug;
use thiserror::Error;

/// Longest address string accepted for decoding.
pub const MAX_ADDRESS_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("unsupported address or script: {0}")]
    UnsupportedAddressOrScript(String),
    #[error("address {address} does not match any format: {}", describe_format_errors(.errors))]
    NoMatchingFormat {
        address: String,
        /// Rejection of each format tried, in order
        errors: Vec<(AddressFormat, AddressError)>,
    },
    #[error("cannot encode {0} script as cashaddr")]
    UnclassifiableScript(String),
    #[error("mixed case address: {0}")]
    MixedCaseAddress(String),
    #[error("unknown cashaddr version byte: {0:#04x}")]
    UnknownCashAddrVersion(u8),
    #[error("address format {format} is not supported for network {network}")]
    UnsupportedFormat {
        format: AddressFormat,
        network: Network,
    },
    #[error("address is {length} characters, the limit is {}", MAX_ADDRESS_LENGTH)]
    AddressTooLong { length: usize },
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("base58 error: {0}")]
    Base58Error(String),
    #[error("bech32 error: {0}")]
    Bech32Error(String),
    #[error("cashaddr error: {0}")]
    CashaddrError(String),
    #[error("unknown coin: {0}")]
    UnknownCoin(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type Result<T> = std::result::Result<T, AddressError>;

fn describe_format_errors(errors: &[(AddressFormat, AddressError)]) -> String {
    if errors.is_empty() {
        return "no formats tried".to_string();
    }
    errors
        .iter()
        .map(|(format, e)| format!("{}: {}", format, e))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trait for address encoding and decoding
pub trait AddressCodec {
    fn encode(&self, script: &Script) -> Result<String>;
    fn decode(&self, address: &str) -> Result<ScriptBuf>;
}

pub(crate) fn check_address_length(address: &str) -> Result<()> {
    if address.len() > MAX_ADDRESS_LENGTH {
        return Err(AddressError::AddressTooLong {
            length: address.len(),
        });
    }
    Ok(())
}

/// Decode with the first codec that accepts the address.
pub fn to_output_script_try_codecs(
    address: &str,
    codecs: &[&dyn AddressCodec],
) -> Result<ScriptBuf> {
    check_address_length(address)?;
    for &codec in codecs {
        match codec.decode(address) {
            Ok(script) => return Ok(script),
            Err(e) => debug!("codec rejected {}: {}", address, e),
        }
    }

    Err(AddressError::UnsupportedAddressOrScript(format!(
        "could not decode address {}",
        address
    )))
}

/// Encode with the first codec that accepts the script.
pub fn from_output_script_try_codecs(
    script: &Script,
    codecs: &[&dyn AddressCodec],
) -> Result<String> {
    for &codec in codecs {
        match codec.encode(script) {
            Ok(address) => return Ok(address),
            Err(e) => debug!("codec rejected script {}: {}", script.to_hex_string(), e),
        }
    }

    Err(AddressError::UnsupportedAddressOrScript(format!(
        "could not encode {} script {}",
        crate::script::classify(script),
        script.to_hex_string()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcoin::hashes::Hash;
    use crate::bitcoin::{PubkeyHash, ScriptHash};
    use crate::networks::Network;

    #[test]
    fn test_base58_roundtrip() {
        let hash = hex::decode("1e231c7f9b3415daaa53ee5a7e12e120f00ec212").unwrap();
        let pubkey_hash = PubkeyHash::from_byte_array(hash.try_into().unwrap());
        let script = ScriptBuf::new_p2pkh(&pubkey_hash);

        let codec = Base58CheckCodec::for_network(Network::Bitcoin);
        let encoded = codec.encode(&script).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), script);
    }

    #[test]
    fn test_try_codecs_order() {
        let hash = hex::decode("F5BF48B397DAE70BE82B3CCA4793F8EB2B6CDAC9").unwrap();
        let script = ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(hash.try_into().unwrap()));
        let base58 = Base58CheckCodec::for_network(Network::BitcoinCashTestnet);
        let cashaddr = CashAddrCodec::for_network(Network::BitcoinCashTestnet).unwrap();
        let codecs: &[&dyn AddressCodec] = &[&base58, &cashaddr];

        let decoded = to_output_script_try_codecs(
            "bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t",
            codecs,
        )
        .unwrap();
        assert_eq!(decoded, script);

        let legacy = base58.encode(&script).unwrap();
        assert_eq!(to_output_script_try_codecs(&legacy, codecs).unwrap(), script);
    }

    #[test]
    fn test_try_codecs_none_match() {
        let base58 = Base58CheckCodec::for_network(Network::Dash);
        let result = to_output_script_try_codecs("1PQPheJQSauxRPTxzNMUco1XmoCyPoEJCp", &[&base58]);
        assert!(matches!(
            result,
            Err(AddressError::UnsupportedAddressOrScript(_))
        ));
    }

    #[test]
    fn test_address_too_long() {
        let base58 = Base58CheckCodec::for_network(Network::Bitcoin);
        let address = "1".repeat(MAX_ADDRESS_LENGTH + 1);
        assert_eq!(
            to_output_script_try_codecs(&address, &[&base58]),
            Err(AddressError::AddressTooLong {
                length: MAX_ADDRESS_LENGTH + 1
            })
        );
    }
}
