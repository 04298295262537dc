//! Network-aware address encoding and decoding.
//!
//! This module bridges the Network enum with address codecs. Every network has a default
//! format (base58check plus bech32/bech32m where supported). Bitcoin Cash and eCash can
//! additionally use cashaddr.

use super::{
    check_address_length, from_output_script_try_codecs, to_output_script_try_codecs,
    AddressCodec, AddressError, Base58CheckCodec, Bech32Codec, CashAddrCodec, Result,
    TaprootCodec,
};
use crate::bitcoin::{Script, ScriptBuf};
use crate::networks::Network;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Address encoding format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFormat {
    /// Use default address encoding
    /// In most cases, there is one unambiguous address encoding for a given network and script type.
    /// For Bitcoin Cash, Base58Check is the default.
    Default,
    /// For Bitcoin Cash and eCash, there is a choice of address formats: base58check or cashaddr.
    Cashaddr,
}

impl AddressFormat {
    pub const ALL: &'static [AddressFormat] = &[AddressFormat::Default, AddressFormat::Cashaddr];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFormat::Default => "default",
            AddressFormat::Cashaddr => "cashaddr",
        }
    }

    /// Parse an AddressFormat from an optional string.
    /// Returns Default if None or if the string is empty.
    pub fn from_optional_str(s: Option<&str>) -> Result<Self> {
        match s {
            None | Some("") => Ok(Self::Default),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AddressFormat {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self> {
        AddressFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                AddressError::InvalidAddress(format!(
                    "Unknown address format: {}. Valid formats are: 'default', 'cashaddr'",
                    s
                ))
            })
    }
}

pub fn is_supported_address_format(format: AddressFormat, network: Network) -> bool {
    match format {
        AddressFormat::Default => true,
        AddressFormat::Cashaddr => network.params().cash_addr.is_some(),
    }
}

pub fn get_supported_address_formats(network: Network) -> Vec<AddressFormat> {
    AddressFormat::ALL
        .iter()
        .copied()
        .filter(|&f| is_supported_address_format(f, network))
        .collect()
}

/// Run `f` with the default codecs of `network` in dispatch order: taproot, base58check,
/// then witness v0. Zcash only has its two-byte base58check codec.
fn with_default_codecs<T>(network: Network, f: impl FnOnce(&[&dyn AddressCodec]) -> T) -> T {
    let taproot = TaprootCodec::for_network(network);
    let base58 = Base58CheckCodec::for_network(network);
    let segwit = Bech32Codec::for_network(network);

    let mut codecs: Vec<&dyn AddressCodec> = Vec::with_capacity(3);
    if let Some(codec) = &taproot {
        codecs.push(codec);
    }
    codecs.push(&base58);
    if let Some(codec) = &segwit {
        codecs.push(codec);
    }
    f(&codecs)
}

fn cashaddr_codec(network: Network) -> Result<CashAddrCodec> {
    CashAddrCodec::for_network(network).ok_or(AddressError::UnsupportedFormat {
        format: AddressFormat::Cashaddr,
        network,
    })
}

/// Convert an output script to an address string using a Network.
/// Automatically selects the appropriate format based on the script type.
pub fn from_output_script_with_network(script: &Script, network: Network) -> Result<String> {
    from_output_script_with_network_and_format(script, network, AddressFormat::Default)
}

/// Convert an output script to an address string using a Network and format.
pub fn from_output_script_with_network_and_format(
    script: &Script,
    network: Network,
    format: AddressFormat,
) -> Result<String> {
    match format {
        AddressFormat::Default => {
            with_default_codecs(network, |codecs| from_output_script_try_codecs(script, codecs))
        }
        AddressFormat::Cashaddr => cashaddr_codec(network)?.encode(script),
    }
}

/// Convert an address string in the default format of `network` to an output script.
pub fn to_output_script_with_network(address: &str, network: Network) -> Result<ScriptBuf> {
    to_output_script_with_format(address, network, AddressFormat::Default)
}

pub fn to_output_script_with_format(
    address: &str,
    network: Network,
    format: AddressFormat,
) -> Result<ScriptBuf> {
    match format {
        AddressFormat::Default => {
            with_default_codecs(network, |codecs| to_output_script_try_codecs(address, codecs))
        }
        AddressFormat::Cashaddr => cashaddr_codec(network)?.decode(address),
    }
}

/// Decode with the first of `formats` that accepts the address.
///
/// `formats` defaults to every format supported by `network`.
pub fn to_output_script_and_format(
    address: &str,
    network: Network,
    formats: Option<&[AddressFormat]>,
) -> Result<(ScriptBuf, AddressFormat)> {
    check_address_length(address)?;
    let formats = match formats {
        Some(formats) => formats.to_vec(),
        None => get_supported_address_formats(network),
    };

    let mut errors = Vec::with_capacity(formats.len());
    for format in formats {
        match to_output_script_with_format(address, network, format) {
            Ok(script) => return Ok((script, format)),
            Err(e) => {
                debug!("{} is not a {} address on {}: {}", address, format, network, e);
                errors.push((format, e));
            }
        }
    }

    Err(AddressError::NoMatchingFormat {
        address: address.to_string(),
        errors,
    })
}

pub fn to_output_script_try_formats(
    address: &str,
    network: Network,
    formats: Option<&[AddressFormat]>,
) -> Result<ScriptBuf> {
    to_output_script_and_format(address, network, formats).map(|(script, _)| script)
}

/// Re-encode any accepted spelling of `address` in the default format.
pub fn to_canonical_format(address: &str, network: Network) -> Result<String> {
    let script = to_output_script_try_formats(address, network, None)?;
    from_output_script_with_network(&script, network)
}

fn network_from_coin(coin: &str) -> Result<Network> {
    Network::from_coin_name(coin).ok_or_else(|| AddressError::UnknownCoin(coin.to_string()))
}

/// Convert an address string to an output script using a BitGo coin name.
/// Any address format supported by the coin is accepted.
pub fn to_output_script_with_coin(address: &str, coin: &str) -> Result<ScriptBuf> {
    to_output_script_try_formats(address, network_from_coin(coin)?, None)
}

/// Convert an output script to an address string using a BitGo coin name.
pub fn from_output_script_with_coin(script: &Script, coin: &str) -> Result<String> {
    from_output_script_with_coin_and_format(script, coin, AddressFormat::Default)
}

/// Convert an output script to an address string using a BitGo coin name and format.
pub fn from_output_script_with_coin_and_format(
    script: &Script,
    coin: &str,
    format: AddressFormat,
) -> Result<String> {
    from_output_script_with_network_and_format(script, network_from_coin(coin)?, format)
}

pub fn to_canonical_format_with_coin(address: &str, coin: &str) -> Result<String> {
    to_canonical_format(address, network_from_coin(coin)?)
}
