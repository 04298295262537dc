//! Cashaddr encoding/decoding for Bitcoin Cash and eCash.
//!
//! Format: https://github.com/bitcoincashorg/bitcoincash.org/blob/master/spec/cashaddr.md
//! Reference implementation: https://github.com/Bitcoin-ABC/bitcoin-abc/blob/master/src/cashaddr.cpp
//!
//! Cashaddr shares the base32 alphabet with bech32 but nothing else: the checksum is a 40 bit
//! polymod over a different set of generators, the prefix expansion only keeps the low five
//! bits of each character, and non-zero padding is rejected. Only [`Fe32`] is taken from the
//! bech32 crate, for the character mapping.

use super::{check_address_length, AddressCodec, AddressError, Result};
use crate::bitcoin::{Script, ScriptBuf};
use crate::networks::{CashAddrParams, Network};
use crate::script::{classify, ScriptType};
use bech32::Fe32;

const CHECKSUM_LEN: usize = 8;
const HASH_LEN: usize = 20;

/// Type bits of the version byte. The low three bits hold the hash size, 0 for 20 bytes.
const TYPE_P2PKH: u8 = 0x00;
const TYPE_P2SH: u8 = 0x08;

/// CashAddr codec for Bitcoin Cash and eCash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashAddrCodec {
    /// Cashaddr prefix (e.g., "bitcoincash", "ecash")
    pub prefix: &'static str,
    /// P2PKH version byte
    pub pub_key_hash: u8,
    /// P2SH version byte
    pub script_hash: u8,
}

impl CashAddrCodec {
    pub const fn new(prefix: &'static str, pub_key_hash: u8, script_hash: u8) -> Self {
        Self {
            prefix,
            pub_key_hash,
            script_hash,
        }
    }

    pub fn from_params(params: &CashAddrParams) -> Self {
        Self::new(params.prefix, params.pub_key_hash, params.script_hash)
    }

    /// `None` unless the network has a cashaddr prefix
    pub fn for_network(network: Network) -> Option<Self> {
        network.params().cash_addr.as_ref().map(Self::from_params)
    }
}

impl Default for CashAddrCodec {
    fn default() -> Self {
        Self::new("bitcoincash", TYPE_P2PKH, TYPE_P2SH)
    }
}

fn polymod(values: impl IntoIterator<Item = u8>) -> u64 {
    const GENERATORS: [u64; 5] = [
        0x98f2bc8e61,
        0x79b76d99e2,
        0xf33e5fb3c4,
        0xae2eabe2a8,
        0x1e4f43e470,
    ];

    let mut c: u64 = 1;
    for d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07ffffffff) << 5) ^ (d as u64);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

/// Lower five bits of each prefix character followed by a zero separator
fn expand_prefix(prefix: &str) -> impl Iterator<Item = u8> + '_ {
    prefix.bytes().map(|b| b & 0x1f).chain(std::iter::once(0))
}

/// Regroup a bit stream from `from`-bit to `to`-bit values.
///
/// With `pad` the last group is zero padded. Without it, leftover bits must be fewer than
/// `from` and all zero.
fn regroup(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        if (value as u32) >> from != 0 {
            return Err(AddressError::CashaddrError(format!(
                "value {} does not fit in {} bits",
                value, from
            )));
        }
        acc = (acc << from) | value as u32;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
        acc &= (1 << bits) - 1;
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || acc != 0 {
        return Err(AddressError::CashaddrError("non-zero padding".to_string()));
    }
    Ok(out)
}

/// Encode a version byte and hash as `prefix:payload`.
pub fn encode_cashaddr(prefix: &str, version: u8, hash: &[u8]) -> Result<String> {
    let mut payload = Vec::with_capacity(1 + hash.len());
    payload.push(version);
    payload.extend_from_slice(hash);
    let mut data = regroup(&payload, 8, 5, true)?;

    let checksum = polymod(
        expand_prefix(prefix)
            .chain(data.iter().copied())
            .chain([0; CHECKSUM_LEN]),
    );
    data.extend((0..CHECKSUM_LEN).map(|i| ((checksum >> (5 * (7 - i))) & 0x1f) as u8));

    let mut address = String::with_capacity(prefix.len() + 1 + data.len());
    address.push_str(prefix);
    address.push(':');
    for value in data {
        let fe = Fe32::try_from(value)
            .map_err(|_| AddressError::CashaddrError(format!("invalid 5 bit value {}", value)))?;
        address.push(fe.to_char());
    }
    Ok(address)
}

/// Apply the case and prefix rules, returning `prefix:payload` in lowercase.
///
/// All-uppercase input is lowercased, any other mix of cases is rejected, and a missing
/// prefix is filled in with `prefix`.
pub fn normalize_cashaddr(address: &str, prefix: &str) -> Result<String> {
    let address = if address.chars().any(|c| c.is_ascii_lowercase()) {
        address.to_string()
    } else {
        address.to_ascii_lowercase()
    };
    if address.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AddressError::MixedCaseAddress(address));
    }

    match address.split_once(':') {
        None => Ok(format!("{}:{}", prefix, address)),
        Some((p, _)) if p == prefix => Ok(address),
        Some((p, _)) => Err(AddressError::CashaddrError(format!(
            "prefix mismatch: expected {}, got {}",
            prefix, p
        ))),
    }
}

/// Decode `address` into its version byte and hash.
pub fn decode_cashaddr(address: &str, prefix: &str) -> Result<(u8, Vec<u8>)> {
    let normalized = normalize_cashaddr(address, prefix)?;
    let payload = &normalized[prefix.len() + 1..];

    let data = payload
        .chars()
        .map(|ch| {
            Fe32::from_char(ch)
                .map(|fe| fe.to_u8())
                .map_err(|_| AddressError::CashaddrError(format!("invalid character: {}", ch)))
        })
        .collect::<Result<Vec<u8>>>()?;

    if data.len() <= CHECKSUM_LEN {
        return Err(AddressError::CashaddrError("payload too short".to_string()));
    }
    if polymod(expand_prefix(prefix).chain(data.iter().copied())) != 0 {
        return Err(AddressError::CashaddrError("invalid checksum".to_string()));
    }

    let bytes = regroup(&data[..data.len() - CHECKSUM_LEN], 5, 8, false)?;
    match bytes.split_first() {
        Some((&version, hash)) => Ok((version, hash.to_vec())),
        None => Err(AddressError::CashaddrError("empty payload".to_string())),
    }
}

impl AddressCodec for CashAddrCodec {
    fn encode(&self, script: &Script) -> Result<String> {
        match classify(script) {
            ScriptType::PubKeyHash(hash) => encode_cashaddr(self.prefix, self.pub_key_hash, &hash),
            ScriptType::ScriptHash(hash) => encode_cashaddr(self.prefix, self.script_hash, &hash),
            other => Err(AddressError::UnclassifiableScript(other.name().to_string())),
        }
    }

    fn decode(&self, address: &str) -> Result<ScriptBuf> {
        check_address_length(address)?;
        let (version, hash) = decode_cashaddr(address, self.prefix)?;

        let to_hash = |hash: Vec<u8>| -> Result<[u8; HASH_LEN]> {
            hash.try_into().map_err(|h: Vec<u8>| {
                AddressError::CashaddrError(format!("invalid hash length {}", h.len()))
            })
        };
        let script_type = if version == self.pub_key_hash {
            ScriptType::PubKeyHash(to_hash(hash)?)
        } else if version == self.script_hash {
            ScriptType::ScriptHash(to_hash(hash)?)
        } else {
            return Err(AddressError::UnknownCashAddrVersion(version));
        };
        script_type.to_output_script().ok_or_else(|| {
            AddressError::InvalidAddress(format!("cannot build {} script", script_type))
        })
    }
}

fn codec_for(network: Network) -> Result<CashAddrCodec> {
    CashAddrCodec::for_network(network).ok_or(AddressError::UnsupportedFormat {
        format: super::AddressFormat::Cashaddr,
        network,
    })
}

pub fn from_output_script_to_cash_addr(script: &Script, network: Network) -> Result<String> {
    codec_for(network)?.encode(script)
}

pub fn to_output_script_from_cash_addr(address: &str, network: Network) -> Result<ScriptBuf> {
    codec_for(network)?.decode(address)
}
