//! Base58Check encoding/decoding for P2PKH and P2SH addresses.

use super::{AddressCodec, AddressError, Result};
use crate::bitcoin::{base58, Script, ScriptBuf};
use crate::networks::Network;
use crate::script::{classify, ScriptType};

const HASH_LEN: usize = 20;

/// Base58Check codec with network-specific version bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base58CheckCodec {
    /// Base58Check P2PKH version byte(s)
    pub pub_key_hash: u32,
    /// Base58Check P2SH version byte(s)
    pub script_hash: u32,
    /// Number of version bytes preceding the hash, 2 for Zcash and 1 otherwise
    pub version_len: usize,
}

impl Base58CheckCodec {
    pub const fn new(pub_key_hash: u32, script_hash: u32, version_len: usize) -> Self {
        Self {
            pub_key_hash,
            script_hash,
            version_len,
        }
    }

    pub fn for_network(network: Network) -> Self {
        let params = network.params();
        let version_len = if network.is_zcash() { 2 } else { 1 };
        Self::new(params.pub_key_hash, params.script_hash, version_len)
    }
}

/// Encode `version ‖ hash` with a trailing double-SHA256 checksum.
pub fn to_base58_check(hash: &[u8], version: u32, version_len: usize) -> Result<String> {
    if !(1..=4).contains(&version_len) || (version_len < 4 && version >> (8 * version_len) != 0)
    {
        return Err(AddressError::Base58Error(format!(
            "version {:#x} does not fit in {} byte(s)",
            version, version_len
        )));
    }
    let mut data = Vec::with_capacity(version_len + hash.len());
    data.extend_from_slice(&version.to_be_bytes()[4 - version_len..]);
    data.extend_from_slice(hash);
    Ok(base58::encode_check(&data))
}

/// Decode a Base58Check address into `(version, hash)`.
///
/// The payload must be exactly `version_len` version bytes followed by a 20 byte hash.
pub fn from_base58_check(address: &str, version_len: usize) -> Result<(u32, Vec<u8>)> {
    let payload =
        base58::decode_check(address).map_err(|e| AddressError::Base58Error(e.to_string()))?;

    if !(1..=4).contains(&version_len) || payload.len() != version_len + HASH_LEN {
        return Err(AddressError::Base58Error(format!(
            "invalid payload length {}, expected {}",
            payload.len(),
            version_len + HASH_LEN
        )));
    }

    let (version_bytes, hash) = payload.split_at(version_len);
    let version = version_bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | b as u32);
    Ok((version, hash.to_vec()))
}

impl AddressCodec for Base58CheckCodec {
    fn encode(&self, script: &Script) -> Result<String> {
        match classify(script) {
            ScriptType::PubKeyHash(hash) => {
                to_base58_check(&hash, self.pub_key_hash, self.version_len)
            }
            ScriptType::ScriptHash(hash) => {
                to_base58_check(&hash, self.script_hash, self.version_len)
            }
            other => Err(AddressError::UnsupportedAddressOrScript(format!(
                "base58check cannot encode {} script",
                other
            ))),
        }
    }

    fn decode(&self, address: &str) -> Result<ScriptBuf> {
        let (version, hash) = from_base58_check(address, self.version_len)?;
        let hash: [u8; HASH_LEN] = hash
            .try_into()
            .map_err(|_| AddressError::Base58Error("invalid hash length".to_string()))?;

        let script_type = if version == self.pub_key_hash {
            ScriptType::PubKeyHash(hash)
        } else if version == self.script_hash {
            ScriptType::ScriptHash(hash)
        } else {
            return Err(AddressError::InvalidAddress(format!(
                "version mismatch: expected {:#x} or {:#x}, got {:#x}",
                self.pub_key_hash, self.script_hash, version
            )));
        };
        script_type.to_output_script().ok_or_else(|| {
            AddressError::InvalidAddress(format!("cannot build {} script", script_type))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "f5bf48b397dae70be82b3cca4793f8eb2b6cdac9";

    #[test]
    fn test_bitcoin_vectors() {
        let hash = hex::decode(HASH).unwrap();
        assert_eq!(
            to_base58_check(&hash, 0x00, 1).unwrap(),
            "1PQPheJQSauxRPTxzNMUco1XmoCyPoEJCp"
        );
        let (version, decoded) = from_base58_check("1PQPheJQSauxRPTxzNMUco1XmoCyPoEJCp", 1).unwrap();
        assert_eq!(version, 0x00);
        assert_eq!(decoded, hash);
    }

    #[test]
    fn test_zcash_two_byte_versions() {
        let hash = hex::decode(HASH).unwrap();
        let address = to_base58_check(&hash, 0x1cb8, 2).unwrap();
        assert!(address.starts_with("t1"));

        let (version, decoded) = from_base58_check(&address, 2).unwrap();
        assert_eq!(version, 0x1cb8);
        assert_eq!(decoded, hash);

        // the version width is fixed by the codec, not guessed from the payload
        assert!(from_base58_check(&address, 1).is_err());
    }

    #[test]
    fn test_version_too_wide() {
        let hash = hex::decode(HASH).unwrap();
        assert!(to_base58_check(&hash, 0x1cb8, 1).is_err());
        assert!(to_base58_check(&hash, 0x00, 0).is_err());
    }

    #[test]
    fn test_bad_checksum() {
        assert!(matches!(
            from_base58_check("1PQPheJQSauxRPTxzNMUco1XmoCyPoEJCq", 1),
            Err(AddressError::Base58Error(_))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let codec = Base58CheckCodec::for_network(Network::Litecoin);
        assert!(matches!(
            codec.decode("1PQPheJQSauxRPTxzNMUco1XmoCyPoEJCp"),
            Err(AddressError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_encode_rejects_witness_script() {
        let codec = Base58CheckCodec::for_network(Network::Bitcoin);
        let script =
            ScriptBuf::from(hex::decode("0014f5bf48b397dae70be82b3cca4793f8eb2b6cdac9").unwrap());
        assert!(matches!(
            codec.encode(&script),
            Err(AddressError::UnsupportedAddressOrScript(_))
        ));
    }
}
