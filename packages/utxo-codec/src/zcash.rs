//! Zcash transparent transactions
//!
//! Zcash uses an "overwintered transaction format" that includes additional fields
//! not present in standard Bitcoin transactions. Only the transparent part is supported:
//! shielded value, spends, outputs and joinsplits are rejected on decode.
//!
//! https://github.com/zcash/zips/blob/main/protocol/protocol.pdf (section 7.1)

use crate::bitcoin::consensus::encode::serialize;
use crate::bitcoin::consensus::Decodable;
use crate::bitcoin::hashes::{sha256d, Hash};
use crate::bitcoin::locktime::absolute::LockTime;
use crate::bitcoin::{TxIn, TxOut, Txid, VarInt};
use crate::networks::Network;
use crate::transaction::TransactionError;

pub const VERSION_JOINSPLITS_SUPPORT: u32 = 2;
pub const VERSION_OVERWINTER: u32 = 3;
pub const VERSION_SAPLING: u32 = 4;

/// Zcash version group IDs
pub const OVERWINTER_VERSION_GROUP_ID: u32 = 0x03C48270;
pub const SAPLING_VERSION_GROUP_ID: u32 = 0x892F2085;

const OVERWINTERED_FLAG: u32 = 1 << 31;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZcashTransaction {
    /// Version without the overwintered flag
    pub version: u32,
    pub overwintered: bool,
    /// Zero unless overwinter compatible
    pub version_group_id: u32,
    pub input: Vec<TxIn>,
    pub output: Vec<TxOut>,
    pub lock_time: LockTime,
    /// Block height after which this transaction expires, 0 disables expiry
    pub expiry_height: u32,
}

impl ZcashTransaction {
    pub fn is_overwinter_compatible(&self) -> bool {
        self.overwintered && self.version >= VERSION_OVERWINTER
    }

    pub fn is_sapling_compatible(&self) -> bool {
        self.overwintered && self.version >= VERSION_SAPLING
    }

    pub fn supports_join_splits(&self) -> bool {
        self.overwintered && self.version >= VERSION_JOINSPLITS_SUPPORT
    }

    pub fn consensus_branch_id(&self) -> Option<u32> {
        Network::Zcash.consensus_branch_id(self.version)
    }

    /// Decode a transaction from the start of `bytes`, returning it with the number of
    /// bytes consumed.
    pub fn decode_partial(bytes: &[u8]) -> Result<(Self, usize), TransactionError> {
        let mut slice = bytes;

        let header = u32::consensus_decode(&mut slice)?;
        let overwintered = header & OVERWINTERED_FLAG != 0;
        let version = header & !OVERWINTERED_FLAG;
        if Network::Zcash.consensus_branch_id(version).is_none() {
            return Err(TransactionError::UnsupportedVersion(version));
        }

        let mut tx = ZcashTransaction {
            version,
            overwintered,
            version_group_id: 0,
            input: Vec::new(),
            output: Vec::new(),
            lock_time: LockTime::ZERO,
            expiry_height: 0,
        };

        if tx.is_overwinter_compatible() {
            tx.version_group_id = u32::consensus_decode(&mut slice)?;
        }
        tx.input = Vec::<TxIn>::consensus_decode(&mut slice)?;
        tx.output = Vec::<TxOut>::consensus_decode(&mut slice)?;
        tx.lock_time = LockTime::consensus_decode(&mut slice)?;
        if tx.is_overwinter_compatible() {
            tx.expiry_height = u32::consensus_decode(&mut slice)?;
        }

        if tx.is_sapling_compatible() {
            if i64::consensus_decode(&mut slice)? != 0 {
                return Err(TransactionError::UnsupportedShieldedData("valueBalance"));
            }
            if VarInt::consensus_decode(&mut slice)?.0 != 0 {
                return Err(TransactionError::UnsupportedShieldedData("shielded spend"));
            }
            if VarInt::consensus_decode(&mut slice)?.0 != 0 {
                return Err(TransactionError::UnsupportedShieldedData("shielded output"));
            }
        }
        if tx.supports_join_splits() && VarInt::consensus_decode(&mut slice)?.0 != 0 {
            return Err(TransactionError::UnsupportedShieldedData("joinsplit"));
        }

        Ok((tx, bytes.len() - slice.len()))
    }

    /// Decode a complete transaction, rejecting trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        let (tx, consumed) = Self::decode_partial(bytes)?;
        if consumed != bytes.len() {
            return Err(TransactionError::TrailingData(bytes.len() - consumed));
        }
        Ok(tx)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let header = if self.overwintered {
            self.version | OVERWINTERED_FLAG
        } else {
            self.version
        };

        let mut bytes = serialize(&header);
        if self.is_overwinter_compatible() {
            bytes.extend(serialize(&self.version_group_id));
        }
        bytes.extend(serialize(&self.input));
        bytes.extend(serialize(&self.output));
        bytes.extend(serialize(&self.lock_time));
        if self.is_overwinter_compatible() {
            bytes.extend(serialize(&self.expiry_height));
        }
        if self.is_sapling_compatible() {
            bytes.extend(serialize(&0i64)); // valueBalance
            bytes.extend(serialize(&VarInt(0))); // vShieldedSpend
            bytes.extend(serialize(&VarInt(0))); // vShieldedOutput
        }
        if self.supports_join_splits() {
            bytes.extend(serialize(&VarInt(0))); // vJoinSplit
        }
        bytes
    }

    pub fn byte_length(&self) -> usize {
        self.to_bytes().len()
    }

    pub fn txid(&self) -> Txid {
        Txid::from_raw_hash(sha256d::Hash::hash(&self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Witness};

    fn sapling_tx() -> ZcashTransaction {
        ZcashTransaction {
            version: VERSION_SAPLING,
            overwintered: true,
            version_group_id: SAPLING_VERSION_GROUP_ID,
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: ScriptBuf::from(vec![0x51]),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![TxOut {
                value: Amount::from_sat(1000),
                script_pubkey: ScriptBuf::from(
                    hex::decode("76a914f5bf48b397dae70be82b3cca4793f8eb2b6cdac988ac").unwrap(),
                ),
            }],
            lock_time: LockTime::ZERO,
            expiry_height: 1_000_000,
        }
    }

    #[test]
    fn test_sapling_round_trip() {
        let tx = sapling_tx();
        let bytes = tx.to_bytes();
        assert_eq!(&bytes[..4], &[0x04, 0x00, 0x00, 0x80]);
        assert_eq!(&bytes[4..8], &SAPLING_VERSION_GROUP_ID.to_le_bytes());
        // valueBalance, spends, outputs and joinsplits are all empty
        assert_eq!(&bytes[bytes.len() - 11..], &[0u8; 11]);

        let (decoded, consumed) = ZcashTransaction::decode_partial(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, tx);
        assert_eq!(decoded.byte_length(), bytes.len());
        assert_eq!(decoded.consensus_branch_id(), Some(0xe9ff75a6));
    }

    #[test]
    fn test_decode_partial_stops_at_end() {
        let mut bytes = sapling_tx().to_bytes();
        let len = bytes.len();
        bytes.extend_from_slice(&[0xde, 0xad]);

        let (_, consumed) = ZcashTransaction::decode_partial(&bytes).unwrap();
        assert_eq!(consumed, len);
        assert_eq!(
            ZcashTransaction::decode(&bytes),
            Err(TransactionError::TrailingData(2))
        );
    }

    #[test]
    fn test_legacy_version() {
        let mut tx = sapling_tx();
        tx.version = 1;
        tx.overwintered = false;
        tx.version_group_id = 0;
        tx.expiry_height = 0;
        let bytes = tx.to_bytes();
        assert_eq!(ZcashTransaction::decode(&bytes).unwrap(), tx);
        assert_eq!(tx.consensus_branch_id(), Some(0));
    }

    #[test]
    fn test_rejects_shielded_data() {
        let tx = sapling_tx();
        let mut bytes = tx.to_bytes();
        let value_balance = bytes.len() - 11;
        bytes[value_balance] = 1;
        assert_eq!(
            ZcashTransaction::decode(&bytes),
            Err(TransactionError::UnsupportedShieldedData("valueBalance"))
        );

        let mut bytes = tx.to_bytes();
        let joinsplits = bytes.len() - 1;
        bytes[joinsplits] = 1;
        assert_eq!(
            ZcashTransaction::decode(&bytes),
            Err(TransactionError::UnsupportedShieldedData("joinsplit"))
        );
    }

    #[test]
    fn test_rejects_v5() {
        let mut bytes = sapling_tx().to_bytes();
        bytes[0] = 5;
        assert_eq!(
            ZcashTransaction::decode(&bytes),
            Err(TransactionError::UnsupportedVersion(5))
        );
    }

    #[test]
    fn test_truncated() {
        let bytes = sapling_tx().to_bytes();
        assert!(matches!(
            ZcashTransaction::decode(&bytes[..bytes.len() - 3]),
            Err(TransactionError::Decode(_))
        ));
    }
}
