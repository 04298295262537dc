//! Block (de)serialization with the Zcash extended header.
//!
//! A block is a header followed by an optional var-int prefixed transaction list. The
//! standard header is 80 bytes; the Zcash header adds the final sapling root, a 32 byte
//! nonce and the Equihash solution for a total of 1487 bytes.

pub mod merkle;
pub mod target;

use crate::bitcoin::consensus::encode::{self, serialize};
use crate::bitcoin::consensus::Decodable;
use crate::bitcoin::hashes::{sha256d, Hash};
use crate::bitcoin::{BlockHash, VarInt};
use crate::networks::Network;
use crate::transaction::{TransactionError, UtxoTransaction};
use log::trace;

pub use merkle::{fast_merkle_root, witness_commitment};
pub use target::{calculate_target, hash_meets_target};

pub const STANDARD_HEADER_SIZE: usize = 80;
pub const ZCASH_HEADER_SIZE: usize = 1487;
pub const ZCASH_SOLUTION_SIZE: usize = 1344;
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 32 * 1024 * 1024;
/// version, input count, output count and lock time of an empty transaction
pub const MIN_TRANSACTION_SIZE: usize = 10;

/// `OP_RETURN OP_PUSHBYTES_36 0xaa21a9ed`
const WITNESS_COMMIT_PREFIX: [u8; 6] = [0x6a, 0x24, 0xaa, 0x21, 0xa9, 0xed];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("truncated block header: expected {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },
    #[error("block of {size} bytes exceeds the limit of {max} bytes")]
    BlockTooLarge { size: usize, max: usize },
    #[error("transaction count {0} does not fit in the remaining block data")]
    InvalidTransactionCount(u64),
    #[error("invalid Equihash solution size {0}, expected {}", ZCASH_SOLUTION_SIZE)]
    InvalidSolutionSize(u64),
    #[error("unexpected {0} trailing byte(s) after block")]
    TrailingData(usize),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("failed to decode block: {0}")]
    Decode(String),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl From<encode::Error> for BlockError {
    fn from(e: encode::Error) -> Self {
        BlockError::Decode(e.to_string())
    }
}

/// Upper bounds applied while decoding untrusted block data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_block_size: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        DecodeLimits {
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        }
    }
}

/// Header fields that differ between standard and Zcash blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLayout {
    Standard {
        nonce: u32,
    },
    Zcash {
        final_sapling_root: [u8; 32],
        nonce: [u8; 32],
        solution: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub network: Network,
    pub version: i32,
    pub prev_hash: [u8; 32],
    pub merkle_root: [u8; 32],
    pub timestamp: u32,
    pub bits: u32,
    pub layout: HeaderLayout,
    /// `None` for a headers-only block
    pub transactions: Option<Vec<UtxoTransaction>>,
}

fn header_size(network: Network) -> usize {
    if network.is_zcash() {
        ZCASH_HEADER_SIZE
    } else {
        STANDARD_HEADER_SIZE
    }
}

fn take<'a>(slice: &mut &'a [u8], n: usize) -> Result<&'a [u8], BlockError> {
    if slice.len() < n {
        return Err(BlockError::Decode(format!(
            "expected {} more bytes, got {}",
            n,
            slice.len()
        )));
    }
    let (head, tail) = slice.split_at(n);
    *slice = tail;
    Ok(head)
}

impl Block {
    pub fn from_bytes(bytes: &[u8], network: Network) -> Result<Self, BlockError> {
        Self::from_bytes_with_limits(bytes, network, DecodeLimits::default())
    }

    pub fn from_bytes_with_limits(
        bytes: &[u8],
        network: Network,
        limits: DecodeLimits,
    ) -> Result<Self, BlockError> {
        if bytes.len() > limits.max_block_size {
            return Err(BlockError::BlockTooLarge {
                size: bytes.len(),
                max: limits.max_block_size,
            });
        }
        let expected = header_size(network);
        if bytes.len() < expected {
            return Err(BlockError::TruncatedHeader {
                expected,
                actual: bytes.len(),
            });
        }

        let mut slice = bytes;
        let version = i32::consensus_decode(&mut slice)?;
        let prev_hash = <[u8; 32]>::consensus_decode(&mut slice)?;
        let merkle_root = <[u8; 32]>::consensus_decode(&mut slice)?;
        let final_sapling_root = if network.is_zcash() {
            Some(<[u8; 32]>::consensus_decode(&mut slice)?)
        } else {
            None
        };
        let timestamp = u32::consensus_decode(&mut slice)?;
        let bits = u32::consensus_decode(&mut slice)?;

        let layout = match final_sapling_root {
            Some(final_sapling_root) => {
                let nonce = <[u8; 32]>::consensus_decode(&mut slice)?;
                let solution_size = VarInt::consensus_decode(&mut slice)?.0;
                if solution_size != ZCASH_SOLUTION_SIZE as u64 {
                    return Err(BlockError::InvalidSolutionSize(solution_size));
                }
                let solution = take(&mut slice, ZCASH_SOLUTION_SIZE)?.to_vec();
                HeaderLayout::Zcash {
                    final_sapling_root,
                    nonce,
                    solution,
                }
            }
            None => HeaderLayout::Standard {
                nonce: u32::consensus_decode(&mut slice)?,
            },
        };

        let mut block = Block {
            network,
            version,
            prev_hash,
            merkle_root,
            timestamp,
            bits,
            layout,
            transactions: None,
        };

        if slice.is_empty() {
            trace!("decoded headers-only {} block", network);
            return Ok(block);
        }

        let count = VarInt::consensus_decode(&mut slice)?.0;
        let max_count = (slice.len() / MIN_TRANSACTION_SIZE) as u64;
        if count > max_count {
            return Err(BlockError::InvalidTransactionCount(count));
        }

        let mut transactions = Vec::with_capacity(count.min(max_count) as usize);
        for index in 0..count {
            let (tx, consumed) = UtxoTransaction::decode_partial(slice, network)?;
            trace!("decoded transaction {} ({} bytes)", index, consumed);
            slice = &slice[consumed..];
            transactions.push(tx);
        }
        if !slice.is_empty() {
            return Err(BlockError::TrailingData(slice.len()));
        }

        trace!(
            "decoded {} block with {} transaction(s)",
            network,
            transactions.len()
        );
        block.transactions = Some(transactions);
        Ok(block)
    }

    pub fn from_hex(hex: &str, network: Network) -> Result<Self, BlockError> {
        let bytes = hex::decode(hex.trim()).map_err(|e| BlockError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes, network)
    }

    pub fn header_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(header_size(self.network));
        bytes.extend(serialize(&self.version));
        bytes.extend_from_slice(&self.prev_hash);
        bytes.extend_from_slice(&self.merkle_root);
        if let HeaderLayout::Zcash {
            final_sapling_root, ..
        } = &self.layout
        {
            bytes.extend_from_slice(final_sapling_root);
        }
        bytes.extend(serialize(&self.timestamp));
        bytes.extend(serialize(&self.bits));
        match &self.layout {
            HeaderLayout::Standard { nonce } => bytes.extend(serialize(nonce)),
            HeaderLayout::Zcash {
                nonce, solution, ..
            } => {
                bytes.extend_from_slice(nonce);
                bytes.extend(serialize(&VarInt(solution.len() as u64)));
                bytes.extend_from_slice(solution);
            }
        }
        bytes
    }

    /// The same block without its transactions
    pub fn header(&self) -> Block {
        Block {
            transactions: None,
            ..self.clone()
        }
    }

    pub fn to_bytes(&self, headers_only: bool) -> Vec<u8> {
        let mut bytes = self.header_bytes();
        if headers_only {
            return bytes;
        }
        if let Some(transactions) = &self.transactions {
            bytes.extend(serialize(&VarInt(transactions.len() as u64)));
            for tx in transactions {
                bytes.extend(tx.to_bytes());
            }
        }
        bytes
    }

    pub fn to_hex(&self, headers_only: bool) -> String {
        hex::encode(self.to_bytes(headers_only))
    }

    pub fn byte_length(&self, headers_only: bool) -> usize {
        let header = self.header_bytes().len();
        match &self.transactions {
            Some(transactions) if !headers_only => {
                header
                    + serialize(&VarInt(transactions.len() as u64)).len()
                    + transactions.iter().map(|tx| tx.byte_length()).sum::<usize>()
            }
            _ => header,
        }
    }

    pub fn transactions(&self) -> Option<&[UtxoTransaction]> {
        self.transactions.as_deref()
    }

    /// Double SHA256 of the serialized header
    pub fn get_hash(&self) -> BlockHash {
        BlockHash::from_raw_hash(sha256d::Hash::hash(&self.header_bytes()))
    }

    /// Block hash in display (reversed) byte order
    pub fn get_id(&self) -> String {
        self.get_hash().to_string()
    }

    /// Merkle root of `transactions`. With `for_witness`, the witness commitment
    /// `sha256d(witness_root ‖ reserved_value)` is returned instead, where the coinbase
    /// wtxid counts as zero and the reserved value is the first coinbase witness item.
    pub fn calculate_merkle_root(
        transactions: &[UtxoTransaction],
        for_witness: bool,
    ) -> Option<[u8; 32]> {
        if !for_witness {
            let txids: Vec<[u8; 32]> = transactions
                .iter()
                .map(|tx| tx.txid().to_byte_array())
                .collect();
            return fast_merkle_root(&txids);
        }

        let coinbase = transactions.first().filter(|tx| tx.is_coinbase())?;
        let reserved_value = coinbase.inputs().first()?.witness.nth(0)?;
        let wtxids: Vec<[u8; 32]> = transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| {
                if i == 0 {
                    [0u8; 32]
                } else {
                    tx.wtxid().to_byte_array()
                }
            })
            .collect();
        let root = fast_merkle_root(&wtxids)?;
        Some(witness_commitment(&root, reserved_value))
    }

    pub fn check_merkle_root(&self) -> bool {
        match self.transactions() {
            Some(transactions) => {
                Self::calculate_merkle_root(transactions, false) == Some(self.merkle_root)
            }
            None => false,
        }
    }

    pub fn check_proof_of_work(&self) -> bool {
        let hash = self.get_hash().to_byte_array();
        hash_meets_target(&hash, &calculate_target(self.bits))
    }

    /// The witness commitment of the last matching coinbase output
    pub fn witness_commit(&self) -> Option<[u8; 32]> {
        let coinbase = self.transactions()?.first().filter(|tx| tx.is_coinbase())?;
        coinbase
            .outputs()
            .iter()
            .map(|output| output.script_pubkey.as_bytes())
            .filter(|script| script.len() >= 38 && script.starts_with(&WITNESS_COMMIT_PREFIX))
            .last()
            .and_then(|script| script[6..38].try_into().ok())
    }

    pub fn has_witness_commit(&self) -> bool {
        self.witness_commit().is_some()
    }

    pub fn has_witness(&self) -> bool {
        self.transactions()
            .map_or(false, |txs| txs.iter().any(|tx| tx.has_witness()))
    }

    /// `false` when there is no witness commitment to check
    pub fn check_witness_commit(&self) -> bool {
        match (self.witness_commit(), self.transactions()) {
            (Some(commit), Some(transactions)) => {
                Self::calculate_merkle_root(transactions, true) == Some(commit)
            }
            _ => false,
        }
    }

    /// Check the merkle root, and the witness commitment when present. Blocks with
    /// witness data but no commitment fail.
    pub fn check_tx_roots(&self) -> bool {
        let has_witness_commit = self.has_witness_commit();
        if !has_witness_commit && self.has_witness() {
            return false;
        }
        self.check_merkle_root() && (!has_witness_commit || self.check_witness_commit())
    }
}
