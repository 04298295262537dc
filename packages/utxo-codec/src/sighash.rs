//! Sighash type validation for networks with and without replay protection.
//!
//! Bitcoin Cash, Bitcoin SV, eCash and Bitcoin Gold sign with `SIGHASH_FORKID` (0x40)
//! set. Every other network rejects the flag.

use crate::networks::Network;

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;
pub const SIGHASH_FORKID: u32 = 0x40;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

const BASE_TYPE_MASK: u32 = 0x1f;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SighashError {
    #[error("SIGHASH_FORKID (0x40) is not valid for network {network}, sighash type {sighash_type:#04x}")]
    UnexpectedForkId { sighash_type: u32, network: Network },
    #[error("SIGHASH_FORKID (0x40) is required for network {network}, sighash type {sighash_type:#04x}")]
    MissingForkId { sighash_type: u32, network: Network },
    #[error("invalid base sighash type {base_type:#04x} in sighash type {sighash_type:#04x}")]
    InvalidBaseType { sighash_type: u32, base_type: u32 },
}

/// Check that `sighash_type` may be used to sign on `network`.
///
/// 0 means "no sighash type specified" and is accepted everywhere.
pub fn validate_sighash_type(sighash_type: u32, network: Network) -> Result<(), SighashError> {
    if sighash_type == 0 {
        return Ok(());
    }

    let has_fork_id = sighash_type & SIGHASH_FORKID != 0;
    match (network.uses_fork_id(), has_fork_id) {
        (false, true) => {
            return Err(SighashError::UnexpectedForkId {
                sighash_type,
                network,
            })
        }
        (true, false) => {
            return Err(SighashError::MissingForkId {
                sighash_type,
                network,
            })
        }
        _ => {}
    }

    let base_type = sighash_type & BASE_TYPE_MASK;
    match base_type {
        SIGHASH_ALL | SIGHASH_NONE | SIGHASH_SINGLE => Ok(()),
        _ => Err(SighashError::InvalidBaseType {
            sighash_type,
            base_type,
        }),
    }
}
