//! Compact difficulty target conversion.

/// Convert the compact "bits" representation to a 32-byte big-endian target.
///
/// The bits format is `[exponent (1 byte)][mantissa (3 bytes)]` and the target is
/// `mantissa * 256^(exponent - 3)`. The sign bit of the mantissa is ignored and bytes
/// shifted past the top of the 256-bit range are dropped.
pub fn calculate_target(bits: u32) -> [u8; 32] {
    let mut exponent = (bits >> 24) as i32 - 3;
    let mut mantissa = bits & 0x007f_ffff;

    if exponent < 0 {
        mantissa >>= 8 * (-exponent) as u32;
        exponent = 0;
    }

    let mut target = [0u8; 32];
    for (i, byte) in mantissa.to_le_bytes()[..3].iter().enumerate() {
        let pos = 31 - exponent - i as i32;
        if (0..32).contains(&pos) {
            target[pos as usize] = *byte;
        }
    }
    target
}

/// Check a block hash (internal byte order) against a big-endian target.
pub fn hash_meets_target(hash: &[u8; 32], target: &[u8; 32]) -> bool {
    let mut display = *hash;
    display.reverse();
    display <= *target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_hex(bits: u32) -> String {
        hex::encode(calculate_target(bits))
    }

    #[test]
    fn test_mainnet_genesis_bits() {
        assert_eq!(
            target_hex(0x1d00ffff),
            "00000000ffff0000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_regtest_bits() {
        assert_eq!(
            target_hex(0x207fffff),
            "7fffff0000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_small_exponents() {
        assert_eq!(
            target_hex(0x03123456),
            "0000000000000000000000000000000000000000000000000000000000123456"
        );
        assert_eq!(
            target_hex(0x02123456),
            "0000000000000000000000000000000000000000000000000000000000001234"
        );
        assert_eq!(calculate_target(0x00123456), [0u8; 32]);
    }

    #[test]
    fn test_large_exponent_drops_high_bytes() {
        // 0x123456 * 256^30: the leading byte no longer fits
        assert_eq!(
            target_hex(0x21123456),
            "3456000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_hash_meets_target() {
        let target = calculate_target(0x1d00ffff);
        let mut hash = [0u8; 32];
        hash[27] = 0xff;
        hash[26] = 0xff;
        assert!(hash_meets_target(&hash, &target));

        hash[28] = 1;
        assert!(!hash_meets_target(&hash, &target));
    }
}
