//! Repair of legacy non-standard half-signed multisig inputs.
//!
//! Older signers produced half-signed inputs of the shape
//! `OP_0 <signature> <multisig redeem script>`, dropping the empty placeholders for the
//! unsigned slots. Strict parsers expect one slot per key:
//! `OP_0 <sig-or-empty> <sig-or-empty> <sig-or-empty> <redeem script>`.

use crate::bitcoin::blockdata::script::{Builder, Instruction, PushBytesBuf};
use crate::bitcoin::{Script, ScriptBuf, TxIn, Witness};
use crate::script::{classify, ScriptType};

/// Number of signature slots of a 2-of-3 wallet multisig
pub const SIGNATURE_SLOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepairError {
    #[error("invalid signature index {0}: must be one of [0, 1, 2]")]
    InvalidSignatureIndex(usize),
    #[error("cannot push element: {0}")]
    InvalidPush(String),
}

/// Result of [`pad_input_script`]. Holds the original script and witness when the input
/// did not have the non-standard shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedInput {
    pub script_sig: ScriptBuf,
    pub witness: Witness,
    pub repaired: bool,
}

/// Push-only script as a stack of byte vectors, `None` if it contains other opcodes.
fn decompile_pushes(script: &Script) -> Option<Vec<Vec<u8>>> {
    script
        .instructions()
        .map(|instruction| match instruction {
            Ok(Instruction::PushBytes(bytes)) => Some(bytes.as_bytes().to_vec()),
            _ => None,
        })
        .collect()
}

fn compile_pushes(stack: &[Vec<u8>]) -> Result<ScriptBuf, RepairError> {
    let mut builder = Builder::new();
    for element in stack {
        let push = PushBytesBuf::try_from(element.clone())
            .map_err(|e| RepairError::InvalidPush(e.to_string()))?;
        builder = builder.push_slice(push);
    }
    Ok(builder.into_script())
}

/// Compute the padded form of a non-standard half-signed input.
///
/// The witness stack is inspected when present, the script sig otherwise. Inputs of any
/// other shape are returned unchanged with `repaired: false`.
pub fn pad_input_script(input: &TxIn, signature_index: usize) -> Result<PaddedInput, RepairError> {
    if signature_index >= SIGNATURE_SLOTS {
        return Err(RepairError::InvalidSignatureIndex(signature_index));
    }

    let unchanged = PaddedInput {
        script_sig: input.script_sig.clone(),
        witness: input.witness.clone(),
        repaired: false,
    };

    let use_witness = !input.witness.is_empty();
    let stack = if use_witness {
        input.witness.iter().map(|item| item.to_vec()).collect()
    } else {
        match decompile_pushes(&input.script_sig) {
            Some(stack) => stack,
            None => return Ok(unchanged),
        }
    };

    let [op0, signature, redeem_script] = match <[Vec<u8>; 3]>::try_from(stack) {
        Ok(stack) => stack,
        Err(_) => return Ok(unchanged),
    };
    if !op0.is_empty() {
        return Ok(unchanged);
    }
    if !matches!(
        classify(Script::from_bytes(&redeem_script)),
        ScriptType::Multisig { .. }
    ) {
        return Ok(unchanged);
    }

    let mut padded = Vec::with_capacity(SIGNATURE_SLOTS + 2);
    padded.push(op0);
    for slot in 0..SIGNATURE_SLOTS {
        if slot == signature_index {
            padded.push(signature.clone());
        } else {
            padded.push(Vec::new());
        }
    }
    padded.push(redeem_script);

    if use_witness {
        Ok(PaddedInput {
            script_sig: input.script_sig.clone(),
            witness: Witness::from_slice(&padded),
            repaired: true,
        })
    } else {
        Ok(PaddedInput {
            script_sig: compile_pushes(&padded)?,
            witness: input.witness.clone(),
            repaired: true,
        })
    }
}

/// Apply [`pad_input_script`] to `input`, returning whether it was changed.
pub fn pad_input_script_in_place(
    input: &mut TxIn,
    signature_index: usize,
) -> Result<bool, RepairError> {
    let padded = pad_input_script(input, signature_index)?;
    if padded.repaired {
        input.script_sig = padded.script_sig;
        input.witness = padded.witness;
    }
    Ok(padded.repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcoin::blockdata::opcodes::all::OP_CHECKSIG;
    use crate::bitcoin::{OutPoint, Sequence};
    use crate::script::build_multisig_script;
    use crate::test_utils::test_pubkeys;
    use rstest::rstest;

    fn signature() -> Vec<u8> {
        let mut sig = vec![0x30; 71];
        sig[70] = 0x01;
        sig
    }

    fn redeem_script() -> Vec<u8> {
        build_multisig_script(2, &test_pubkeys()).to_bytes()
    }

    fn input(script_sig: ScriptBuf, witness: Witness) -> TxIn {
        TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: Sequence::MAX,
            witness,
        }
    }

    fn legacy_half_signed() -> TxIn {
        let stack = vec![Vec::new(), signature(), redeem_script()];
        input(compile_pushes(&stack).unwrap(), Witness::new())
    }

    fn witness_half_signed() -> TxIn {
        let stack = vec![Vec::new(), signature(), redeem_script()];
        input(ScriptBuf::new(), Witness::from_slice(&stack))
    }

    fn expected_stack(signature_index: usize) -> Vec<Vec<u8>> {
        let mut stack = vec![Vec::new(); 4];
        stack[1 + signature_index] = signature();
        stack.push(redeem_script());
        stack
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn test_pad_legacy_script(#[case] signature_index: usize) {
        let padded = pad_input_script(&legacy_half_signed(), signature_index).unwrap();
        assert!(padded.repaired);
        assert!(padded.witness.is_empty());
        assert_eq!(
            decompile_pushes(&padded.script_sig),
            Some(expected_stack(signature_index))
        );
        // empty slots are encoded as OP_0
        assert_eq!(padded.script_sig.as_bytes()[0], 0x00);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn test_pad_witness(#[case] signature_index: usize) {
        let padded = pad_input_script(&witness_half_signed(), signature_index).unwrap();
        assert!(padded.repaired);
        assert!(padded.script_sig.is_empty());
        let stack: Vec<Vec<u8>> = padded.witness.iter().map(|item| item.to_vec()).collect();
        assert_eq!(stack, expected_stack(signature_index));
    }

    #[test]
    fn test_invalid_signature_index() {
        assert_eq!(
            pad_input_script(&legacy_half_signed(), 3),
            Err(RepairError::InvalidSignatureIndex(3))
        );
    }

    #[test]
    fn test_in_place_is_idempotent() {
        let mut tx_in = legacy_half_signed();
        assert!(pad_input_script_in_place(&mut tx_in, 1).unwrap());
        let once = tx_in.clone();
        assert!(!pad_input_script_in_place(&mut tx_in, 1).unwrap());
        assert_eq!(tx_in, once);

        let mut tx_in = witness_half_signed();
        assert!(pad_input_script_in_place(&mut tx_in, 0).unwrap());
        let once = tx_in.clone();
        assert!(!pad_input_script_in_place(&mut tx_in, 0).unwrap());
        assert_eq!(tx_in, once);
    }

    #[test]
    fn test_other_shapes_are_unchanged() {
        // not a multisig redeem script
        let p2pk = Builder::new()
            .push_slice(test_pubkeys()[0])
            .push_opcode(OP_CHECKSIG)
            .into_script();
        let stack = vec![Vec::new(), signature(), p2pk.to_bytes()];
        let tx_in = input(compile_pushes(&stack).unwrap(), Witness::new());
        let padded = pad_input_script(&tx_in, 0).unwrap();
        assert!(!padded.repaired);
        assert_eq!(padded.script_sig, tx_in.script_sig);

        // first element is not empty
        let stack = vec![vec![0x01], signature(), redeem_script()];
        let tx_in = input(ScriptBuf::new(), Witness::from_slice(&stack));
        assert!(!pad_input_script(&tx_in, 0).unwrap().repaired);

        // non-push opcode
        let tx_in = input(
            Builder::new().push_opcode(OP_CHECKSIG).into_script(),
            Witness::new(),
        );
        assert!(!pad_input_script(&tx_in, 0).unwrap().repaired);

        // empty input
        let tx_in = input(ScriptBuf::new(), Witness::new());
        assert!(!pad_input_script(&tx_in, 2).unwrap().repaired);
    }
}
