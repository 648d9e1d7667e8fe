//! Formatting functions for disassembled instructions

use crate::addressing::AddressingMode;
use crate::fetch::{Fetched, Operand};
use crate::opcodes::Operation;

/// Format a decoded instruction as assembly text, e.g. `LD A,(IX+0x05)`.
pub fn format_instruction(fetched: &Fetched) -> String {
    let instruction = fetched.instruction;
    let mut operands: Vec<String> = Vec::with_capacity(3);

    match instruction.operation {
        Operation::Bit(bit) | Operation::Res(bit) | Operation::Set(bit) => {
            operands.push(bit.to_string());
        }
        Operation::Im(mode) => operands.push(mode.to_string()),
        Operation::Rst(vector) => operands.push(format!("0x{:02X}", vector)),
        Operation::ExAf => return "EX AF,AF'".to_string(),
        _ => {}
    }

    if let Some(condition) = instruction.condition {
        operands.push(condition.to_string());
    }

    let sides = [
        (instruction.dst, fetched.dst),
        (instruction.src, fetched.src),
    ];
    for (mode, operand) in sides {
        if let Some(text) = format_operand(mode, operand, fetched.displacement) {
            operands.push(text);
        }
    }

    if operands.is_empty() {
        instruction.mnemonic.to_string()
    } else {
        format!("{} {}", instruction.mnemonic, operands.join(","))
    }
}

/// Format one side of an instruction.
///
/// Register-relative modes print the register, not the address it held at
/// decode time.
fn format_operand(mode: AddressingMode, operand: Operand, displacement: Option<i8>) -> Option<String> {
    use AddressingMode::*;

    let text = match (mode, operand) {
        (Implied, _) => return None,
        (Register(reg), _) => reg.to_string(),
        (RegisterPair(pair), _) => pair.to_string(),
        (Indirect(pair), _) => format!("({})", pair),
        (Indexed(index), _) => {
            let d = displacement.unwrap_or(0);
            if d < 0 {
                format!("({}-0x{:02X})", index, d.unsigned_abs())
            } else {
                format!("({}+0x{:02X})", index, d)
            }
        }
        (Immediate, Operand::Immediate(value)) => format!("0x{:02X}", value),
        (ImmediateExtended | Relative, Operand::ImmediateWord(value)) => format!("0x{:04X}", value),
        (Extended, Operand::Memory(address)) => format!("(0x{:04X})", address),
        (PortImmediate, Operand::Port(port)) => format!("(0x{:02X})", port & 0xFF),
        (PortC, _) => "(C)".to_string(),
        _ => "?".to_string(),
    };
    Some(text)
}

/// Space-separated hex dump of instruction bytes.
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}
