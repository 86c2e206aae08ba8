/*!
misc.rs - Transfer and flag-set/clear opcode family handler.

Stack opcodes (PHA/PLA/PHP/PLP) are out of scope and are not handled here;
they fall through to the unmapped-opcode default in `cpu::cycles`.
*/

use crate::cpu::execute::{set_clear_flag, tax, tay, tsx, txa, txs, tya};
use crate::cpu::state::{CARRY, Cpu, DECIMAL, INTERRUPT_DISABLE, OVERFLOW};
use crate::memory::Memory;

pub(super) fn handle(opcode: u8, cpu: &mut Cpu, _mem: &mut Memory, _cycles: &mut u32) -> bool {
    match opcode {
        // Transfers
        0xAA => tax(cpu),
        0xA8 => tay(cpu),
        0x8A => txa(cpu),
        0x98 => tya(cpu),
        0xBA => tsx(cpu),
        0x9A => txs(cpu),

        // Flags
        0x18 => set_clear_flag(cpu, CARRY, false), // CLC
        0x38 => set_clear_flag(cpu, CARRY, true),  // SEC
        0x58 => set_clear_flag(cpu, INTERRUPT_DISABLE, false), // CLI
        0x78 => set_clear_flag(cpu, INTERRUPT_DISABLE, true), // SEI
        0xD8 => set_clear_flag(cpu, DECIMAL, false), // CLD
        0xF8 => set_clear_flag(cpu, DECIMAL, true), // SED
        0xB8 => set_clear_flag(cpu, OVERFLOW, false), // CLV

        _ => return false,
    }
    true
}
