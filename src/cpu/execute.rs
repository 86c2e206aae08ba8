/*!
execute.rs - 6502 micro-operations: the ALU/transfer/branch/flag primitives
shared by every opcode family in `cpu::dispatch`.

Overview
========
Each function here implements exactly one ALU/transfer/branch/flag
micro-operation: it reads its operand(s) (already resolved by
`cpu::addressing`), mutates
register/flag state (and memory, for the read-modify-write forms), and
returns. None of these functions touch the cycle counter; `cpu::cycles`
and the dispatcher own all cycle accounting, since the base cost table
already folds in every micro-op's fixed tail.

`branch_cond` is the one exception that returns a number: the 0/1/2 extra
cycles a taken (and possibly page-crossing) branch adds on top of its base
cost, since that value depends on the runtime outcome of the branch rather
than being foldable into a static per-opcode table.
*/

use crate::cpu::addressing::fetch_byte;
use crate::cpu::state::{CARRY, Cpu, NEGATIVE, OVERFLOW, Register, ZERO};
use crate::memory::Memory;

// ---------------------------------------------------------------------
// SetReg
// ---------------------------------------------------------------------

/// `SetReg(value, target)`: write `value` into `A`/`X`/`Y` and set `N`/`Z`.
#[inline]
pub(crate) fn set_reg(cpu: &mut Cpu, value: u8, target: Register) {
    cpu.set_register(target, value);
    cpu.update_zn(value);
}

// ---------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------

/// `ADC(m)`: add with carry into `A`.
pub(crate) fn adc(cpu: &mut Cpu, m: u8) {
    let a_old = cpu.a();
    let carry_in = cpu.flag(CARRY) as u16;
    let sum = a_old as u16 + m as u16 + carry_in;
    let result = sum as u8;

    cpu.set_flag(CARRY, sum > 0xFF);
    let overflow = (a_old ^ m) & 0x80 == 0 && (result ^ m) & 0x80 != 0;
    cpu.set_flag(OVERFLOW, overflow);
    cpu.set_a(result);
    cpu.update_zn(result);
}

/// `SBC(m)`: defined as `ADC(!m)`.
#[inline]
pub(crate) fn sbc(cpu: &mut Cpu, m: u8) {
    adc(cpu, !m);
}

// ---------------------------------------------------------------------
// Logic
// ---------------------------------------------------------------------

pub(crate) fn and_op(cpu: &mut Cpu, m: u8) {
    let result = cpu.a() & m;
    cpu.set_a(result);
    cpu.update_zn(result);
}

pub(crate) fn ora_op(cpu: &mut Cpu, m: u8) {
    let result = cpu.a() | m;
    cpu.set_a(result);
    cpu.update_zn(result);
}

pub(crate) fn eor_op(cpu: &mut Cpu, m: u8) {
    let result = cpu.a() ^ m;
    cpu.set_a(result);
    cpu.update_zn(result);
}

/// `BIT(m)`: test `A & m` without altering `A`.
pub(crate) fn bit(cpu: &mut Cpu, m: u8) {
    cpu.set_flag(ZERO, cpu.a() & m == 0);
    cpu.set_flag(OVERFLOW, m & 0x40 != 0);
    cpu.set_flag(NEGATIVE, m & 0x80 != 0);
}

/// `Compare(reg, m)`: set flags from `reg - m` without altering `reg`.
pub(crate) fn compare(cpu: &mut Cpu, reg_value: u8, m: u8) {
    let result = reg_value.wrapping_sub(m);
    cpu.update_zn(result);
    cpu.set_flag(CARRY, reg_value >= m);
}

// ---------------------------------------------------------------------
// Shifts / rotates
// ---------------------------------------------------------------------

#[inline]
fn asl_value(cpu: &mut Cpu, v: u8) -> u8 {
    cpu.set_flag(CARRY, v & 0x80 != 0);
    let result = v << 1;
    cpu.update_zn(result);
    result
}

#[inline]
fn lsr_value(cpu: &mut Cpu, v: u8) -> u8 {
    cpu.set_flag(CARRY, v & 0x01 != 0);
    let result = v >> 1;
    cpu.update_zn(result);
    result
}

#[inline]
fn rol_value(cpu: &mut Cpu, v: u8) -> u8 {
    let carry_in = cpu.flag(CARRY) as u8;
    cpu.set_flag(CARRY, v & 0x80 != 0);
    let result = (v << 1) | carry_in;
    cpu.update_zn(result);
    result
}

#[inline]
fn ror_value(cpu: &mut Cpu, v: u8) -> u8 {
    let carry_in = cpu.flag(CARRY) as u8;
    cpu.set_flag(CARRY, v & 0x01 != 0);
    let result = (v >> 1) | (carry_in << 7);
    cpu.update_zn(result);
    result
}

pub(crate) fn asl_acc(cpu: &mut Cpu) {
    let v = asl_value(cpu, cpu.a());
    cpu.set_a(v);
}

pub(crate) fn lsr_acc(cpu: &mut Cpu) {
    let v = lsr_value(cpu, cpu.a());
    cpu.set_a(v);
}

pub(crate) fn rol_acc(cpu: &mut Cpu) {
    let v = rol_value(cpu, cpu.a());
    cpu.set_a(v);
}

pub(crate) fn ror_acc(cpu: &mut Cpu) {
    let v = ror_value(cpu, cpu.a());
    cpu.set_a(v);
}

pub(crate) fn asl_mem(cpu: &mut Cpu, mem: &mut Memory, addr: u16) {
    let result = asl_value(cpu, mem.read(addr));
    mem.write(addr, result);
}

pub(crate) fn lsr_mem(cpu: &mut Cpu, mem: &mut Memory, addr: u16) {
    let result = lsr_value(cpu, mem.read(addr));
    mem.write(addr, result);
}

pub(crate) fn rol_mem(cpu: &mut Cpu, mem: &mut Memory, addr: u16) {
    let result = rol_value(cpu, mem.read(addr));
    mem.write(addr, result);
}

pub(crate) fn ror_mem(cpu: &mut Cpu, mem: &mut Memory, addr: u16) {
    let result = ror_value(cpu, mem.read(addr));
    mem.write(addr, result);
}

// ---------------------------------------------------------------------
// Increment / decrement
// ---------------------------------------------------------------------

/// `INC_DEC_mem(addr, ±1)`: read-modify-write.
pub(crate) fn inc_dec_mem(cpu: &mut Cpu, mem: &mut Memory, addr: u16, delta: i8) {
    let result = mem.read(addr).wrapping_add(delta as u8);
    mem.write(addr, result);
    cpu.update_zn(result);
}

/// `INC_DEC_reg(reg, ±1)`.
pub(crate) fn inc_dec_reg(cpu: &mut Cpu, reg: Register, delta: i8) {
    let result = cpu.register(reg).wrapping_add(delta as u8);
    cpu.set_register(reg, result);
    cpu.update_zn(result);
}

// ---------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------

/// `Branch(offset, taken)`: fetch the signed relative displacement
/// (always, whether or not the branch is taken, since it is still an
/// operand byte), and if taken, update PC and return the extra cycles
/// (1, plus 1 more if the branch crosses a page boundary). Returns 0 if
/// not taken.
pub(crate) fn branch_cond(cpu: &mut Cpu, mem: &Memory, taken: bool) -> u32 {
    let offset = fetch_byte(cpu, mem) as i8;
    if !taken {
        return 0;
    }
    let old_pc = cpu.pc();
    let new_pc = old_pc.wrapping_add(offset as i16 as u16);
    cpu.set_pc(new_pc);
    let crossed = (old_pc ^ new_pc) & 0xFF00 != 0;
    if crossed { 2 } else { 1 }
}

// ---------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------

/// `Transfer(src, dst, setFlags)` between two general registers.
#[inline]
fn transfer(cpu: &mut Cpu, src: Register, dst: Register, set_flags: bool) {
    let v = cpu.register(src);
    cpu.set_register(dst, v);
    if set_flags {
        cpu.update_zn(v);
    }
}

pub(crate) fn tax(cpu: &mut Cpu) {
    transfer(cpu, Register::A, Register::X, true);
}
pub(crate) fn tay(cpu: &mut Cpu) {
    transfer(cpu, Register::A, Register::Y, true);
}
pub(crate) fn txa(cpu: &mut Cpu) {
    transfer(cpu, Register::X, Register::A, true);
}
pub(crate) fn tya(cpu: &mut Cpu) {
    transfer(cpu, Register::Y, Register::A, true);
}

/// `TSX`: copy `SP` into `X`, setting flags.
pub(crate) fn tsx(cpu: &mut Cpu) {
    let v = cpu.sp();
    cpu.set_x(v);
    cpu.update_zn(v);
}

/// `TXS`: copy `X` into `SP`. The unique transfer that does not set flags.
pub(crate) fn txs(cpu: &mut Cpu) {
    cpu.set_sp(cpu.x());
}

// ---------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------

/// `SetClearFlag(flag, value)`.
#[inline]
pub(crate) fn set_clear_flag(cpu: &mut Cpu, mask: u8, value: bool) {
    cpu.set_flag(mask, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};

    #[test]
    fn adc_sets_carry_and_overflow() {
        let mut cpu = Cpu::new();
        cpu.set_a(0x50);
        adc(&mut cpu, 0x50);
        assert_eq!(cpu.a(), 0xA0);
        assert!(cpu.flag(NEGATIVE));
        assert!(cpu.flag(OVERFLOW));
        assert!(!cpu.flag(CARRY));
        assert!(!cpu.flag(ZERO));
    }

    #[test]
    fn sbc_is_adc_of_complement() {
        let mut cpu_sbc = Cpu::new();
        cpu_sbc.set_a(0x10);
        cpu_sbc.set_flag(CARRY, true); // no borrow
        sbc(&mut cpu_sbc, 0x01);

        let mut cpu_adc = Cpu::new();
        cpu_adc.set_a(0x10);
        cpu_adc.set_flag(CARRY, true);
        adc(&mut cpu_adc, !0x01u8);

        assert_eq!(cpu_sbc.a(), cpu_adc.a());
        assert_eq!(cpu_sbc.status(), cpu_adc.status());
        assert_eq!(cpu_sbc.a(), 0x0F);
    }

    #[test]
    fn rol_preserves_incoming_carry_before_overwrite() {
        let mut cpu = Cpu::new();
        cpu.set_flag(CARRY, true);
        let result = rol_value(&mut cpu, 0x80);
        assert_eq!(result, 0x01); // old bit 7 -> new carry, old carry -> bit 0
        assert!(cpu.flag(CARRY));
    }

    #[test]
    fn ror_preserves_incoming_carry_before_overwrite() {
        let mut cpu = Cpu::new();
        cpu.set_flag(CARRY, true);
        let result = ror_value(&mut cpu, 0x01);
        assert_eq!(result, 0x80);
        assert!(cpu.flag(CARRY));
    }

    #[test]
    fn inc_dec_mem_updates_flags() {
        let mut cpu = Cpu::new();
        let mut mem = Memory::new();
        mem.write(0x0010, 0xFF);
        inc_dec_mem(&mut cpu, &mut mem, 0x0010, 1);
        assert_eq!(mem.read(0x0010), 0x00);
        assert!(cpu.flag(ZERO));
    }

    #[test]
    fn compare_sets_carry_when_reg_greater_or_equal() {
        let mut cpu = Cpu::new();
        compare(&mut cpu, 0x10, 0x20);
        assert!(cpu.flag(NEGATIVE));
        assert!(!cpu.flag(ZERO));
        assert!(!cpu.flag(CARRY));
    }

    #[test]
    fn branch_cond_not_taken_consumes_operand_but_no_extra_cycles() {
        let mut mem = Memory::new();
        mem.load(0x1000, &[0xFE]).unwrap(); // -2
        let mut cpu = Cpu::new();
        cpu.reset(0x1000);
        let extra = branch_cond(&mut cpu, &mem, false);
        assert_eq!(extra, 0);
        assert_eq!(cpu.pc(), 0x1001);
    }

    #[test]
    fn branch_cond_taken_same_page() {
        // Operand byte lives at 0x1001, so the post-fetch PC is 0x1002;
        // -2 lands back on 0x1000, the opcode's own address.
        let mut mem = Memory::new();
        mem.load(0x1001, &[0xFE]).unwrap(); // -2
        let mut cpu = Cpu::new();
        cpu.reset(0x1001);
        let extra = branch_cond(&mut cpu, &mem, true);
        assert_eq!(extra, 1);
        assert_eq!(cpu.pc(), 0x1000);
    }

    #[test]
    fn branch_cond_taken_crosses_page() {
        let mut mem = Memory::new();
        mem.load(0x10FE, &[0x7F]).unwrap(); // +127, crosses from $10FF to $117E after fetch
        let mut cpu = Cpu::new();
        cpu.reset(0x10FE);
        let extra = branch_cond(&mut cpu, &mem, true);
        assert_eq!(extra, 2);
    }

    #[test]
    fn txs_does_not_set_flags() {
        let mut cpu = Cpu::new();
        cpu.set_x(0x00);
        cpu.set_flag(ZERO, false);
        txs(&mut cpu);
        assert_eq!(cpu.sp(), 0x00);
        assert!(!cpu.flag(ZERO));
    }
}
