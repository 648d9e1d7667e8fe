//! # Register File
//!
//! Primary and alternate register banks, index registers, the interrupt
//! control state and the flag byte.
//!
//! ## Flag Byte
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//!  S   Z   F5  H   F3  P/V N   C
//! ```
//!
//! Bits 5 and 3 are undocumented copies of result bits, kept because real
//! software observes them.

use crate::addressing::{Reg16, Reg8};

/// Bit positions of the flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Carry = 0,
    Subtract = 1,
    ParityOverflow = 2,
    /// Undocumented copy of result bit 3.
    Bit3 = 3,
    HalfCarry = 4,
    /// Undocumented copy of result bit 5.
    Bit5 = 5,
    Zero = 6,
    Sign = 7,
}

impl Flag {
    /// Mask selecting this flag in the flag byte.
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Mask of both undocumented flag bits.
pub const UNDOCUMENTED_MASK: u8 = Flag::Bit5.mask() | Flag::Bit3.mask();

/// Z80 register file.
///
/// # Examples
///
/// ```rust
/// use libz80::{Flag, Registers};
///
/// let mut regs = Registers::new();
/// regs.set_hl(0x1234);
/// assert_eq!(regs.h(), 0x12);
/// assert_eq!(regs.l(), 0x34);
///
/// regs.set_flag(Flag::Carry, true);
/// assert!(regs.carry());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub(crate) a: u8,
    pub(crate) f: u8,
    pub(crate) b: u8,
    pub(crate) c: u8,
    pub(crate) d: u8,
    pub(crate) e: u8,
    pub(crate) h: u8,
    pub(crate) l: u8,

    pub(crate) a_alt: u8,
    pub(crate) f_alt: u8,
    pub(crate) b_alt: u8,
    pub(crate) c_alt: u8,
    pub(crate) d_alt: u8,
    pub(crate) e_alt: u8,
    pub(crate) h_alt: u8,
    pub(crate) l_alt: u8,

    /// Interrupt vector base
    pub(crate) i: u8,
    /// Memory refresh counter
    pub(crate) r: u8,

    pub(crate) ix: u16,
    pub(crate) iy: u16,
    pub(crate) sp: u16,
    pub(crate) pc: u16,

    /// Last opcode byte fetched
    pub(crate) ir: u8,

    pub(crate) iff1: bool,
    pub(crate) iff2: bool,
    pub(crate) interrupt_mode: u8,
    pub(crate) halted: bool,
}

impl Registers {
    /// Power-on state: AF and SP all ones, everything else zero.
    pub fn new() -> Self {
        Self {
            a: 0xFF,
            f: 0xFF,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            a_alt: 0xFF,
            f_alt: 0xFF,
            b_alt: 0,
            c_alt: 0,
            d_alt: 0,
            e_alt: 0,
            h_alt: 0,
            l_alt: 0,
            i: 0,
            r: 0,
            ix: 0,
            iy: 0,
            sp: 0xFFFF,
            pc: 0,
            ir: 0,
            iff1: false,
            iff2: false,
            interrupt_mode: 0,
            halted: false,
        }
    }

    // ========== 8-bit Registers ==========

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn f(&self) -> u8 {
        self.f
    }

    pub fn set_f(&mut self, value: u8) {
        self.f = value;
    }

    pub fn b(&self) -> u8 {
        self.b
    }

    pub fn set_b(&mut self, value: u8) {
        self.b = value;
    }

    pub fn c(&self) -> u8 {
        self.c
    }

    pub fn set_c(&mut self, value: u8) {
        self.c = value;
    }

    pub fn d(&self) -> u8 {
        self.d
    }

    pub fn set_d(&mut self, value: u8) {
        self.d = value;
    }

    pub fn e(&self) -> u8 {
        self.e
    }

    pub fn set_e(&mut self, value: u8) {
        self.e = value;
    }

    pub fn h(&self) -> u8 {
        self.h
    }

    pub fn set_h(&mut self, value: u8) {
        self.h = value;
    }

    pub fn l(&self) -> u8 {
        self.l
    }

    pub fn set_l(&mut self, value: u8) {
        self.l = value;
    }

    /// Interrupt vector register.
    pub fn i(&self) -> u8 {
        self.i
    }

    pub fn set_i(&mut self, value: u8) {
        self.i = value;
    }

    /// Refresh register.
    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn set_r(&mut self, value: u8) {
        self.r = value;
    }

    /// Read any 8-bit register by name.
    pub fn get8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::F => self.f,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
            Reg8::I => self.i,
            Reg8::R => self.r,
        }
    }

    /// Write any 8-bit register by name.
    pub fn set8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.a = value,
            Reg8::F => self.f = value,
            Reg8::B => self.b = value,
            Reg8::C => self.c = value,
            Reg8::D => self.d = value,
            Reg8::E => self.e = value,
            Reg8::H => self.h = value,
            Reg8::L => self.l = value,
            Reg8::I => self.i = value,
            Reg8::R => self.r = value,
        }
    }

    // ========== 16-bit Registers ==========

    pub fn af(&self) -> u16 {
        pair(self.a, self.f)
    }

    pub fn set_af(&mut self, value: u16) {
        (self.a, self.f) = split(value);
    }

    pub fn bc(&self) -> u16 {
        pair(self.b, self.c)
    }

    pub fn set_bc(&mut self, value: u16) {
        (self.b, self.c) = split(value);
    }

    pub fn de(&self) -> u16 {
        pair(self.d, self.e)
    }

    pub fn set_de(&mut self, value: u16) {
        (self.d, self.e) = split(value);
    }

    pub fn hl(&self) -> u16 {
        pair(self.h, self.l)
    }

    pub fn set_hl(&mut self, value: u16) {
        (self.h, self.l) = split(value);
    }

    pub fn ix(&self) -> u16 {
        self.ix
    }

    pub fn set_ix(&mut self, value: u16) {
        self.ix = value;
    }

    pub fn iy(&self) -> u16 {
        self.iy
    }

    pub fn set_iy(&mut self, value: u16) {
        self.iy = value;
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Read any 16-bit register or pair by name.
    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af(),
            Reg16::BC => self.bc(),
            Reg16::DE => self.de(),
            Reg16::HL => self.hl(),
            Reg16::SP => self.sp,
            Reg16::IX => self.ix,
            Reg16::IY => self.iy,
        }
    }

    /// Write any 16-bit register or pair by name.
    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.set_af(value),
            Reg16::BC => self.set_bc(value),
            Reg16::DE => self.set_de(value),
            Reg16::HL => self.set_hl(value),
            Reg16::SP => self.sp = value,
            Reg16::IX => self.ix = value,
            Reg16::IY => self.iy = value,
        }
    }

    // ========== Alternate Bank ==========

    pub fn af_alt(&self) -> u16 {
        pair(self.a_alt, self.f_alt)
    }

    pub fn bc_alt(&self) -> u16 {
        pair(self.b_alt, self.c_alt)
    }

    pub fn de_alt(&self) -> u16 {
        pair(self.d_alt, self.e_alt)
    }

    pub fn hl_alt(&self) -> u16 {
        pair(self.h_alt, self.l_alt)
    }

    /// `EX AF,AF'`
    pub fn exchange_af(&mut self) {
        std::mem::swap(&mut self.a, &mut self.a_alt);
        std::mem::swap(&mut self.f, &mut self.f_alt);
    }

    /// `EX DE,HL`
    pub fn exchange_de_hl(&mut self) {
        std::mem::swap(&mut self.d, &mut self.h);
        std::mem::swap(&mut self.e, &mut self.l);
    }

    /// `EXX`: swap BC, DE and HL with their alternates.
    pub fn exchange_all_except_af(&mut self) {
        std::mem::swap(&mut self.b, &mut self.b_alt);
        std::mem::swap(&mut self.c, &mut self.c_alt);
        std::mem::swap(&mut self.d, &mut self.d_alt);
        std::mem::swap(&mut self.e, &mut self.e_alt);
        std::mem::swap(&mut self.h, &mut self.h_alt);
        std::mem::swap(&mut self.l, &mut self.l_alt);
    }

    // ========== Interrupt State ==========

    /// Instruction-fetch latch: the last opcode byte read.
    pub fn ir(&self) -> u8 {
        self.ir
    }

    pub fn iff1(&self) -> bool {
        self.iff1
    }

    pub fn iff2(&self) -> bool {
        self.iff2
    }

    /// Set both interrupt flip-flops, as `DI` and `EI` do.
    pub fn set_interrupts_enabled(&mut self, enabled: bool) {
        self.iff1 = enabled;
        self.iff2 = enabled;
    }

    pub fn interrupt_mode(&self) -> u8 {
        self.interrupt_mode
    }

    pub fn set_interrupt_mode(&mut self, mode: u8) {
        self.interrupt_mode = mode;
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Advance the low seven bits of R, leaving bit 7 alone.
    pub(crate) fn advance_refresh(&mut self, fetches: u8) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(fetches) & 0x7F);
    }

    // ========== Flags ==========

    pub fn flag(&self, flag: Flag) -> bool {
        self.f & flag.mask() != 0
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.f |= flag.mask();
        } else {
            self.f &= !flag.mask();
        }
    }

    pub fn carry(&self) -> bool {
        self.flag(Flag::Carry)
    }

    pub fn zero(&self) -> bool {
        self.flag(Flag::Zero)
    }

    pub fn sign(&self) -> bool {
        self.flag(Flag::Sign)
    }

    pub fn half_carry(&self) -> bool {
        self.flag(Flag::HalfCarry)
    }

    pub fn subtract(&self) -> bool {
        self.flag(Flag::Subtract)
    }

    /// P/V set: even parity after logic ops, signed overflow after arithmetic.
    pub fn parity_even(&self) -> bool {
        self.flag(Flag::ParityOverflow)
    }

    pub fn parity_odd(&self) -> bool {
        !self.parity_even()
    }

    pub fn set_sign_from(&mut self, value: u8) {
        self.set_flag(Flag::Sign, value & 0x80 != 0);
    }

    pub fn set_zero_from(&mut self, value: u8) {
        self.set_flag(Flag::Zero, value == 0);
    }

    pub fn set_parity_from(&mut self, value: u8) {
        self.set_flag(Flag::ParityOverflow, value.count_ones() % 2 == 0);
    }

    /// Copy bits 5 and 3 of `value` into the undocumented flags.
    pub fn set_undocumented_from(&mut self, value: u8) {
        self.f = (self.f & !UNDOCUMENTED_MASK) | (value & UNDOCUMENTED_MASK);
    }

    /// Sign, zero and both undocumented bits from a result byte.
    pub(crate) fn set_result_flags(&mut self, value: u8) {
        self.set_sign_from(value);
        self.set_zero_from(value);
        self.set_undocumented_from(value);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

fn pair(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

fn split(value: u16) -> (u8, u8) {
    ((value >> 8) as u8, value as u8)
}
