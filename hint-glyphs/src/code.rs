//! Decoding of TrueType bytecode into instructions.

use crate::error::HintErrorKind;

/// A single decoded instruction.
#[derive(Copy, Clone, Debug)]
pub struct Instruction<'a> {
    pub opcode: u8,
    /// Values pushed inline by the `PUSHB`/`PUSHW` family.
    pub inline_operands: InlineOperands<'a>,
    /// Offset of the opcode byte in the containing program.
    pub pc: usize,
}

impl Instruction<'_> {
    pub fn name(&self) -> &'static str {
        opcode_name(self.opcode)
    }
}

/// The bytes following a push opcode.
#[derive(Copy, Clone, Default, Debug)]
pub struct InlineOperands<'a> {
    bytes: &'a [u8],
    is_words: bool,
}

impl<'a> InlineOperands<'a> {
    pub fn len(&self) -> usize {
        if self.is_words {
            self.bytes.len() / 2
        } else {
            self.bytes.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Yields the operands widened to 32 bits.
    ///
    /// Bytes are zero extended while words are sign extended.
    pub fn values(&self) -> impl Iterator<Item = i32> + 'a + Clone {
        let (bytes, words) = if self.is_words {
            (&[][..], self.bytes)
        } else {
            (self.bytes, &[][..])
        };
        bytes.iter().map(|byte| *byte as i32).chain(
            words
                .chunks_exact(2)
                .map(|pair| i16::from_be_bytes([pair[0], pair[1]]) as i32),
        )
    }
}

/// Sequential decoder over one program's bytecode.
#[derive(Copy, Clone, Debug)]
pub struct Decoder<'a> {
    pub bytecode: &'a [u8],
    pub pc: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(bytecode: &'a [u8], pc: usize) -> Self {
        Self { bytecode, pc }
    }

    /// Decodes the instruction at the current program counter and
    /// advances past it.
    ///
    /// Returns `None` at the end of the bytecode.
    pub fn decode(&mut self) -> Option<Result<Instruction<'a>, HintErrorKind>> {
        let opcode = *self.bytecode.get(self.pc)?;
        Some(self.decode_opcode(opcode))
    }

    fn decode_opcode(&mut self, opcode: u8) -> Result<Instruction<'a>, HintErrorKind> {
        let pc = self.pc;
        let (operand_start, operand_len) = match opcode {
            opcodes::NPUSHB | opcodes::NPUSHW => {
                let count = *self
                    .bytecode
                    .get(pc + 1)
                    .ok_or(HintErrorKind::UnexpectedEndOfBytecode)?
                    as usize;
                let size = if opcode == opcodes::NPUSHW { 2 } else { 1 };
                (pc + 2, count * size)
            }
            opcodes::PUSHB000..=opcodes::PUSHB111 => {
                (pc + 1, (opcode - opcodes::PUSHB000) as usize + 1)
            }
            opcodes::PUSHW000..=opcodes::PUSHW111 => {
                (pc + 1, ((opcode - opcodes::PUSHW000) as usize + 1) * 2)
            }
            _ => (pc + 1, 0),
        };
        let end = operand_start + operand_len;
        let bytes = self
            .bytecode
            .get(operand_start..end)
            .ok_or(HintErrorKind::UnexpectedEndOfBytecode)?;
        self.pc = end;
        Ok(Instruction {
            opcode,
            inline_operands: InlineOperands {
                bytes,
                is_words: is_push_words(opcode),
            },
            pc,
        })
    }
}

fn is_push_words(opcode: u8) -> bool {
    opcode == opcodes::NPUSHW || (opcodes::PUSHW000..=opcodes::PUSHW111).contains(&opcode)
}

/// Returns the mnemonic for an opcode.
///
/// Opcodes with variant bits carry them as a binary suffix, so `0xC4`
/// is `MDRP00100`. Unassigned opcodes are named by their hex value.
pub fn opcode_name(opcode: u8) -> &'static str {
    NAMES[opcode as usize]
}

/// Raw TrueType instruction opcodes.
///
/// Only the first opcode of a family sharing a handler is named here,
/// along with the last where a range is needed.
pub mod opcodes {
    pub const SVTCA0: u8 = 0x00;
    pub const SPVTCA0: u8 = 0x02;
    pub const SFVTCA0: u8 = 0x04;
    pub const SFVTCA1: u8 = 0x05;
    pub const SPVTL0: u8 = 0x06;
    pub const SPVTL1: u8 = 0x07;
    pub const SFVTL0: u8 = 0x08;
    pub const SFVTL1: u8 = 0x09;
    pub const SPVFS: u8 = 0x0A;
    pub const SFVFS: u8 = 0x0B;
    pub const GPV: u8 = 0x0C;
    pub const GFV: u8 = 0x0D;
    pub const SFVTPV: u8 = 0x0E;
    pub const ISECT: u8 = 0x0F;
    pub const SRP0: u8 = 0x10;
    pub const SRP1: u8 = 0x11;
    pub const SRP2: u8 = 0x12;
    pub const SZP0: u8 = 0x13;
    pub const SZP1: u8 = 0x14;
    pub const SZP2: u8 = 0x15;
    pub const SZPS: u8 = 0x16;
    pub const SLOOP: u8 = 0x17;
    pub const RTG: u8 = 0x18;
    pub const RTHG: u8 = 0x19;
    pub const SMD: u8 = 0x1A;
    pub const ELSE: u8 = 0x1B;
    pub const JMPR: u8 = 0x1C;
    pub const SCVTCI: u8 = 0x1D;
    pub const SSWCI: u8 = 0x1E;
    pub const SSW: u8 = 0x1F;
    pub const DUP: u8 = 0x20;
    pub const POP: u8 = 0x21;
    pub const CLEAR: u8 = 0x22;
    pub const SWAP: u8 = 0x23;
    pub const DEPTH: u8 = 0x24;
    pub const CINDEX: u8 = 0x25;
    pub const MINDEX: u8 = 0x26;
    pub const ALIGNPTS: u8 = 0x27;
    pub const UTP: u8 = 0x29;
    pub const LOOPCALL: u8 = 0x2A;
    pub const CALL: u8 = 0x2B;
    pub const FDEF: u8 = 0x2C;
    pub const ENDF: u8 = 0x2D;
    pub const MDAP0: u8 = 0x2E;
    pub const MDAP1: u8 = 0x2F;
    pub const IUP0: u8 = 0x30;
    pub const IUP1: u8 = 0x31;
    pub const SHP0: u8 = 0x32;
    pub const SHP1: u8 = 0x33;
    pub const SHC0: u8 = 0x34;
    pub const SHC1: u8 = 0x35;
    pub const SHZ0: u8 = 0x36;
    pub const SHZ1: u8 = 0x37;
    pub const SHPIX: u8 = 0x38;
    pub const IP: u8 = 0x39;
    pub const MSIRP0: u8 = 0x3A;
    pub const MSIRP1: u8 = 0x3B;
    pub const ALIGNRP: u8 = 0x3C;
    pub const RTDG: u8 = 0x3D;
    pub const MIAP0: u8 = 0x3E;
    pub const MIAP1: u8 = 0x3F;
    pub const NPUSHB: u8 = 0x40;
    pub const NPUSHW: u8 = 0x41;
    pub const WS: u8 = 0x42;
    pub const RS: u8 = 0x43;
    pub const WCVTP: u8 = 0x44;
    pub const RCVT: u8 = 0x45;
    pub const GC0: u8 = 0x46;
    pub const GC1: u8 = 0x47;
    pub const SCFS: u8 = 0x48;
    pub const MD0: u8 = 0x49;
    pub const MD1: u8 = 0x4A;
    pub const MPPEM: u8 = 0x4B;
    pub const MPS: u8 = 0x4C;
    pub const FLIPON: u8 = 0x4D;
    pub const FLIPOFF: u8 = 0x4E;
    pub const DEBUG: u8 = 0x4F;
    pub const LT: u8 = 0x50;
    pub const LTEQ: u8 = 0x51;
    pub const GT: u8 = 0x52;
    pub const GTEQ: u8 = 0x53;
    pub const EQ: u8 = 0x54;
    pub const NEQ: u8 = 0x55;
    pub const ODD: u8 = 0x56;
    pub const EVEN: u8 = 0x57;
    pub const IF: u8 = 0x58;
    pub const EIF: u8 = 0x59;
    pub const AND: u8 = 0x5A;
    pub const OR: u8 = 0x5B;
    pub const NOT: u8 = 0x5C;
    pub const DELTAP1: u8 = 0x5D;
    pub const SDB: u8 = 0x5E;
    pub const SDS: u8 = 0x5F;
    pub const ADD: u8 = 0x60;
    pub const SUB: u8 = 0x61;
    pub const DIV: u8 = 0x62;
    pub const MUL: u8 = 0x63;
    pub const ABS: u8 = 0x64;
    pub const NEG: u8 = 0x65;
    pub const FLOOR: u8 = 0x66;
    pub const CEILING: u8 = 0x67;
    pub const ROUND00: u8 = 0x68;
    pub const ROUND11: u8 = 0x6B;
    pub const NROUND00: u8 = 0x6C;
    pub const NROUND11: u8 = 0x6F;
    pub const WCVTF: u8 = 0x70;
    pub const DELTAP2: u8 = 0x71;
    pub const DELTAP3: u8 = 0x72;
    pub const DELTAC1: u8 = 0x73;
    pub const DELTAC2: u8 = 0x74;
    pub const DELTAC3: u8 = 0x75;
    pub const SROUND: u8 = 0x76;
    pub const S45ROUND: u8 = 0x77;
    pub const JROT: u8 = 0x78;
    pub const JROF: u8 = 0x79;
    pub const ROFF: u8 = 0x7A;
    pub const RUTG: u8 = 0x7C;
    pub const RDTG: u8 = 0x7D;
    pub const SANGW: u8 = 0x7E;
    pub const AA: u8 = 0x7F;
    pub const FLIPPT: u8 = 0x80;
    pub const FLIPRGON: u8 = 0x81;
    pub const FLIPRGOFF: u8 = 0x82;
    pub const SCANCTRL: u8 = 0x85;
    pub const SDPVTL0: u8 = 0x86;
    pub const SDPVTL1: u8 = 0x87;
    pub const GETINFO: u8 = 0x88;
    pub const IDEF: u8 = 0x89;
    pub const ROLL: u8 = 0x8A;
    pub const MAX: u8 = 0x8B;
    pub const MIN: u8 = 0x8C;
    pub const SCANTYPE: u8 = 0x8D;
    pub const INSTCTRL: u8 = 0x8E;
    pub const PUSHB000: u8 = 0xB0;
    pub const PUSHB111: u8 = 0xB7;
    pub const PUSHW000: u8 = 0xB8;
    pub const PUSHW111: u8 = 0xBF;
    pub const MDRP00000: u8 = 0xC0;
    pub const MDRP11111: u8 = 0xDF;
    pub const MIRP00000: u8 = 0xE0;
    pub const MIRP11111: u8 = 0xFF;
}

#[rustfmt::skip]
static NAMES: [&str; 256] = [
    // 0x00
    "SVTCA0", "SVTCA1", "SPVTCA0", "SPVTCA1", "SFVTCA0", "SFVTCA1", "SPVTL0", "SPVTL1",
    "SFVTL0", "SFVTL1", "SPVFS", "SFVFS", "GPV", "GFV", "SFVTPV", "ISECT",
    // 0x10
    "SRP0", "SRP1", "SRP2", "SZP0", "SZP1", "SZP2", "SZPS", "SLOOP",
    "RTG", "RTHG", "SMD", "ELSE", "JMPR", "SCVTCI", "SSWCI", "SSW",
    // 0x20
    "DUP", "POP", "CLEAR", "SWAP", "DEPTH", "CINDEX", "MINDEX", "ALIGNPTS",
    "OP28", "UTP", "LOOPCALL", "CALL", "FDEF", "ENDF", "MDAP0", "MDAP1",
    // 0x30
    "IUP0", "IUP1", "SHP0", "SHP1", "SHC0", "SHC1", "SHZ0", "SHZ1",
    "SHPIX", "IP", "MSIRP0", "MSIRP1", "ALIGNRP", "RTDG", "MIAP0", "MIAP1",
    // 0x40
    "NPUSHB", "NPUSHW", "WS", "RS", "WCVTP", "RCVT", "GC0", "GC1",
    "SCFS", "MD0", "MD1", "MPPEM", "MPS", "FLIPON", "FLIPOFF", "DEBUG",
    // 0x50
    "LT", "LTEQ", "GT", "GTEQ", "EQ", "NEQ", "ODD", "EVEN",
    "IF", "EIF", "AND", "OR", "NOT", "DELTAP1", "SDB", "SDS",
    // 0x60
    "ADD", "SUB", "DIV", "MUL", "ABS", "NEG", "FLOOR", "CEILING",
    "ROUND00", "ROUND01", "ROUND10", "ROUND11", "NROUND00", "NROUND01", "NROUND10", "NROUND11",
    // 0x70
    "WCVTF", "DELTAP2", "DELTAP3", "DELTAC1", "DELTAC2", "DELTAC3", "SROUND", "S45ROUND",
    "JROT", "JROF", "ROFF", "OP7B", "RUTG", "RDTG", "SANGW", "AA",
    // 0x80
    "FLIPPT", "FLIPRGON", "FLIPRGOFF", "OP83", "OP84", "SCANCTRL", "SDPVTL0", "SDPVTL1",
    "GETINFO", "IDEF", "ROLL", "MAX", "MIN", "SCANTYPE", "INSTCTRL", "OP8F",
    // 0x90
    "OP90", "GETVARIATION", "GETDATA", "OP93", "OP94", "OP95", "OP96", "OP97",
    "OP98", "OP99", "OP9A", "OP9B", "OP9C", "OP9D", "OP9E", "OP9F",
    // 0xA0
    "OPA0", "OPA1", "OPA2", "OPA3", "OPA4", "OPA5", "OPA6", "OPA7",
    "OPA8", "OPA9", "OPAA", "OPAB", "OPAC", "OPAD", "OPAE", "OPAF",
    // 0xB0
    "PUSHB000", "PUSHB001", "PUSHB010", "PUSHB011", "PUSHB100", "PUSHB101", "PUSHB110", "PUSHB111",
    "PUSHW000", "PUSHW001", "PUSHW010", "PUSHW011", "PUSHW100", "PUSHW101", "PUSHW110", "PUSHW111",
    // 0xC0
    "MDRP00000", "MDRP00001", "MDRP00010", "MDRP00011", "MDRP00100", "MDRP00101", "MDRP00110", "MDRP00111",
    "MDRP01000", "MDRP01001", "MDRP01010", "MDRP01011", "MDRP01100", "MDRP01101", "MDRP01110", "MDRP01111",
    // 0xD0
    "MDRP10000", "MDRP10001", "MDRP10010", "MDRP10011", "MDRP10100", "MDRP10101", "MDRP10110", "MDRP10111",
    "MDRP11000", "MDRP11001", "MDRP11010", "MDRP11011", "MDRP11100", "MDRP11101", "MDRP11110", "MDRP11111",
    // 0xE0
    "MIRP00000", "MIRP00001", "MIRP00010", "MIRP00011", "MIRP00100", "MIRP00101", "MIRP00110", "MIRP00111",
    "MIRP01000", "MIRP01001", "MIRP01010", "MIRP01011", "MIRP01100", "MIRP01101", "MIRP01110", "MIRP01111",
    // 0xF0
    "MIRP10000", "MIRP10001", "MIRP10010", "MIRP10011", "MIRP10100", "MIRP10101", "MIRP10110", "MIRP10111",
    "MIRP11000", "MIRP11001", "MIRP11010", "MIRP11011", "MIRP11100", "MIRP11101", "MIRP11110", "MIRP11111",
];
