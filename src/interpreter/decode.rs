/// A raw instruction word split into its operand fields.
///
/// Every `u16` decodes; whether the combination means anything is left to the
/// handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub raw: u16,
    /// Top nibble.
    pub family: u8,
    /// Low 12 bits: an address.
    pub nnn: u16,
    /// Low nibble.
    pub n: u8,
    /// Bits 8-11: a register index.
    pub x: usize,
    /// Bits 4-7: a register index.
    pub y: usize,
    /// Low byte: an immediate.
    pub kk: u8,
}

impl Instruction {
    pub fn decode(raw: u16) -> Self {
        let (family, x, y, n) = nibbles(raw);
        Instruction {
            raw,
            family,
            nnn: raw & 0x0FFF,
            n,
            x: x as usize,
            y: y as usize,
            kk: (raw & 0x00FF) as u8,
        }
    }
}

impl From<u16> for Instruction {
    fn from(raw: u16) -> Self {
        Instruction::decode(raw)
    }
}

// Break u16 instruction into 4 u8 nibbles
fn nibbles(n: u16) -> (u8, u8, u8, u8) {
    let n3 = (n >> 12) as u8;
    let n2 = ((n >> 8) & 0b1111) as u8;
    let n1 = ((n >> 4) & 0b1111) as u8;
    let n0 = (n & 0b1111) as u8;
    (n3, n2, n1, n0)
}
