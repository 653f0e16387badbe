/// Number of canonical pointer registers backed by the alias table.
pub const POINTER_REGISTER_COUNT: usize = 7;
/// Status-register bit that selects supervisor mode (bit 15).
pub const SUPERVISOR_BIT: u16 = 1 << 15;
/// Width of the status register in bits.
pub const STATUS_REGISTER_BITS: u8 = 16;

/// Register identity as it appears in register operations.
///
/// This covers every full-width register, every byte alias of the general
/// registers, and the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[allow(missing_docs)]
pub enum RegisterId {
    A,
    AH,
    AL,
    B,
    BH,
    BL,
    C,
    CH,
    CL,
    D,
    DH,
    DL,
    Ssp,
    Usp,
    Ip,
    Sr,
}

impl RegisterId {
    /// Resolves this identity to its canonical record and access width.
    ///
    /// Returns `None` for [`RegisterId::Sr`], which has no pointer record.
    #[must_use]
    pub const fn alias(self) -> Option<RegisterAlias> {
        let (register, width) = match self {
            Self::A => (PointerRegister::A, RegisterWidth::Full),
            Self::AH => (PointerRegister::A, RegisterWidth::High),
            Self::AL => (PointerRegister::A, RegisterWidth::Low),
            Self::B => (PointerRegister::B, RegisterWidth::Full),
            Self::BH => (PointerRegister::B, RegisterWidth::High),
            Self::BL => (PointerRegister::B, RegisterWidth::Low),
            Self::C => (PointerRegister::C, RegisterWidth::Full),
            Self::CH => (PointerRegister::C, RegisterWidth::High),
            Self::CL => (PointerRegister::C, RegisterWidth::Low),
            Self::D => (PointerRegister::D, RegisterWidth::Full),
            Self::DH => (PointerRegister::D, RegisterWidth::High),
            Self::DL => (PointerRegister::D, RegisterWidth::Low),
            Self::Ssp => (PointerRegister::Ssp, RegisterWidth::Full),
            Self::Usp => (PointerRegister::Usp, RegisterWidth::Full),
            Self::Ip => (PointerRegister::Ip, RegisterWidth::Full),
            Self::Sr => return None,
        };
        Some(RegisterAlias { register, width })
    }
}

/// Canonical full-width register whose value is tracked as a memory pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PointerRegister {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    Ssp = 4,
    Usp = 5,
    Ip = 6,
}

impl PointerRegister {
    /// Every canonical pointer register in arena order.
    pub const ALL: [Self; POINTER_REGISTER_COUNT] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::Ssp,
        Self::Usp,
        Self::Ip,
    ];

    /// General registers whose markers can be toggled by the view.
    pub const GENERAL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Returns the arena slot for this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Slice of a canonical register addressed by an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterWidth {
    /// Entire 16-bit value.
    Full,
    /// Bits 8..=15.
    High,
    /// Bits 0..=7.
    Low,
}

impl RegisterWidth {
    /// Merges `value` into `shared` according to this width.
    #[must_use]
    pub const fn merge(self, shared: u16, value: u16) -> u16 {
        match self {
            Self::Full => value,
            Self::High => (shared & 0x00FF) | ((value & 0x00FF) << 8),
            Self::Low => (shared & 0xFF00) | (value & 0x00FF),
        }
    }

    /// Extracts the part of `shared` visible through this width.
    #[must_use]
    pub const fn extract(self, shared: u16) -> u16 {
        match self {
            Self::Full => shared,
            Self::High => shared >> 8,
            Self::Low => shared & 0x00FF,
        }
    }
}

/// A view of one canonical register at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterAlias {
    /// Backing record.
    pub register: PointerRegister,
    /// Portion of the record this alias reads and writes.
    pub width: RegisterWidth,
}

/// Register values read once when the view is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(missing_docs)]
pub struct RegisterSnapshot {
    pub a: u16,
    pub b: u16,
    pub c: u16,
    pub d: u16,
    pub ssp: u16,
    pub usp: u16,
    pub ip: u16,
    pub sr: u16,
}

impl RegisterSnapshot {
    /// Returns the snapshot value of a canonical pointer register.
    #[must_use]
    pub const fn pointer(&self, register: PointerRegister) -> u16 {
        match register {
            PointerRegister::A => self.a,
            PointerRegister::B => self.b,
            PointerRegister::C => self.c,
            PointerRegister::D => self.d,
            PointerRegister::Ssp => self.ssp,
            PointerRegister::Usp => self.usp,
            PointerRegister::Ip => self.ip,
        }
    }
}

/// Arena of canonical register records shared by all of their aliases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterAliasTable {
    records: [u16; POINTER_REGISTER_COUNT],
}

impl RegisterAliasTable {
    /// Builds the table from the pointer values in `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: &RegisterSnapshot) -> Self {
        let mut table = Self::default();
        for register in PointerRegister::ALL {
            table.records[register.index()] = snapshot.pointer(register);
        }
        table
    }

    /// Reads the full value of a canonical register.
    #[must_use]
    pub const fn get(&self, register: PointerRegister) -> u16 {
        self.records[register.index()]
    }

    /// Reads the portion of a register visible through `alias`.
    #[must_use]
    pub const fn read(&self, alias: RegisterAlias) -> u16 {
        alias.width.extract(self.get(alias.register))
    }

    /// Writes through `alias` and returns the previous full value.
    pub const fn write(&mut self, alias: RegisterAlias, value: u16) -> u16 {
        let slot = alias.register.index();
        let previous = self.records[slot];
        self.records[slot] = alias.width.merge(previous, value);
        previous
    }
}

/// Raw status-register bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusRegister(u16);

impl StatusRegister {
    /// Wraps a raw status value.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw bitfield.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Replaces the whole bitfield.
    pub const fn set_raw(&mut self, raw: u16) {
        self.0 = raw;
    }

    /// Returns `true` when the supervisor bit is set.
    #[must_use]
    pub const fn is_supervisor(self) -> bool {
        (self.0 & SUPERVISOR_BIT) != 0
    }

    /// Sets (`value != 0`) or clears bit `bit_number`.
    ///
    /// Returns `false` and leaves the register untouched when `bit_number`
    /// is outside the register.
    pub const fn write_bit(&mut self, bit_number: u8, value: u16) -> bool {
        if bit_number >= STATUS_REGISTER_BITS {
            return false;
        }
        let mask = 1 << bit_number;
        if value == 0 {
            self.0 &= !mask;
        } else {
            self.0 |= mask;
        }
        true
    }
}
