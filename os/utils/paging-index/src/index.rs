//! # Page-Table Indices
//!
//! Strongly-typed indices for the four translation levels and the in-page
//! offset. Each newtype prevents mixing indices of different levels and is
//! guaranteed to hold a value in `0..512` (`0..4096` for [`PageOffset`]).

use crate::error::RangeError;
use crate::layout::{AddressLayout, ENTRIES_PER_TABLE, PAGE_SIZE};
use crate::virtual_address::VirtualAddress;
use core::fmt;

/// One of the four levels of a 4-level page walk, top to bottom.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TableLevel {
    /// Page Map Level 4 (bits 47:39).
    Pml4,
    /// Page Directory Pointer Table (bits 38:30).
    Pdpt,
    /// Page Directory (bits 29:21).
    Pd,
    /// Page Table (bits 20:12).
    Pt,
}

impl TableLevel {
    /// All levels in walk order.
    pub const ALL: [Self; 4] = [Self::Pml4, Self::Pdpt, Self::Pd, Self::Pt];

    /// Short label used in tool output (`PML4`, `PDP`, `PD`, `PT`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pml4 => "PML4",
            Self::Pdpt => "PDP",
            Self::Pd => "PD",
            Self::Pt => "PT",
        }
    }
}

impl fmt::Display for TableLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! table_index {
    ($(#[$meta:meta])* $name:ident, $level:expr, $field:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(u16);

        impl $name {
            /// The translation level this index selects an entry in.
            pub const LEVEL: TableLevel = $level;

            /// Construct an index from a raw `u16`.
            ///
            /// ### Panics / Debug assertions
            /// - Debug builds assert `v < 512`.
            #[inline]
            #[must_use]
            pub const fn new(v: u16) -> Self {
                debug_assert!((v as u64) < ENTRIES_PER_TABLE);
                Self(v)
            }

            /// Construct an index from an unchecked input value.
            ///
            /// # Errors
            /// Returns [`RangeError::IndexOutOfRange`] if `v >= 512`.
            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            pub const fn try_new(v: u64) -> Result<Self, RangeError> {
                if v < ENTRIES_PER_TABLE {
                    Ok(Self(v as u16))
                } else {
                    Err(RangeError::IndexOutOfRange {
                        level: Self::LEVEL,
                        value: v,
                    })
                }
            }

            /// Extract this level's index from a virtual address.
            #[inline]
            #[must_use]
            pub const fn from_address(va: VirtualAddress) -> Self {
                Self(AddressLayout::from_bits(va.as_u64()).$field())
            }

            #[inline]
            #[must_use]
            pub const fn as_u16(self) -> u16 {
                self.0
            }

            #[inline]
            #[must_use]
            pub fn as_u64(self) -> u64 {
                u64::from(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = RangeError;

            #[inline]
            fn try_from(v: u64) -> Result<Self, RangeError> {
                Self::try_new(v)
            }
        }

        impl From<$name> for u64 {
            #[inline]
            fn from(i: $name) -> Self {
                i.as_u64()
            }
        }
    };
}

table_index!(
    /// Index into the PML4 table (virtual-address bits `[47:39]`).
    #[doc(alias = "L4Index")]
    Pml4Index,
    TableLevel::Pml4,
    pml4
);

table_index!(
    /// Index into a page-directory-pointer table (virtual-address bits `[38:30]`).
    #[doc(alias = "L3Index")]
    PdptIndex,
    TableLevel::Pdpt,
    pdpt
);

table_index!(
    /// Index into a page directory (virtual-address bits `[29:21]`).
    #[doc(alias = "L2Index")]
    PdIndex,
    TableLevel::Pd,
    pd
);

table_index!(
    /// Index into a page table (virtual-address bits `[20:12]`).
    #[doc(alias = "L1Index")]
    PtIndex,
    TableLevel::Pt,
    pt
);

/// Byte offset within a 4 KiB page (virtual-address bits `[11:0]`).
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PageOffset(u16);

impl PageOffset {
    /// Create from a raw value, asserting it is `< 4096` in debug.
    #[inline]
    #[must_use]
    pub const fn new(v: u16) -> Self {
        debug_assert!((v as u64) < PAGE_SIZE, "offset must be < page size");
        Self(v)
    }

    /// Construct from a full address's offset bits.
    #[inline]
    #[must_use]
    pub const fn from_address(va: VirtualAddress) -> Self {
        Self(AddressLayout::from_bits(va.as_u64()).offset())
    }

    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PageOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for PageOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageOffset({:#X})", self.0)
    }
}

/// The four indices a page walk uses to reach a 4 KiB page.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PageTableIndices {
    pub pml4: Pml4Index,
    pub pdpt: PdptIndex,
    pub pd: PdIndex,
    pub pt: PtIndex,
}

impl PageTableIndices {
    #[inline]
    #[must_use]
    pub const fn new(pml4: Pml4Index, pdpt: PdptIndex, pd: PdIndex, pt: PtIndex) -> Self {
        Self { pml4, pdpt, pd, pt }
    }

    /// Extract all four indices from a virtual address.
    ///
    /// Bits 63:48 are ignored.
    #[inline]
    #[must_use]
    pub const fn from_address(va: VirtualAddress) -> Self {
        Self {
            pml4: Pml4Index::from_address(va),
            pdpt: PdptIndex::from_address(va),
            pd: PdIndex::from_address(va),
            pt: PtIndex::from_address(va),
        }
    }

    /// The raw index value for `level`.
    #[inline]
    #[must_use]
    pub const fn get(&self, level: TableLevel) -> u16 {
        match level {
            TableLevel::Pml4 => self.pml4.as_u16(),
            TableLevel::Pdpt => self.pdpt.as_u16(),
            TableLevel::Pd => self.pd.as_u16(),
            TableLevel::Pt => self.pt.as_u16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_512() {
        assert_eq!(Pml4Index::try_new(511).map(Pml4Index::as_u16), Ok(511));
        for (level, err) in [
            (Pml4Index::LEVEL, Pml4Index::try_new(512).map(|_| ())),
            (PdptIndex::LEVEL, PdptIndex::try_new(600).map(|_| ())),
            (PtIndex::LEVEL, PtIndex::try_new(u64::MAX).map(|_| ())),
        ] {
            assert!(matches!(err, Err(RangeError::IndexOutOfRange { level: l, .. }) if l == level));
        }
        assert_eq!(
            PdIndex::try_new(512),
            Err(RangeError::IndexOutOfRange {
                level: TableLevel::Pd,
                value: 512
            })
        );
    }

    #[test]
    fn indices_from_address() {
        // 0xFFFF_8000_0020_3123: PML4=256, PDPT=0, PD=1, PT=3, offset=0x123
        let va = VirtualAddress::new(0xFFFF_8000_0020_3123);
        let ix = PageTableIndices::from_address(va);
        assert_eq!(ix.get(TableLevel::Pml4), 256);
        assert_eq!(ix.get(TableLevel::Pdpt), 0);
        assert_eq!(ix.get(TableLevel::Pd), 1);
        assert_eq!(ix.get(TableLevel::Pt), 3);
        assert_eq!(PageOffset::from_address(va).as_u16(), 0x123);
    }

    #[test]
    fn display_forms() {
        assert_eq!(format!("{}", PtIndex::new(42)), "42");
        assert_eq!(format!("{:?}", PtIndex::new(42)), "PtIndex(42)");
        assert_eq!(format!("{}", PageOffset::new(0xABC)), "0xabc");
        assert_eq!(format!("{}", PageOffset::new(0)), "0x0");
        assert_eq!(TableLevel::Pdpt.to_string(), "PDP");
    }
}
