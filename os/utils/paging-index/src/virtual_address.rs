use crate::index::{PageOffset, PageTableIndices};
use crate::layout::{AddressLayout, PAGE_SIZE};
use core::fmt;

/// Virtual memory address.
///
/// A thin wrapper around a `u64` with helpers for the 4-level x86-64 layout.
/// Construction never validates canonical form; use
/// [`is_canonical`](Self::is_canonical) to check and
/// [`canonicalize`](Self::canonicalize) to repair.
///
/// ### Invariants
/// - None beyond "this is intended to be a virtual address".
///
/// ### Examples
/// ```rust
/// # use paging_index::*;
/// let va = VirtualAddress::new(0xFFFF_FFFF_8000_1234);
/// assert!(va.is_canonical());
/// assert_eq!(va.page_offset().as_u16(), 0x234);
/// assert_eq!(va.page_base().as_u64(), 0xFFFF_FFFF_8000_1000);
/// assert_eq!(va.half(), CanonicalHalf::Upper);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualAddress(u64);

/// Which half of the canonical address space an address belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CanonicalHalf {
    /// Bit 47 clear; bits 63:48 are zero when canonical (user space by convention).
    Lower,
    /// Bit 47 set; bits 63:48 are ones when canonical (kernel space by convention).
    Upper,
}

/// Bit 47, the highest implemented address bit.
const SIGN_BIT: u64 = 1 << 47;

impl VirtualAddress {
    #[inline]
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Field view of this address.
    #[inline]
    #[must_use]
    pub const fn layout(self) -> AddressLayout {
        AddressLayout::from_bits(self.0)
    }

    #[inline]
    #[must_use]
    pub const fn indices(self) -> PageTableIndices {
        PageTableIndices::from_address(self)
    }

    #[inline]
    #[must_use]
    pub const fn page_offset(self) -> PageOffset {
        PageOffset::from_address(self)
    }

    /// The 4 KiB page base containing this address (offset bits cleared).
    #[inline]
    #[must_use]
    pub const fn page_base(self) -> Self {
        Self(self.0 & !(PAGE_SIZE - 1))
    }

    /// Half selected by bit 47, regardless of the upper bits.
    #[inline]
    #[must_use]
    pub const fn half(self) -> CanonicalHalf {
        if self.0 & SIGN_BIT == 0 {
            CanonicalHalf::Lower
        } else {
            CanonicalHalf::Upper
        }
    }

    /// Whether bits 63:48 all equal bit 47.
    #[inline]
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        self.0 == self.canonicalize().0
    }

    /// Rewrite bits 63:48 as copies of bit 47.
    #[inline]
    #[must_use]
    pub const fn canonicalize(self) -> Self {
        let upper = match self.half() {
            CanonicalHalf::Lower => 0,
            CanonicalHalf::Upper => 0xFFFF,
        };
        Self(self.layout().with_sign_extension(upper).into_bits())
    }
}

impl fmt::Debug for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA(0x{:016X})", self.0)
    }
}

/// Lowercase `0x`-prefixed hex without padding, e.g. `0xffff800000000000`.
impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u64> for VirtualAddress {
    #[inline]
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl From<VirtualAddress> for u64 {
    #[inline]
    fn from(va: VirtualAddress) -> Self {
        va.as_u64()
    }
}
