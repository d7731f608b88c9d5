//! # Index ⇄ Address Conversion
//!
//! The two conversions are plain shift-and-mask sequences:
//!
//! - **Indices → address**: start from the PML4 index, optionally fill the
//!   sign-extension bits, then shift in PDP, PD, PT (9 bits each) and a zero
//!   page offset (12 bits).
//! - **Address → indices**: mask off the offset and each 9-bit index from the
//!   bottom up; bits 63:48 are dropped.
//!
//! ## Sign extension threshold
//!
//! Architecturally the upper canonical half starts at PML4 index 256 (address
//! bit 47). Older tooling used 480 instead, which leaves indices 256..479 with
//! zeroed upper bits. Both are available via [`SignExtension`].

use crate::error::RangeError;
use crate::index::{PageOffset, PageTableIndices, PdIndex, PdptIndex, Pml4Index, PtIndex, TableLevel};
use crate::layout::{INDEX_BITS, OFFSET_BITS, SIGN_EXTENSION_FILL};
use crate::virtual_address::VirtualAddress;
use core::fmt;
use log::{debug, trace, warn};

/// Where the upper canonical half begins when building an address.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SignExtension {
    /// Fill bits 63:48 for PML4 indices `>= 256`.
    #[default]
    Canonical,
    /// Fill bits 63:48 for PML4 indices `>= 480`, matching older paging
    /// tools. Indices 256..479 yield non-canonical addresses.
    Legacy,
}

impl SignExtension {
    /// First PML4 index whose address gets the upper bits filled.
    #[must_use]
    pub const fn threshold(self) -> u64 {
        match self {
            Self::Canonical => 256,
            Self::Legacy => 480,
        }
    }

    #[inline]
    #[must_use]
    pub const fn fills_upper_bits(self, pml4: u64) -> bool {
        pml4 >= self.threshold()
    }
}

/// Whether inputs are range-checked.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Validation {
    /// Reject indices `>= 512` and non-canonical addresses.
    #[default]
    Strict,
    /// No checks: oversized indices spill into neighbouring fields and
    /// non-canonical addresses decode as if canonical.
    Permissive,
}

impl Validation {
    #[inline]
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Options shared by both conversions.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ConversionOptions {
    pub sign_extension: SignExtension,
    pub validation: Validation,
}

impl ConversionOptions {
    #[must_use]
    pub const fn new(sign_extension: SignExtension, validation: Validation) -> Self {
        Self {
            sign_extension,
            validation,
        }
    }

    /// Bit-for-bit behavior of older paging tools: threshold 480, no checks.
    #[must_use]
    pub const fn legacy() -> Self {
        Self::new(SignExtension::Legacy, Validation::Permissive)
    }

    #[must_use]
    pub const fn with_sign_extension(mut self, sign_extension: SignExtension) -> Self {
        self.sign_extension = sign_extension;
        self
    }

    #[must_use]
    pub const fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }
}

/// Four index values as entered, not yet range-checked.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RawIndices {
    pub pml4: u64,
    pub pdpt: u64,
    pub pd: u64,
    pub pt: u64,
}

impl RawIndices {
    #[must_use]
    pub const fn new(pml4: u64, pdpt: u64, pd: u64, pt: u64) -> Self {
        Self { pml4, pdpt, pd, pt }
    }

    /// Check every index against the 9-bit range.
    ///
    /// # Errors
    /// Returns [`RangeError::IndexOutOfRange`] for the first index (top-down)
    /// that is `>= 512`.
    pub const fn validate(self) -> Result<PageTableIndices, RangeError> {
        let pml4 = match Pml4Index::try_new(self.pml4) {
            Ok(i) => i,
            Err(e) => return Err(e),
        };
        let pdpt = match PdptIndex::try_new(self.pdpt) {
            Ok(i) => i,
            Err(e) => return Err(e),
        };
        let pd = match PdIndex::try_new(self.pd) {
            Ok(i) => i,
            Err(e) => return Err(e),
        };
        let pt = match PtIndex::try_new(self.pt) {
            Ok(i) => i,
            Err(e) => return Err(e),
        };
        Ok(PageTableIndices::new(pml4, pdpt, pd, pt))
    }
}

impl From<PageTableIndices> for RawIndices {
    fn from(ix: PageTableIndices) -> Self {
        Self::new(
            ix.pml4.as_u64(),
            ix.pdpt.as_u64(),
            ix.pd.as_u64(),
            ix.pt.as_u64(),
        )
    }
}

/// An address split into its page-walk indices and page offset.
///
/// The [`Display`](fmt::Display) form is the `v2i` tool output:
///
/// ```text
/// PML4 index: 511
/// PDP index: 0
/// PD index: 0
/// PT index: 0
/// Page offset: 0x0
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Decomposition {
    pub indices: PageTableIndices,
    pub offset: PageOffset,
}

impl Decomposition {
    #[must_use]
    pub const fn of(va: VirtualAddress) -> Self {
        Self {
            indices: va.indices(),
            offset: va.page_offset(),
        }
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in TableLevel::ALL {
            writeln!(f, "{level} index: {}", self.indices.get(level))?;
        }
        write!(f, "Page offset: {}", self.offset)
    }
}

/// Build the page base address selected by four indices.
///
/// The page offset is always zero. Arithmetic is 64-bit; under
/// [`Validation::Permissive`] bits of oversized indices overlap the next
/// field and anything shifted past bit 63 is lost.
///
/// # Errors
/// Under [`Validation::Strict`]:
/// - [`RangeError::IndexOutOfRange`] if any index is `>= 512`.
/// - [`RangeError::NonCanonical`] if the result is not canonical, which only
///   happens with [`SignExtension::Legacy`] and a PML4 index in 256..479.
pub fn index_to_address(
    raw: RawIndices,
    options: ConversionOptions,
) -> Result<VirtualAddress, RangeError> {
    debug!("indices → address: {raw:?} ({options:?})");

    if options.validation.is_strict() {
        raw.validate()?;
    }

    let mut addr = raw.pml4;
    if options.sign_extension.fills_upper_bits(raw.pml4) {
        trace!(
            "PML4 index {} >= {}: filling bits 63:48",
            raw.pml4,
            options.sign_extension.threshold()
        );
        addr |= SIGN_EXTENSION_FILL;
    }
    addr = (addr << INDEX_BITS) | raw.pdpt;
    addr = (addr << INDEX_BITS) | raw.pd;
    addr = (addr << INDEX_BITS) | raw.pt;
    addr <<= OFFSET_BITS;

    let va = VirtualAddress::new(addr);
    if !va.is_canonical() {
        if options.validation.is_strict() {
            return Err(RangeError::NonCanonical { address: va });
        }
        warn!("{va} is not a canonical address");
    }

    Ok(va)
}

/// Split an address into its four indices and page offset.
///
/// # Errors
/// Under [`Validation::Strict`], returns [`RangeError::NonCanonical`] if bits
/// 63:48 differ from bit 47. Permissive mode drops those bits silently.
pub fn address_to_index(
    va: VirtualAddress,
    options: ConversionOptions,
) -> Result<Decomposition, RangeError> {
    debug!("address → indices: {va:?} ({options:?})");

    if !va.is_canonical() {
        if options.validation.is_strict() {
            return Err(RangeError::NonCanonical { address: va });
        }
        warn!("{va} is not canonical, ignoring bits 63:48");
    }

    let split = Decomposition::of(va);
    trace!("{va:?} → {:?}", split);
    Ok(split)
}
