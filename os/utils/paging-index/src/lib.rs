//! # x86-64 Page-Table Index Conversions
//!
//! Pure conversions between a 4-level x86-64 virtual address and the four
//! page-table indices (plus page offset) that select it during a page walk.
//!
//! ## Layout
//!
//! | Bits | Field | Type |
//! |------|-------|------|
//! | 63:48 | Sign extension (copies of bit 47) | – |
//! | 47:39 | PML4 index | [`Pml4Index`] |
//! | 38:30 | PDP index | [`PdptIndex`] |
//! | 29:21 | PD index | [`PdIndex`] |
//! | 20:12 | PT index | [`PtIndex`] |
//! | 11:0 | Page offset | [`PageOffset`] |
//!
//! The raw bit view is [`AddressLayout`]; [`VirtualAddress`] wraps it with
//! canonical-form helpers.
//!
//! ## Conversions
//!
//! - [`index_to_address`] builds the page base address for four raw indices.
//! - [`address_to_index`] splits an address into a [`Decomposition`].
//!
//! Both take [`ConversionOptions`]: the [`SignExtension`] mode selects where
//! the upper canonical half begins, and [`Validation`] selects whether index
//! ranges and canonical form are checked.
//!
//! ```rust
//! # use paging_index::*;
//! let options = ConversionOptions::default();
//! let va = index_to_address(RawIndices::new(511, 510, 0, 0), options)?;
//! assert_eq!(va.as_u64(), 0xFFFF_FFFF_8000_0000);
//!
//! let split = address_to_index(va, options)?;
//! assert_eq!(split.indices.pml4.as_u16(), 511);
//! assert_eq!(split.indices.pdpt.as_u16(), 510);
//! assert_eq!(split.offset.as_u16(), 0);
//! # Ok::<(), RangeError>(())
//! ```
//!
//! ## Argument Parsing
//!
//! [`parse_index_args`] and [`parse_address_args`] turn command-line strings
//! into inputs for the conversions and report a [`ConversionError`] for a
//! wrong argument count or malformed numbers.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod convert;
mod error;
mod index;
mod layout;
mod parse;
mod virtual_address;

pub use convert::{
    ConversionOptions, Decomposition, RawIndices, SignExtension, Validation, address_to_index,
    index_to_address,
};
pub use error::{ConversionError, RangeError};
pub use index::{PageOffset, PageTableIndices, PdIndex, PdptIndex, Pml4Index, PtIndex, TableLevel};
pub use layout::{
    AddressLayout, ENTRIES_PER_TABLE, INDEX_BITS, OFFSET_BITS, PAGE_SIZE, SIGN_EXTENSION_FILL,
};
pub use parse::{Argument, parse_address, parse_address_args, parse_index, parse_index_args};
pub use virtual_address::{CanonicalHalf, VirtualAddress};
