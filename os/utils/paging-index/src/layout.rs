//! # Virtual Address Bit Layout
//!
//! Field view of a 48-bit (4-level) x86-64 virtual address. Each of the four
//! translation levels consumes 9 bits of the address; the low 12 bits select
//! the byte within a 4 KiB page.

use bitfield_struct::bitfield;

/// Number of bits each page-table level consumes from the address.
pub const INDEX_BITS: u32 = 9;

/// Number of bits in the page offset.
pub const OFFSET_BITS: u32 = 12;

/// Entries per page table (`2^INDEX_BITS`).
pub const ENTRIES_PER_TABLE: u64 = 1 << INDEX_BITS;

/// Size of a base page in bytes (`2^OFFSET_BITS`).
pub const PAGE_SIZE: u64 = 1 << OFFSET_BITS;

/// Sixteen ones directly above a 9-bit PML4 index (`0x1FFFE00`).
///
/// OR-ed into the PML4 accumulator before the remaining shifts, so that the
/// ones end up in bits 63:48 of the finished address.
pub const SIGN_EXTENSION_FILL: u64 = 0xFFFF << INDEX_BITS;

/// Raw field view over a 64-bit virtual address.
///
/// No canonical-form checking happens here; every `u64` is representable.
/// See [`VirtualAddress`](crate::VirtualAddress) for the checked helpers.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct AddressLayout {
    /// **Page offset** (bits 11:0): byte within the 4 KiB page.
    #[bits(12)]
    pub offset: u16,

    /// **PT index** (bits 20:12): entry in the page table.
    #[bits(9)]
    pub pt: u16,

    /// **PD index** (bits 29:21): entry in the page directory.
    #[bits(9)]
    pub pd: u16,

    /// **PDP index** (bits 38:30): entry in the page-directory-pointer table.
    #[bits(9)]
    pub pdpt: u16,

    /// **PML4 index** (bits 47:39): entry in the top-level table.
    #[bits(9)]
    pub pml4: u16,

    /// **Sign extension** (bits 63:48): copies of bit 47 in canonical form.
    #[bits(16)]
    pub sign_extension: u16,
}
