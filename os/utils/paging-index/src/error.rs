use crate::index::TableLevel;
use crate::parse::Argument;
use crate::virtual_address::VirtualAddress;
use core::num::ParseIntError;

/// Everything that can go wrong turning command-line input into a conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Wrong number of positional arguments.
    #[error("expected {expected} argument{}, got {found}", plural(.expected))]
    ArgumentCount { expected: usize, found: usize },

    /// An argument is not a valid integer in its radix.
    #[error("invalid {argument}")]
    Parse {
        argument: Argument,
        #[source]
        source: ParseIntError,
    },

    /// Input is well-formed but does not describe a valid 4-level address.
    #[error(transparent)]
    RangeInconsistency(#[from] RangeError),
}

/// Out-of-range input detected under [`Validation::Strict`](crate::Validation::Strict).
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("{level} index {value} is out of range (must be below 512)")]
    IndexOutOfRange { level: TableLevel, value: u64 },

    #[error("address {address} is not canonical (bits 63:48 must all equal bit 47)")]
    NonCanonical { address: VirtualAddress },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn plural(n: &usize) -> &'static str {
    if *n == 1 { "" } else { "s" }
}
