//! # Argument Parsing
//!
//! Turns positional command-line strings into conversion inputs. Indices are
//! decimal, addresses are hexadecimal with an optional `0x` prefix.

use crate::convert::RawIndices;
use crate::error::ConversionError;
use crate::index::TableLevel;
use crate::virtual_address::VirtualAddress;
use core::fmt;

/// Names the argument a [`ConversionError::Parse`] refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Argument {
    Index(TableLevel),
    Address,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(level) => write!(f, "{level} index"),
            Self::Address => f.write_str("hexadecimal address"),
        }
    }
}

/// Parse a decimal index for `level`.
///
/// Values are not range-checked here; that is the job of
/// [`Validation::Strict`](crate::Validation::Strict).
///
/// # Errors
/// Returns [`ConversionError::Parse`] if `s` is not a non-negative decimal
/// integer that fits into 64 bits.
pub fn parse_index(level: TableLevel, s: &str) -> Result<u64, ConversionError> {
    s.trim()
        .parse::<u64>()
        .map_err(|source| ConversionError::Parse {
            argument: Argument::Index(level),
            source,
        })
}

/// Parse a hexadecimal address, with or without a `0x`/`0X` prefix.
///
/// # Errors
/// Returns [`ConversionError::Parse`] if the digits are empty, signed, not
/// hexadecimal, or wider than 64 bits.
pub fn parse_address(s: &str) -> Result<VirtualAddress, ConversionError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    // from_str_radix accepts a sign of its own; a lone sign is an invalid digit
    let digits = match digits.as_bytes().first() {
        Some(b'+' | b'-') => &digits[..1],
        _ => digits,
    };

    u64::from_str_radix(digits, 16)
        .map(VirtualAddress::new)
        .map_err(|source| ConversionError::Parse {
            argument: Argument::Address,
            source,
        })
}

/// Parse exactly four decimal indices in PML4, PDP, PD, PT order.
///
/// # Errors
/// - [`ConversionError::ArgumentCount`] unless exactly four arguments are given.
/// - [`ConversionError::Parse`] for the first malformed index.
pub fn parse_index_args<S: AsRef<str>>(args: &[S]) -> Result<RawIndices, ConversionError> {
    let [pml4, pdpt, pd, pt] = args else {
        return Err(ConversionError::ArgumentCount {
            expected: TableLevel::ALL.len(),
            found: args.len(),
        });
    };

    Ok(RawIndices {
        pml4: parse_index(TableLevel::Pml4, pml4.as_ref())?,
        pdpt: parse_index(TableLevel::Pdpt, pdpt.as_ref())?,
        pd: parse_index(TableLevel::Pd, pd.as_ref())?,
        pt: parse_index(TableLevel::Pt, pt.as_ref())?,
    })
}

/// Parse exactly one hexadecimal address.
///
/// # Errors
/// - [`ConversionError::ArgumentCount`] unless exactly one argument is given.
/// - [`ConversionError::Parse`] if the address is malformed.
pub fn parse_address_args<S: AsRef<str>>(args: &[S]) -> Result<VirtualAddress, ConversionError> {
    match args {
        [addr] => parse_address(addr.as_ref()),
        _ => Err(ConversionError::ArgumentCount {
            expected: 1,
            found: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_prefixes() {
        for s in ["0x7f8000000000", "0X7F8000000000", "7f8000000000", " 0x7f8000000000\n"] {
            assert_eq!(parse_address(s).unwrap().as_u64(), 0x7F80_0000_0000, "{s:?}");
        }
        assert_eq!(parse_address("ffffffffffffffff").unwrap().as_u64(), u64::MAX);
    }

    #[test]
    fn address_rejects_garbage() {
        for s in [
            "",
            "0x",
            "xyz",
            "0x1g",
            "-0x10",
            "+0x10",
            "0x+10",
            "0x-10",
            "++10",
            "+10",
            "0x1_0000_0000_0000_0000",
            "10000000000000000",
        ] {
            let err = parse_address(s).unwrap_err();
            assert!(
                matches!(
                    err,
                    ConversionError::Parse {
                        argument: Argument::Address,
                        ..
                    }
                ),
                "{s:?}: {err:?}"
            );
        }
    }

    #[test]
    fn index_args_in_order() {
        let raw = parse_index_args(&["1", "2", "3", "4"]).unwrap();
        assert_eq!(raw, RawIndices::new(1, 2, 3, 4));
    }

    #[test]
    fn index_args_are_not_range_checked() {
        let raw = parse_index_args(&["512", "0", "0", "99999"]).unwrap();
        assert_eq!(raw.pml4, 512);
        assert_eq!(raw.pt, 99_999);
    }

    #[test]
    fn index_args_count() {
        let none: [&str; 0] = [];
        assert_eq!(
            parse_index_args(&none),
            Err(ConversionError::ArgumentCount {
                expected: 4,
                found: 0
            })
        );
        assert_eq!(
            parse_index_args(&["1", "2", "3"]),
            Err(ConversionError::ArgumentCount {
                expected: 4,
                found: 3
            })
        );
        assert!(parse_index_args(&["1", "2", "3", "4", "5"]).is_err());
    }

    #[test]
    fn index_args_name_the_bad_field() {
        let err = parse_index_args(&["1", "two", "3", "4"]).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Parse {
                argument: Argument::Index(TableLevel::Pdpt),
                ..
            }
        ));
        assert_eq!(err.to_string(), "invalid PDP index");

        let err = parse_index_args(&["-1", "0", "0", "0"]).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Parse {
                argument: Argument::Index(TableLevel::Pml4),
                ..
            }
        ));
    }

    #[test]
    fn address_args_count() {
        let none: [String; 0] = [];
        assert_eq!(
            parse_address_args(&none),
            Err(ConversionError::ArgumentCount {
                expected: 1,
                found: 0
            })
        );
        assert!(parse_address_args(&["0x1000", "0x2000"]).is_err());
        assert_eq!(
            parse_address_args(&[String::from("0x1000")]).unwrap().as_u64(),
            0x1000
        );
    }
}
