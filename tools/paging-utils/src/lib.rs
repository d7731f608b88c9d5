//! # Paging Utilities
//!
//! Command-line front ends for [`paging_index`]:
//!
//! - `i2v <pml4> <pdp> <pd> <pt>` prints `VAddr: 0x…`
//! - `v2i <address>` prints the four indices and the page offset
//!
//! Both binaries are thin wrappers around [`cli::main`].

pub mod cli;
pub mod logger;
