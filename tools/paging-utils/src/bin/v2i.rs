use paging_utils::cli::{self, V2iArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::main::<V2iArgs>()
}
