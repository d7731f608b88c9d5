use paging_utils::cli::{self, I2vArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::main::<I2vArgs>()
}
