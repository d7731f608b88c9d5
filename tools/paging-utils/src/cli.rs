//! Argument definitions and the shared entry point of `i2v` and `v2i`.

use crate::logger;
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, ValueEnum};
use log::info;
use paging_index::{
    ConversionOptions, SignExtension, Validation, address_to_index, index_to_address,
    parse_address_args, parse_index_args,
};
use std::process::ExitCode;

/// Options both tools accept.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Log more to stderr (repeat for debug and trace output)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Skip index range and canonical-form checks
    #[arg(long)]
    pub permissive: bool,
}

impl CommonArgs {
    #[must_use]
    pub const fn validation(&self) -> Validation {
        if self.permissive {
            Validation::Permissive
        } else {
            Validation::Strict
        }
    }
}

/// Command-line spelling of [`SignExtension`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SignExtensionArg {
    /// Upper half starts at PML4 index 256 (address bit 47)
    #[default]
    Canonical,
    /// Upper half starts at PML4 index 480, as in older paging tools
    Legacy,
}

impl From<SignExtensionArg> for SignExtension {
    fn from(value: SignExtensionArg) -> Self {
        match value {
            SignExtensionArg::Canonical => Self::Canonical,
            SignExtensionArg::Legacy => Self::Legacy,
        }
    }
}

/// Build a virtual address from its PML4, PDP, PD and PT indices.
#[derive(Parser, Debug)]
#[command(name = "i2v", version)]
pub struct I2vArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// PML4 index from which bits 63:48 are filled with ones
    #[arg(long, value_enum, default_value_t = SignExtensionArg::Canonical)]
    pub sign_extension: SignExtensionArg,

    /// Same as `--sign-extension legacy --permissive`
    #[arg(long, conflicts_with = "sign_extension")]
    pub legacy: bool,

    /// PML4, PDP, PD and PT index, in that order (decimal)
    #[arg(value_name = "INDEX", allow_negative_numbers = true)]
    pub indices: Vec<String>,
}

/// Split a virtual address into its page-table indices and page offset.
#[derive(Parser, Debug)]
#[command(name = "v2i", version)]
pub struct V2iArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Virtual address (hexadecimal, `0x` prefix optional)
    #[arg(value_name = "ADDRESS")]
    pub address: Vec<String>,
}

/// A converter: parsed arguments in, one block of stdout text out.
pub trait Tool: Parser {
    fn common(&self) -> &CommonArgs;

    /// Perform the conversion and render the output.
    ///
    /// # Errors
    /// Any argument, parse or range error, with context.
    fn run(&self) -> Result<String>;
}

impl I2vArgs {
    #[must_use]
    pub fn options(&self) -> ConversionOptions {
        if self.legacy {
            return ConversionOptions::legacy();
        }
        ConversionOptions::new(self.sign_extension.into(), self.common.validation())
    }
}

impl Tool for I2vArgs {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn run(&self) -> Result<String> {
        let options = self.options();
        info!(
            "sign extension from PML4 index {} ({:?}), {:?} validation",
            options.sign_extension.threshold(),
            options.sign_extension,
            options.validation
        );

        let raw = parse_index_args(self.indices.as_slice())
            .context("cannot read page-table indices")?;
        let va = index_to_address(raw, options).context("cannot build virtual address")?;
        Ok(format!("VAddr: {va}"))
    }
}

impl V2iArgs {
    #[must_use]
    pub const fn options(&self) -> ConversionOptions {
        ConversionOptions::new(SignExtension::Canonical, self.common.validation())
    }
}

impl Tool for V2iArgs {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn run(&self) -> Result<String> {
        let options = self.options();
        info!("{:?} validation", options.validation);

        let va = parse_address_args(self.address.as_slice()).context("cannot read address")?;
        let split = address_to_index(va, options).context("cannot split address")?;
        info!("{va} lies in the {:?} canonical half", va.half());
        Ok(split.to_string())
    }
}

/// Parse arguments, set up logging, convert, print.
///
/// Results go to stdout; diagnostics go to stderr and exit with status 1.
#[must_use]
pub fn main<T: Tool>() -> ExitCode {
    let tool = T::parse();

    if let Err(e) = logger::init(tool.common().verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    match tool.run() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
