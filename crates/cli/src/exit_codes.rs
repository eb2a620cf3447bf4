//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success; for `run`, every record paired without differences |
//! | 1    | `run` found mismatches or missing records                |
//! | 2    | CLI usage error (bad args; emitted by clap)              |
//! | 3    | Invalid config file                                      |
//! | 4    | Input file could not be loaded                           |
//! | 5    | Report could not be written                              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant here
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed, datasets reconciled.
pub const EXIT_SUCCESS: u8 = 0;

/// Reconciliation completed but found mismatches or missing records.
/// Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_RECON_DIFFERENCES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file unreadable, unparseable, or out of range.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// An input file was unreadable, unsupported, or had no records.
pub const EXIT_RECON_LOAD: u8 = 4;

/// Report serialization or write failure.
pub const EXIT_RECON_OUTPUT: u8 = 5;
