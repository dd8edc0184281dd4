//! Command implementations.
//!
//! Each `run_*` owns the I/O and user-facing output of one subcommand; the
//! document edits themselves live in `crate::patch`.
mod apply;
mod check;
mod init;
mod inspect;

pub use apply::run_apply;
pub use check::run_check;
pub use init::run_init;
pub use inspect::run_inspect;
