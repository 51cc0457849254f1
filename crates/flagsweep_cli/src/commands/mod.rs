//! Command handlers for the flagsweep CLI.

pub(crate) mod check;
pub(crate) mod meta;
pub(crate) mod shared;
pub(crate) mod sweep;
