//! Application-wide helpers.
//!
//! - `errors`: color-eyre hooks and a panic hook that restores the terminal
//! - `logging`: tracing subscriber writing to a file in the data directory
//! - `help_msg`: key binding hints shown in the help bar and popup
//! - `key_events`: printable key names

#[cfg(not(tarpaulin_include))]
pub(crate) mod errors;
pub(crate) mod help_msg;
pub(crate) mod key_events;
#[cfg(not(tarpaulin_include))]
pub(crate) mod logging;
