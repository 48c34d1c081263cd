//! hubgate_utils
//!
//! Small pieces shared by the other workspace crates. Currently only the
//! tracing bootstrap lives here.

pub mod logging;
