//! Commands - CLI Command Implementations
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

pub mod init;
pub mod samplers;
pub mod train;

pub(crate) mod utils;
