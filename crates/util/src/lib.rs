// Shared support types for the application shell.
//
// Everything here is framework-agnostic: the windows consume these
// types but nothing in this crate knows about any UI toolkit.

pub mod buffer;
pub mod clock;
pub mod freq;
pub mod geom;
pub mod logger;
pub mod timer;
