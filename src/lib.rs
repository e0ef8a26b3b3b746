//! Build and packaging tools for precompiled GPU kernel extensions
//!
//! - [`embed`]: compiled Metal library to C++ header
//! - [`scaffold`]: new kernel project skeleton
//! - [`docs`]: API documentation from kernel sources
//! - [`metadata`]: dependency graph of a directory of packages
//! - [`opcheck`]: operator conformance checks through a host framework

pub mod descriptor;
pub mod docs;
pub mod embed;
pub mod metadata;
pub mod opcheck;
pub mod output;
pub mod scaffold;

pub use descriptor::BuildDescriptor;
