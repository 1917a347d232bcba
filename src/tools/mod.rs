//! Thin clients for the external programs actions drive.
//!
//! Each client owns an `Arc<dyn CommandRunner>` and never spawns processes
//! itself, so dry-run mode and tests apply uniformly.

pub mod bundler;
pub mod homebrew;
pub mod rbenv;
pub mod xcode;

pub use bundler::Bundler;
pub use homebrew::{Homebrew, Package};
pub use rbenv::Rbenv;
pub use xcode::Xcode;
