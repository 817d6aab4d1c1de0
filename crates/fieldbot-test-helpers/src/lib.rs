//! Shared test utilities for fieldbot.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`fakes`] - Recording fakes of every robot collaborator
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! fieldbot-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use fieldbot_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod must;
pub mod prelude;

#[cfg(feature = "fakes")]
#[cfg_attr(docsrs, doc(cfg(feature = "fakes")))]
pub mod fakes;

pub use must::*;
