//! End-to-end harness for the Go Live streaming application.
//!
//! The harness drives a real Chromium through CDP but keeps every policy
//! decision browser-free behind the [`driver::AppPage`] seam:
//!
//! - [`config`]: environment-driven credentials, URLs and CI-scaled waits.
//! - [`session`]: the persisted session snapshot, its freshness policy,
//!   the establisher, the per-navigation authentication guard and the
//!   once-per-process setup gate.
//! - [`wait`]: the CI-aware readiness ladder for live-media surfaces.
//! - [`driver`]: the [`driver::AppPage`] trait, the chromiumoxide
//!   implementation and a scripted fake for deterministic tests.
//! - [`pages`]: intent-level page objects for the streaming, classroom and
//!   whiteboard flows, with [`data`] holding their scripted inputs.

pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod pages;
pub mod session;
pub mod wait;

pub use config::{HarnessConfig, Timeouts};
pub use driver::{AppPage, ChromiumDriver, FakePage, Target};
pub use error::{HarnessError, Result};
pub use session::{AuthGuard, GuardedPage, SessionEstablisher, SessionStore};
pub use wait::{ReadinessProbe, ReadinessSignal};
