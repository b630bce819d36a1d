//! Once-per-process session setup.

use std::future::Future;
use std::sync::OnceLock;

use tokio::sync::Mutex;
use tracing::info;

use crate::driver::AppPage;
use crate::error::Result;

use super::establish::SessionEstablisher;

/// Single-initialization gate with an explicit reset hook.
///
/// Succeeds at most once; a failed initializer leaves the gate open so the
/// next caller retries. `reset` exists for test isolation only.
#[derive(Debug, Default)]
pub struct SetupGate {
    done: Mutex<bool>,
}

impl SetupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `init` unless a previous call already succeeded.
    ///
    /// Returns `Ok(true)` when `init` ran and succeeded, `Ok(false)` when
    /// the work was already done. An `Err` from `init` propagates and does
    /// not latch the gate.
    pub async fn run_once<F, Fut>(&self, init: F) -> Result<bool>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut done = self.done.lock().await;
        if *done {
            return Ok(false);
        }
        init().await?;
        *done = true;
        Ok(true)
    }

    pub async fn is_done(&self) -> bool {
        *self.done.lock().await
    }

    /// Reopens the gate. Test isolation hook.
    pub async fn reset(&self) {
        *self.done.lock().await = false;
    }
}

/// The process-wide gate suppressing redundant session establishment
/// within one test worker. Workers are separate processes; cross-worker
/// coordination happens through the store file itself.
pub fn session_gate() -> &'static SetupGate {
    static GATE: OnceLock<SetupGate> = OnceLock::new();
    GATE.get_or_init(SetupGate::new)
}

/// Per-test setup path: reuse a usable stored snapshot, otherwise drive a
/// full establishment on `page`. Gated so one worker sets up at most once.
pub async fn bootstrap_session(
    gate: &SetupGate,
    establisher: &SessionEstablisher,
    page: &dyn AppPage,
) -> Result<()> {
    gate.run_once(|| async {
        if establisher.store().usable() {
            info!(target: "golive::session", "using existing auth session");
            return Ok(());
        }
        establisher.establish(page).await.map(|_| ())
    })
    .await
    .map(|_| ())
}
