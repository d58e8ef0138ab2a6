//! One-shot start gates.
//!
//! A [`Gate`] starts closed and can be opened exactly once. Every [`StartCondition`] handed out
//! for it observes the opening, including conditions created afterwards. There is no way to
//! close a gate again.
//!
//! Gates are backed by a [`CancellationToken`]: opening is cancelling the token, waiting is
//! awaiting its cancellation. Once cancelled, the token answers `is_cancelled` with a single
//! atomic load, so the read path needs no locking after the gate is open.

use std::fmt;

use tokio_util::sync::CancellationToken;

mod set;
pub use set::GateSet;

/// Which gate a [`StartCondition`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Never closed; used for tasks that do not wait on anything.
    Always,
    /// Opens when every prestart dependency is satisfied.
    Main,
    /// Opens when every main task has started.
    Poststart,
}

impl GateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Always => "always",
            GateKind::Main => "main",
            GateKind::Poststart => "poststart",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic one-shot broadcast signal.
#[derive(Debug, Clone)]
pub(crate) struct Gate {
    kind: GateKind,
    token: CancellationToken,
}

impl Gate {
    /// New closed gate.
    pub(crate) fn new(kind: GateKind) -> Self {
        Self {
            kind,
            token: CancellationToken::new(),
        }
    }

    /// Gate that is open from the start.
    pub(crate) fn opened(kind: GateKind) -> Self {
        let gate = Self::new(kind);
        gate.token.cancel();
        gate
    }

    /// Open the gate.
    ///
    /// Returns `true` if this call performed the transition, `false` if the gate was
    /// already open. Opening is only ever driven by the single coordinator writer, so the
    /// check-then-cancel pair cannot race with another opener.
    pub(crate) fn open(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();
        true
    }

    #[inline]
    pub(crate) fn is_open(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn condition(&self) -> StartCondition {
        StartCondition {
            kind: self.kind,
            token: self.token.clone(),
        }
    }
}

/// Read-only handle on a gate: "may this task start now?".
///
/// Cheap to clone and safe to share across threads. A condition cannot open its gate.
#[derive(Debug, Clone)]
pub struct StartCondition {
    kind: GateKind,
    token: CancellationToken,
}

impl StartCondition {
    /// Gate this condition observes.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Returns `true` once the gate is open. Stays `true` forever after.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the gate opens.
    ///
    /// Resolves immediately if it is already open. There is no timeout; callers that need to
    /// give up (allocation shutdown, for one) should `select!` this against their own signal.
    pub async fn wait(&self) {
        self.token.cancelled().await
    }
}
