use thiserror::Error;

/// The search ran out of its time or node budget.
///
/// Returned from every frame of an interrupted search; each frame undoes its
/// own move before passing it up, so the position is intact when it reaches
/// the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search budget exhausted")]
pub(crate) struct Aborted;
