#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ExecContext, WorldMut};

/// Result of ticking a node or action for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Running,
    Success,
    /// Also the resting state of a node that has never run or was reset.
    #[default]
    Failure,
}

impl Status {
    /// `Success` or `Failure`: the current run is over.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Swap `Success` and `Failure`; `Running` passes through.
    pub fn invert(self) -> Self {
        match self {
            Status::Running => Status::Running,
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

impl From<bool> for Status {
    fn from(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// A long-running leaf behaviour whose effects go through the host world (movement, animation,
/// sound, ...).
///
/// `start` runs once before the first `tick` of a run. `cancel` runs only when the owning node is
/// interrupted before `tick` reported a terminal status.
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    fn start(&mut self, _ctx: &mut ExecContext<'_, W>) {}

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status;

    fn cancel(&mut self, _ctx: &mut ExecContext<'_, W>) {}
}
