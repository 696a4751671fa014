use crate::{ExecContext, Status, WorldMut};

/// Top-level decision maker driven once per thinking tick by a [`crate::Brain`].
pub trait Policy<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status;

    /// Drop any in-flight state without running exit hooks.
    fn reset(&mut self) {}
}
