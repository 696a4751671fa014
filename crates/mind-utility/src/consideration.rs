use std::borrow::Cow;

use mind_core::{ExecContext, WorldMut};

use crate::curve::{clamp_unit, ResponseCurve};

type InputFn<W> = Box<dyn FnMut(&mut ExecContext<'_, W>) -> f32>;

/// One factor of a [`crate::UtilityAction`] score: reads a raw input from the entity's context and
/// shapes it with a [`ResponseCurve`].
pub struct Consideration<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    input: InputFn<W>,
    curve: ResponseCurve,
}

impl<W> Consideration<W>
where
    W: WorldMut + 'static,
{
    /// `input` should already be normalized to `[0, 1]`; anything outside is clamped and NaN
    /// reads as `0`.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        input: impl FnMut(&mut ExecContext<'_, W>) -> f32 + 'static,
        curve: ResponseCurve,
    ) -> Self {
        Self {
            name: name.into(),
            input: Box::new(input),
            curve,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn curve(&self) -> ResponseCurve {
        self.curve
    }

    pub fn evaluate(&mut self, ctx: &mut ExecContext<'_, W>) -> f32 {
        let raw = clamp_unit((self.input)(ctx));
        self.curve.evaluate(raw)
    }
}

impl<W> std::fmt::Debug for Consideration<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consideration")
            .field("name", &self.name)
            .field("curve", &self.curve)
            .finish()
    }
}
