//! The two-tag success/failure model.
//!
//! [`Outcome`] is the generic result value returned by the combinators.
//! Generated result types implement [`Fallible`] so they share the same
//! surface: a combinator hands back an `Outcome`, and the flattening variants
//! (`and_then`, `or_else`) hand back whatever [`Fallible`] the closure builds.

use crate::builder::OutcomeBuilder;

/// A success (`Ok`) or failure (`Err`) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome<T, E> {
    Ok(T),
    Err(E),
}

impl<T, E> Outcome<T, E> {
    /// Borrow both branches.
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Ok(ok) => Outcome::Ok(ok),
            Outcome::Err(err) => Outcome::Err(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(ok) => Outcome::Ok(ok),
            Err(err) => Outcome::Err(err),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(ok) => Ok(ok),
            Outcome::Err(err) => Err(err),
        }
    }
}

/// Shared surface of every success/failure type.
///
/// Implementors supply the two factories and the two projections; every
/// combinator is provided on top of them.
#[allow(async_fn_in_trait)]
pub trait Fallible: Sized {
    type Ok;
    type Err;

    fn from_ok(ok: Self::Ok) -> Self;

    fn from_err(err: Self::Err) -> Self;

    fn into_outcome(self) -> Outcome<Self::Ok, Self::Err>;

    fn as_outcome(&self) -> Outcome<&Self::Ok, &Self::Err>;

    /// Start configuring an error-mapping builder for this type.
    fn builder() -> OutcomeBuilder<Self> {
        OutcomeBuilder::new()
    }

    fn is_ok(&self) -> bool {
        matches!(self.as_outcome(), Outcome::Ok(_))
    }

    fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// The success payload, if any.
    fn as_ok(&self) -> Option<&Self::Ok> {
        match self.as_outcome() {
            Outcome::Ok(ok) => Some(ok),
            Outcome::Err(_) => None,
        }
    }

    /// The failure payload, if any.
    fn as_err(&self) -> Option<&Self::Err> {
        match self.as_outcome() {
            Outcome::Ok(_) => None,
            Outcome::Err(err) => Some(err),
        }
    }

    /// `(is_err, err)`; the payload is present only in the failure state.
    fn err_value(&self) -> (bool, Option<&Self::Err>) {
        let err = self.as_err();
        (err.is_some(), err)
    }

    /// `(is_err, ok, err)` where exactly one of the payloads is present.
    fn split(&self) -> (bool, Option<&Self::Ok>, Option<&Self::Err>) {
        match self.as_outcome() {
            Outcome::Ok(ok) => (false, Some(ok), None),
            Outcome::Err(err) => (true, None, Some(err)),
        }
    }

    fn into_ok(self) -> Option<Self::Ok> {
        match self.into_outcome() {
            Outcome::Ok(ok) => Some(ok),
            Outcome::Err(_) => None,
        }
    }

    fn into_result(self) -> Result<Self::Ok, Self::Err> {
        self.into_outcome().into()
    }

    /// Take the success payload.
    ///
    /// # Panics
    ///
    /// Panics when the value is in the failure state.
    fn unwrap_ok(self) -> Self::Ok {
        match self.into_outcome() {
            Outcome::Ok(ok) => ok,
            Outcome::Err(_) => panic!("called `unwrap_ok` on a value in the error state"),
        }
    }

    fn match_with<R>(
        self,
        on_ok: impl FnOnce(Self::Ok) -> R,
        on_err: impl FnOnce(Self::Err) -> R,
    ) -> R {
        match self.into_outcome() {
            Outcome::Ok(ok) => on_ok(ok),
            Outcome::Err(err) => on_err(err),
        }
    }

    /// Run exactly one of the actions and hand the value back.
    fn switch(self, on_ok: impl FnOnce(&Self::Ok), on_err: impl FnOnce(&Self::Err)) -> Self {
        match self.as_outcome() {
            Outcome::Ok(ok) => on_ok(ok),
            Outcome::Err(err) => on_err(err),
        }
        self
    }

    fn map<U>(self, map: impl FnOnce(Self::Ok) -> U) -> Outcome<U, Self::Err> {
        match self.into_outcome() {
            Outcome::Ok(ok) => Outcome::Ok(map(ok)),
            Outcome::Err(err) => Outcome::Err(err),
        }
    }

    /// Flattening `map`: the closure builds the next result itself.
    fn and_then<R>(self, map: impl FnOnce(Self::Ok) -> R) -> R
    where
        R: Fallible<Err = Self::Err>,
    {
        match self.into_outcome() {
            Outcome::Ok(ok) => map(ok),
            Outcome::Err(err) => R::from_err(err),
        }
    }

    fn map_err<F>(self, map: impl FnOnce(Self::Err) -> F) -> Outcome<Self::Ok, F> {
        match self.into_outcome() {
            Outcome::Ok(ok) => Outcome::Ok(ok),
            Outcome::Err(err) => Outcome::Err(map(err)),
        }
    }

    /// Flattening `map_err`.
    fn or_else<R>(self, map: impl FnOnce(Self::Err) -> R) -> R
    where
        R: Fallible<Ok = Self::Ok>,
    {
        match self.into_outcome() {
            Outcome::Ok(ok) => R::from_ok(ok),
            Outcome::Err(err) => map(err),
        }
    }

    fn inspect(self, action: impl FnOnce(&Self::Ok)) -> Self {
        if let Some(ok) = self.as_ok() {
            action(ok);
        }
        self
    }

    fn inspect_err(self, action: impl FnOnce(&Self::Err)) -> Self {
        if let Some(err) = self.as_err() {
            action(err);
        }
        self
    }

    /// Await `action` on the success payload, then resume with the value.
    async fn inspect_async(self, action: impl AsyncFnOnce(&Self::Ok)) -> Self {
        if let Some(ok) = self.as_ok() {
            action(ok).await;
        }
        self
    }

    /// Await `action` on the failure payload, then resume with the value.
    async fn inspect_err_async(self, action: impl AsyncFnOnce(&Self::Err)) -> Self {
        if let Some(err) = self.as_err() {
            action(err).await;
        }
        self
    }
}

impl<T, E> Fallible for Outcome<T, E> {
    type Ok = T;
    type Err = E;

    fn from_ok(ok: T) -> Self {
        Outcome::Ok(ok)
    }

    fn from_err(err: E) -> Self {
        Outcome::Err(err)
    }

    fn into_outcome(self) -> Outcome<T, E> {
        self
    }

    fn as_outcome(&self) -> Outcome<&T, &E> {
        self.as_ref()
    }
}
