//! Turning returned errors into `Err` values.
//!
//! An [`OutcomeBuilder`] is configured once (consuming `self` for every
//! mapping) and then only read. Each registered mapping matches one concrete
//! error type exactly; the first registered match wins. An error that matches
//! nothing, when no catch-all was registered, is handed back untouched.

use std::any::{TypeId, type_name};
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use indexmap::IndexMap;
use tracing::debug;

use crate::outcome::Fallible;

/// The error channel understood by [`OutcomeBuilder`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

type Mapper<E> = Box<dyn Fn(BoxError) -> Result<E, BoxError> + Send + Sync>;
type CatchAll<E> = Box<dyn Fn(BoxError) -> E + Send + Sync>;

struct Mapping<E> {
    type_name: &'static str,
    map: Mapper<E>,
}

/// Maps error types raised by an action onto the `Err` branch of `R`.
pub struct OutcomeBuilder<R: Fallible> {
    mappings: IndexMap<TypeId, Mapping<R::Err>>,
    otherwise: Option<CatchAll<R::Err>>,
    _result: PhantomData<fn() -> R>,
}

impl<R: Fallible> OutcomeBuilder<R> {
    pub fn new() -> Self {
        Self {
            mappings: IndexMap::new(),
            otherwise: None,
            _result: PhantomData,
        }
    }

    /// Convert errors whose concrete type is exactly `X`.
    ///
    /// Registering the same type again replaces the earlier mapping and keeps
    /// its position.
    pub fn map_error<X>(mut self, map: impl Fn(X) -> R::Err + Send + Sync + 'static) -> Self
    where
        X: Error + Send + Sync + 'static,
    {
        let mapping = Mapping {
            type_name: type_name::<X>(),
            map: Box::new(move |error: BoxError| match error.downcast::<X>() {
                Ok(concrete) => Ok(map(*concrete)),
                Err(other) => Err(other),
            }),
        };
        self.mappings.insert(TypeId::of::<X>(), mapping);
        self
    }

    /// Convert every error no exact mapping claimed.
    pub fn map_else(mut self, map: impl Fn(BoxError) -> R::Err + Send + Sync + 'static) -> Self {
        self.otherwise = Some(Box::new(map));
        self
    }

    /// Number of exact mappings registered.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty() && self.otherwise.is_none()
    }

    /// Run `action`, wrapping success as `Ok` and mapped errors as `Err`.
    ///
    /// The outer `Err` carries an error nothing was registered for, unchanged.
    pub fn try_run<E>(&self, action: impl FnOnce() -> Result<R::Ok, E>) -> Result<R, BoxError>
    where
        E: Into<BoxError>,
    {
        match action() {
            Ok(ok) => Ok(R::from_ok(ok)),
            Err(error) => self.recover(error.into()),
        }
    }

    /// Suspending form of [`try_run`](Self::try_run).
    pub async fn try_run_async<E, Fut>(&self, action: impl FnOnce() -> Fut) -> Result<R, BoxError>
    where
        E: Into<BoxError>,
        Fut: Future<Output = Result<R::Ok, E>>,
    {
        match action().await {
            Ok(ok) => Ok(R::from_ok(ok)),
            Err(error) => self.recover(error.into()),
        }
    }

    fn recover(&self, mut error: BoxError) -> Result<R, BoxError> {
        for mapping in self.mappings.values() {
            match (mapping.map)(error) {
                Ok(err) => {
                    debug!(error_type = mapping.type_name, "mapped error onto Err");
                    return Ok(R::from_err(err));
                }
                Err(unclaimed) => error = unclaimed,
            }
        }

        match &self.otherwise {
            Some(otherwise) => {
                debug!("mapped error through catch-all");
                Ok(R::from_err(otherwise(error)))
            }
            None => Err(error),
        }
    }
}

impl<R: Fallible> Default for OutcomeBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Fallible> fmt::Debug for OutcomeBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mapped: Vec<&str> = self.mappings.values().map(|m| m.type_name).collect();
        f.debug_struct("OutcomeBuilder")
            .field("mapped", &mapped)
            .field("catch_all", &self.otherwise.is_some())
            .finish()
    }
}
