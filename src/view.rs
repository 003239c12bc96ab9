mod comfort;
mod dashboard;
mod device;
mod forecast;
pub mod grid;

use std::future::Future;

use derive_more::Display;

pub use self::{
    comfort::ComfortReport,
    dashboard::Dashboard,
    device::DeviceDetail,
    forecast::ForecastPage,
    grid::GridControl,
};
use crate::prelude::*;

/// Sequence number of a load, newer loads have greater generations.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub struct Generation(u64);

#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    NotLoaded,

    Loading(Generation),

    Loaded(Generation, T),

    /// Only write operations fail, read loads settle to placeholders instead.
    Failed(Generation, String),
}

impl<T> Loadable<T> {
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(_, data) => Some(data),
            Self::NotLoaded | Self::Loading(_) | Self::Failed(..) => None,
        }
    }
}

/// State of a single view, guarding against out-of-order completions.
#[must_use]
#[derive(Debug)]
pub struct ViewState<T> {
    latest: Generation,
    state: Loadable<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self { latest: Generation::default(), state: Loadable::NotLoaded }
    }
}

impl<T> ViewState<T> {
    /// Start a new load: results of earlier generations are discarded from now on.
    pub fn begin(&mut self) -> Generation {
        self.latest = Generation(self.latest.0 + 1);
        self.state = Loadable::Loading(self.latest);
        self.latest
    }

    /// Store the result unless a newer load has begun since.
    ///
    /// Returns `false` when the result is stale and has been discarded.
    #[must_use]
    pub fn settle(&mut self, generation: Generation, data: T) -> bool {
        if self.accepts(generation) {
            self.state = Loadable::Loaded(generation, data);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn fail(&mut self, generation: Generation, error: &Error) -> bool {
        if self.accepts(generation) {
            self.state = Loadable::Failed(generation, format!("{error:#}"));
            true
        } else {
            false
        }
    }

    /// Run a load that sees a copy of the previously loaded data, and settle it.
    ///
    /// The previous data stays in place until the load completes, so dropping the future keeps it.
    pub async fn reload<F>(&mut self, load: impl FnOnce(Option<T>) -> F) -> Option<&T>
    where
        T: Clone,
        F: Future<Output = T>,
    {
        let data = load(self.state.data().cloned()).await;
        let generation = self.begin();
        if self.settle(generation, data) { self.state.data() } else { None }
    }

    /// Run a write operation, keeping its failure for rendering as well as returning it.
    pub async fn submit(&mut self, operation: impl Future<Output = Result<T>>) -> Result<&T> {
        let generation = self.begin();
        match operation.await {
            Ok(data) => {
                if !self.settle(generation, data) {
                    bail!("superseded by a newer submission");
                }
                self.state.data().context("superseded by a newer submission")
            }
            Err(error) => {
                let _ = self.fail(generation, &error);
                Err(error)
            }
        }
    }

    fn accepts(&self, generation: Generation) -> bool {
        if generation == self.latest {
            true
        } else {
            debug!(%generation, latest = %self.latest, "discarding the stale result");
            false
        }
    }
}
