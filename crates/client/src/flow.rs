//! Async driver for [`PointForm`].
//!
//! [`FormFlow`] owns the form behind a lock, performs the [`Effect`]s each
//! transition returns and feeds the results back in as events. Effects run
//! concurrently and each result is applied as soon as it completes, so a
//! slow geolocation fix never holds back the item catalog.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Mutex;

use crate::api::PointsApi;
use crate::form::{Effect, FormEvent, PointForm};
use crate::geography::GeographyPort;
use crate::location::LocationPort;

/// Outputs meant for the surrounding UI shell rather than the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSignal {
    /// Show a transient confirmation.
    Notify(String),
    /// Leave the form for the landing page.
    NavigateHome,
}

pub struct FormFlow {
    api: Arc<dyn PointsApi>,
    geography: Arc<dyn GeographyPort>,
    location: Arc<dyn LocationPort>,
    form: Mutex<PointForm>,
    signals: Mutex<Vec<UiSignal>>,
}

impl FormFlow {
    pub fn new(
        api: Arc<dyn PointsApi>,
        geography: Arc<dyn GeographyPort>,
        location: Arc<dyn LocationPort>,
    ) -> Self {
        Self {
            api,
            geography,
            location,
            form: Mutex::new(PointForm::new()),
            signals: Mutex::new(Vec::new()),
        }
    }

    /// Start the reference loads. Resolves once all of them have settled.
    pub async fn mount(&self) {
        self.dispatch(FormEvent::Mounted).await;
    }

    /// Apply a user event and run every effect it causes, transitively,
    /// until the form is quiescent.
    pub async fn dispatch(&self, event: FormEvent) {
        let mut pending = FuturesUnordered::new();

        let effects = self.form.lock().await.apply(event);
        for effect in effects {
            pending.push(self.perform(effect));
        }

        while let Some(result) = pending.next().await {
            let Some(event) = result else { continue };

            let effects = self.form.lock().await.apply(event);
            for effect in effects {
                pending.push(self.perform(effect));
            }
        }
    }

    /// A copy of the current form state.
    pub async fn snapshot(&self) -> PointForm {
        self.form.lock().await.clone()
    }

    /// Drain the UI signals raised so far.
    pub async fn take_signals(&self) -> Vec<UiSignal> {
        std::mem::take(&mut *self.signals.lock().await)
    }

    /// Perform one effect, returning the event that reports its outcome.
    async fn perform(&self, effect: Effect) -> Option<FormEvent> {
        match effect {
            Effect::LoadItems => Some(match self.api.list_items().await {
                Ok(items) => FormEvent::ItemsLoaded(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load item catalog");
                    FormEvent::ItemsFailed(e.to_string())
                }
            }),
            Effect::LocateDevice => Some(match self.location.current_position().await {
                Ok(position) => FormEvent::DeviceLocated(position),
                Err(e) => FormEvent::LocationUnavailable(e.to_string()),
            }),
            Effect::LoadUfs => Some(match self.geography.list_ufs().await {
                Ok(ufs) => FormEvent::UfsLoaded(ufs),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load states");
                    FormEvent::UfsFailed(e.to_string())
                }
            }),
            Effect::LoadCities(request) => {
                let result = self.geography.list_cities(&request.uf).await;
                Some(match result {
                    Ok(cities) => FormEvent::CitiesLoaded { request, cities },
                    Err(e) => {
                        tracing::warn!(uf = %request.uf, error = %e, "Failed to load cities");
                        FormEvent::CitiesFailed {
                            request,
                            error: e.to_string(),
                        }
                    }
                })
            }
            Effect::Submit(payload) => Some(match self.api.create_point(&payload).await {
                Ok(point) => FormEvent::SubmitSucceeded(point),
                Err(e) => {
                    tracing::warn!(error = %e, "Point registration failed");
                    FormEvent::SubmitFailed(e.to_string())
                }
            }),
            Effect::Notify(message) => {
                self.signals.lock().await.push(UiSignal::Notify(message));
                None
            }
            Effect::NavigateHome => {
                self.signals.lock().await.push(UiSignal::NavigateHome);
                None
            }
        }
    }
}
