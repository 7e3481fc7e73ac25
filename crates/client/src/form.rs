//! Registration form state machine.
//!
//! [`PointForm::apply`] is the transition table: it folds a [`FormEvent`]
//! into the form and returns the [`Effect`]s the driver must perform. It
//! never performs I/O itself, so every transition is testable synchronously.
//!
//! ```text
//! Idle --Mounted--> LoadingReference --ItemsLoaded/ItemsFailed--> ReadyNoLocation
//!                                                                    |
//!          DeviceLocated / MapClicked                               v
//!   ReadyNoLocation ------------------------------------------> LocationKnown
//!   (any selection stage) --UfSelected(Some)--> StateSelected --CitySelected--> CitySelected
//!   (any selection stage) --SubmitRequested--> Submitting --SubmitSucceeded--> Done
//!                                                         --SubmitFailed-----> Failed
//! ```
//!
//! The selection stages (`ReadyNoLocation`, `LocationKnown`, `StateSelected`,
//! `CitySelected`) reflect the most advanced selection currently held, so
//! clearing the state selection moves the form back to `LocationKnown` or
//! `ReadyNoLocation`. Editing anything after `Failed` returns to a selection
//! stage, while late load results leave it `Failed`; edits while `Submitting`
//! or `Done` are ignored.

use std::collections::BTreeSet;

use ecoleta_core::types::{DbId, Position};

use crate::api::{CatalogItem, NewPoint, RegisteredPoint};

/// Message surfaced after a successful registration.
pub const CREATED_NOTICE: &str = "Collection point registered.";

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    Idle,
    LoadingReference,
    ReadyNoLocation,
    LocationKnown,
    StateSelected,
    CitySelected,
    Submitting,
    Done,
    Failed,
}

/// Identifies one city-list request. Only the response to the most recent
/// request is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRequest {
    pub uf: String,
    pub seq: u64,
}

/// Free-text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Whatsapp,
}

/// Inputs to the state machine: user actions and load results.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Mounted,
    ItemsLoaded(Vec<CatalogItem>),
    ItemsFailed(String),
    DeviceLocated(Position),
    LocationUnavailable(String),
    UfsLoaded(Vec<String>),
    UfsFailed(String),
    /// `None` is the "no state selected" sentinel.
    UfSelected(Option<String>),
    CitiesLoaded {
        request: CityRequest,
        cities: Vec<String>,
    },
    CitiesFailed {
        request: CityRequest,
        error: String,
    },
    /// `None` is the "no city selected" sentinel.
    CitySelected(Option<String>),
    MapClicked(Position),
    ItemToggled(DbId),
    FieldChanged(FormField, String),
    SubmitRequested,
    SubmitSucceeded(RegisteredPoint),
    SubmitFailed(String),
}

impl FormEvent {
    /// Whether the event changes what the user has entered.
    fn is_edit(&self) -> bool {
        matches!(
            self,
            FormEvent::UfSelected(_)
                | FormEvent::CitySelected(_)
                | FormEvent::MapClicked(_)
                | FormEvent::ItemToggled(_)
                | FormEvent::FieldChanged(..)
        )
    }
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadItems,
    LocateDevice,
    LoadUfs,
    LoadCities(CityRequest),
    Submit(NewPoint),
    Notify(String),
    NavigateHome,
}

/// Accumulated form state.
#[derive(Debug, Clone)]
pub struct PointForm {
    stage: FormStage,
    catalog_settled: bool,

    items: Vec<CatalogItem>,
    ufs: Vec<String>,
    cities: Vec<String>,
    city_seq: u64,

    selected_uf: Option<String>,
    selected_city: Option<String>,
    initial_position: Option<Position>,
    selected_position: Option<Position>,
    selected_items: BTreeSet<DbId>,

    name: String,
    email: String,
    whatsapp: String,

    error: Option<String>,
    created: Option<RegisteredPoint>,
}

impl Default for PointForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PointForm {
    pub fn new() -> Self {
        Self {
            stage: FormStage::Idle,
            catalog_settled: false,
            items: Vec::new(),
            ufs: Vec::new(),
            cities: Vec::new(),
            city_seq: 0,
            selected_uf: None,
            selected_city: None,
            initial_position: None,
            selected_position: None,
            selected_items: BTreeSet::new(),
            name: String::new(),
            email: String::new(),
            whatsapp: String::new(),
            error: None,
            created: None,
        }
    }

    /// Fold one event into the form, returning the effects to perform.
    pub fn apply(&mut self, event: FormEvent) -> Vec<Effect> {
        if event.is_edit() && self.is_locked() {
            tracing::debug!(stage = ?self.stage, "Ignoring edit while form is locked");
            return Vec::new();
        }

        match event {
            FormEvent::Mounted => {
                if self.stage != FormStage::Idle {
                    return Vec::new();
                }
                self.stage = FormStage::LoadingReference;
                return vec![Effect::LoadItems, Effect::LocateDevice, Effect::LoadUfs];
            }

            FormEvent::ItemsLoaded(items) => {
                self.items = items;
                self.catalog_settled = true;
            }
            FormEvent::ItemsFailed(error) => {
                self.error = Some(error);
                self.catalog_settled = true;
            }

            FormEvent::DeviceLocated(position) => {
                self.initial_position = Some(position);
                if self.selected_position.is_none() {
                    self.selected_position = Some(position);
                }
            }
            FormEvent::LocationUnavailable(reason) => {
                tracing::debug!(%reason, "Device location unavailable");
            }

            FormEvent::UfsLoaded(ufs) => self.ufs = ufs,
            FormEvent::UfsFailed(error) => self.error = Some(error),

            FormEvent::UfSelected(uf) => {
                let uf = uf.filter(|u| !u.is_empty());
                if uf == self.selected_uf {
                    return Vec::new();
                }

                // A new state invalidates the city list and any city picked from it.
                self.selected_uf = uf.clone();
                self.selected_city = None;
                self.cities.clear();
                self.city_seq += 1;
                self.settle(true);

                return match uf {
                    Some(uf) => vec![Effect::LoadCities(CityRequest {
                        uf,
                        seq: self.city_seq,
                    })],
                    None => Vec::new(),
                };
            }
            FormEvent::CitiesLoaded { request, cities } => {
                if self.is_current(&request) {
                    self.cities = cities;
                } else {
                    tracing::debug!(uf = %request.uf, seq = request.seq, "Discarding stale city list");
                }
            }
            FormEvent::CitiesFailed { request, error } => {
                if self.is_current(&request) {
                    self.error = Some(error);
                }
            }
            FormEvent::CitySelected(city) => {
                let city = city.filter(|c| !c.is_empty());
                if let Some(ref name) = city {
                    if !self.cities.contains(name) {
                        return Vec::new();
                    }
                }
                self.selected_city = city;
                self.settle(true);
            }

            FormEvent::MapClicked(position) => {
                self.selected_position = Some(position);
                self.settle(true);
            }

            FormEvent::ItemToggled(id) => {
                if !self.selected_items.remove(&id) {
                    self.selected_items.insert(id);
                }
                self.settle(true);
            }

            FormEvent::FieldChanged(field, value) => {
                match field {
                    FormField::Name => self.name = value,
                    FormField::Email => self.email = value,
                    FormField::Whatsapp => self.whatsapp = value,
                }
                self.settle(true);
            }

            FormEvent::SubmitRequested => {
                if self.is_locked() || self.stage == FormStage::LoadingReference {
                    return Vec::new();
                }
                return match self.payload() {
                    Ok(payload) => {
                        self.stage = FormStage::Submitting;
                        self.error = None;
                        vec![Effect::Submit(payload)]
                    }
                    Err(reason) => {
                        self.error = Some(reason.to_string());
                        Vec::new()
                    }
                };
            }
            FormEvent::SubmitSucceeded(point) => {
                if self.stage != FormStage::Submitting {
                    return Vec::new();
                }
                self.stage = FormStage::Done;
                self.created = Some(point);
                return vec![Effect::Notify(CREATED_NOTICE.to_string()), Effect::NavigateHome];
            }
            FormEvent::SubmitFailed(error) => {
                if self.stage == FormStage::Submitting {
                    self.stage = FormStage::Failed;
                    self.error = Some(error);
                }
                return Vec::new();
            }
        }

        self.settle(false);
        Vec::new()
    }

    /// Assemble the create payload from the accumulated state.
    ///
    /// # Errors
    ///
    /// Returns a user-facing reason when the location, state or city is
    /// still missing.
    pub fn payload(&self) -> Result<NewPoint, &'static str> {
        let position = self
            .selected_position
            .ok_or("Select the point's location on the map")?;
        let uf = self.selected_uf.clone().ok_or("Select a state")?;
        let city = self.selected_city.clone().ok_or("Select a city")?;

        Ok(NewPoint {
            name: self.name.clone(),
            email: self.email.clone(),
            whatsapp: self.whatsapp.clone(),
            latitude: position.latitude,
            longitude: position.longitude,
            city,
            uf,
            items: self.selected_items.iter().copied().collect(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn stage(&self) -> FormStage {
        self.stage
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn ufs(&self) -> &[String] {
        &self.ufs
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn selected_uf(&self) -> Option<&str> {
        self.selected_uf.as_deref()
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    /// Where the map should be centred initially (the device position).
    pub fn initial_position(&self) -> Option<Position> {
        self.initial_position
    }

    pub fn selected_position(&self) -> Option<Position> {
        self.selected_position
    }

    pub fn selected_items(&self) -> &BTreeSet<DbId> {
        &self.selected_items
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn whatsapp(&self) -> &str {
        &self.whatsapp
    }

    /// The last load or submit error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The point created by a successful submit.
    pub fn created(&self) -> Option<&RegisteredPoint> {
        self.created.as_ref()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn is_locked(&self) -> bool {
        matches!(self.stage, FormStage::Submitting | FormStage::Done)
    }

    fn is_current(&self, request: &CityRequest) -> bool {
        request.seq == self.city_seq && self.selected_uf.as_deref() == Some(request.uf.as_str())
    }

    /// Recompute the selection stage from what is currently selected.
    ///
    /// `Failed` is only left on a user edit; late load results keep it.
    fn settle(&mut self, edited: bool) {
        let selecting = match self.stage {
            FormStage::LoadingReference => self.catalog_settled,
            FormStage::ReadyNoLocation
            | FormStage::LocationKnown
            | FormStage::StateSelected
            | FormStage::CitySelected => true,
            FormStage::Failed => edited,
            FormStage::Idle | FormStage::Submitting | FormStage::Done => false,
        };

        if selecting {
            self.stage = if self.selected_city.is_some() {
                FormStage::CitySelected
            } else if self.selected_uf.is_some() {
                FormStage::StateSelected
            } else if self.selected_position.is_some() {
                FormStage::LocationKnown
            } else {
                FormStage::ReadyNoLocation
            };
        }
    }
}
