//! Client side of the collection point registry.
//!
//! - [`api`] -- typed HTTP client for the points API
//! - [`geography`] -- state/city lookup against an administrative-geography service
//! - [`location`] -- device geolocation port
//! - [`form`] -- the registration form state machine
//! - [`flow`] -- async driver performing the form's effects

pub mod api;
pub mod error;
pub mod flow;
pub mod form;
pub mod geography;
pub mod location;

pub use api::{EcoletaClient, PointsApi};
pub use error::ClientError;
pub use flow::{FormFlow, UiSignal};
pub use form::{Effect, FormEvent, FormField, FormStage, PointForm};
pub use geography::{GeographyPort, IbgeGeography};
pub use location::{FixedLocation, LocationPort, UnavailableLocation};
