pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod load;
pub mod reshape;
pub mod table;
pub mod view;

pub use cache::{load_cached, ObservationCache};
pub use config::{Config, ReshapeOptions};
pub use error::{FormatError, LoadError, ViewError};
pub use reshape::{reshape, reshape_range};
pub use table::{Observation, ObservationTable};
pub use view::{DashboardSnapshot, DashboardView, Filters};
