pub mod client;
pub mod error;
pub mod normalize;
pub(crate) mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use retry::Attempted;
pub use normalize::{normalize_details, normalize_summary};
