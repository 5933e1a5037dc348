pub mod model;
pub mod store;

pub use model::Instance;
pub use store::{InstanceStore, JsonInstanceStore};
