pub mod api;
pub mod dashboard;
pub mod inventory;
pub mod items;
pub mod locations;
pub mod warehouses;

pub use api::health;
pub use dashboard::dashboard;
