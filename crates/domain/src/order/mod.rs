//! Order request, resource snapshots and the customer order aggregate.

mod aggregate;
pub mod pricing;
mod request;
mod value_objects;

pub use aggregate::CustomerOrder;
pub use pricing::FIXED_SHIPPING;
pub use request::{OrderRequest, ResourceKind};
pub use value_objects::{Address, Card, Customer, Item, Shipment};
