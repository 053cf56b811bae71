//! Domain models for the storefront.

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;
pub mod session;

pub use cart::{CartItem, CartLine};
pub use customer::Customer;
pub use order::{Order, OrderItem, ShippingAddress, ShippingSelection};
pub use product::Product;
pub use session::{CurrentCustomer, session_keys};
