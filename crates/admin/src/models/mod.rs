//! Admin domain models.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{Order, OrderItem};
pub use product::Product;
pub use session::{CurrentAdmin, session_keys};
pub use user::AdminUser;
