//! Row types for the persistence store.

pub mod order;
pub mod order_item;
pub mod user;

pub use order::{Order, OrderCreate, OrderUpdate};
pub use order_item::{OrderItem, OrderItemCreate, OrderItemUpdate};
pub use user::{User, UserCreate};
