//! Database document models

pub mod cart;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod serde_helpers;

pub use cart::{Cart, CartItem};
pub use dining_table::DiningTable;
pub use menu_item::{MenuItem, MenuItemStatus, MenuModifierGroup, MenuModifierOption};
pub use order::{ModifierOption, ModifierSelection, Order, OrderItem};
