//! Domain models

pub mod company;
pub mod menu;
pub mod modifier;
pub mod order;

pub use company::{Company, OrderPolicy};
pub use menu::{Category, Menu, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use modifier::{Modifier, ModifierCreate, ModifierOption, ModifierUpdate};
pub use order::{
    Order, OrderItem, OrderItemModifier, OrderItemOption, OrderStatus, StatusUpdate,
};
