//! Order input types

pub mod cart;

pub use cart::{CartLine, CreateOrderInput, ModifierSelection, OptionSelection};
