//! Place an order: a pure in-context pipeline.
//!
//! Builds an order in the run's options: a side, a drink, the side doubled,
//! then the main. The last step returns the whole order.

use serde_json::Value;
use thiserror::Error;

use crate::operation::{Operation, Step};

/// Item doubled by [`place_an_order`].
pub const ITEM_TO_DOUBLE: &str = "side";

/// Order failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Asked to double an item that is not in the order yet.
    #[error("cannot double '{item}': it is not in the order")]
    MissingItem { item: String },
}

/// Build the place-an-order operation.
pub fn place_an_order() -> Operation<()> {
    let mut op: Operation<()> = Operation::new("place_an_order");
    op.step("add_side_item", |_, options| {
        options.insert("side", "fries");
        Ok(Value::Null)
    });
    op.step("add_drink", |_, options| {
        options.insert("drink", "coke");
        Ok(Value::Null)
    });
    op.register_step(double_item(ITEM_TO_DOUBLE));
    op.step("add_main_item", |_, options| {
        options.insert("main", "burguer");
        Ok(options.to_value())
    });
    op
}

/// Step that prefixes the order entry `item` with "double".
pub fn double_item<P>(item: impl Into<String>) -> Step<P> {
    let item = item.into();
    Step::new(format!("double_{}", item), move |_, options| {
        let current = options
            .get_str(&item)
            .ok_or_else(|| OrderError::MissingItem { item: item.clone() })?
            .to_string();
        options.insert(item.clone(), format!("double {}", current));
        Ok(Value::Null)
    })
}
