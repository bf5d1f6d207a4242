//! Order command implementation.
//!
//! `stepline order` places the fixed order and prints its items.

use crate::error::Result;
use crate::operations::place_an_order;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::show_report;

/// The order command implementation.
#[derive(Debug, Default)]
pub struct OrderCommand;

impl OrderCommand {
    /// Create a new order command.
    pub fn new() -> Self {
        Self
    }
}

impl Command for OrderCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let operation = place_an_order();
        ui.show_header(operation.name());

        let report = operation.execute(&())?;
        show_report(ui, &report);

        for (item, value) in report.options.iter() {
            let value = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            ui.message(&format!("  {}: {}", item, value));
        }
        ui.success("Order placed");

        Ok(CommandResult::success())
    }
}
