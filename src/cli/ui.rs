use crate::core::ConversionResult;
use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use serde::Serialize;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Pretty JSON with 4-space indentation.
pub fn render_json(result: &ConversionResult) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    result
        .serialize(&mut serializer)
        .context("Failed to serialize conversion result")?;
    String::from_utf8(buf).context("Serialized result is not valid UTF-8")
}

pub fn render_table(result: &ConversionResult) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Currency"), header_cell("Amount")]);

    for (currency, amount) in &result.output {
        table.add_row(vec![
            Cell::new(currency),
            Cell::new(format!("{amount:.2}")).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        style_text(
            &format!("{:.2} {}", result.input.amount, result.input.currency),
            StyleType::Title
        )
    );
    output.push_str(&table.to_string());
    if result.output.is_empty() {
        output.push_str(&format!(
            "\n{}",
            style_text("No rates available", StyleType::Subtle)
        ));
    }
    output
}
