use super::HEADERS;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use pickup_core::PickupRow;

/// Terminal table, wrapped to `width` columns.
pub fn render_table(rows: &[PickupRow], width: u16, styled: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);

    let headers: Vec<Cell> = HEADERS
        .iter()
        .map(|h| {
            if styled {
                Cell::new(h.cyan().bold().to_string())
            } else {
                Cell::new(h)
            }
        })
        .collect();
    table.set_header(headers);

    for row in rows {
        table.add_row(vec![&row.publisher, &row.date, &row.headline, &row.url]);
    }

    table.to_string()
}
