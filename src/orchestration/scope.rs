//! Scope listing (`-secretscope`)

use crate::core::error::H2vError;
use crate::core::traits::ChoiceRegistry;
use comfy_table::Table;
use comfy_table::presets::UTF8_BORDERS_ONLY;

pub const NO_SERVICES: &str = "No enabled services found.";

/// Provider/service table of everything the registry supports
pub fn render_scope(registry: &dyn ChoiceRegistry) -> Result<String, H2vError> {
    let mut rows = Vec::new();
    for provider in registry.list_providers() {
        for service in registry.list_services(&provider)? {
            rows.push((provider.clone(), service));
        }
    }

    if rows.is_empty() {
        return Ok(NO_SERVICES.to_string());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Provider", "Service"]);
    for (provider, service) in rows {
        table.add_row(vec![provider, service]);
    }

    Ok(table.to_string())
}
