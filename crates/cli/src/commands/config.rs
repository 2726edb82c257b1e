use std::fs;
use std::path::Path;

use sourcemate_core::config::EngineConfig;
use toml::Value;

/// Renders every effective configuration value with the layer it came
/// from. Precedence is file > default; there is no environment layer.
pub fn run(config_path: Option<&Path>) -> String {
    let config = match EngineConfig::load(config_path) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_doc = load_config_file_doc(config_path);

    let mut lines = vec!["effective config (source precedence: file > default):".to_string()];

    let mut push = |key: &str, value: String| {
        lines.push(render_line(key, &value, field_source(key, config_file_doc.as_ref(), config_path)));
    };

    push("availability.limited_below", config.availability.limited_below.to_string());
    push("fulfillment.fallback_unit_price", config.fulfillment.fallback_unit_price.to_string());
    push("fulfillment.assumed_available", config.fulfillment.assumed_available.to_string());
    push("fulfillment.default_unit", config.fulfillment.default_unit.clone());
    push(
        "fulfillment.price_overrides",
        format!("{} overrides", config.fulfillment.price_overrides.len()),
    );
    for (name, tier) in [
        ("geo.tiers.same_city", &config.geo.tiers.same_city),
        ("geo.tiers.same_metro", &config.geo.tiers.same_metro),
        ("geo.tiers.same_country", &config.geo.tiers.same_country),
        ("geo.tiers.cross_border", &config.geo.tiers.cross_border),
    ] {
        push(name, format!("x{} / +{}d", tier.multiplier, tier.lead_time_offset_days));
    }
    push("geo.metro_areas", format!("{} areas", config.geo.metro_areas.len()));
    push("categories", format!("{} categories", config.categories.len()));
    push("geography", format!("{} countries", config.geography.countries.len()));
    push("synonyms", format!("{} buckets", config.synonyms.len()));
    push("logging.level", config.logging.level.clone());
    push("logging.format", format!("{:?}", config.logging.format));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
