//! Registry output formatting.

use std::path::Path;

use owo_colors::OwoColorize;
use serde::Serialize;
use sieve_rs::FieldRegistry;

/// JSON output structure for the registry command.
#[derive(Serialize)]
pub struct RegistryOutput<'a> {
    pub path: String,
    pub registry: &'a FieldRegistry,
}

/// Formats the registry as JSON.
pub fn format_registry_json(
    path: &Path,
    registry: &FieldRegistry,
) -> Result<String, serde_json::Error> {
    let output = RegistryOutput {
        path: path.display().to_string(),
        registry,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats the registry as two tables: filter fields, then order fields.
pub fn format_registry_table(path: &Path, registry: &FieldRegistry, use_colors: bool) -> String {
    let mut output = format!("Registry: {}\n\n", path.display());

    if registry.is_empty() {
        output.push_str("No fields defined.\n");
        return output;
    }

    let header = format!("{:<20} {:<9} {:<25} {}", "Field", "Type", "Column", "Extra");
    push_header(&mut output, &header, use_colors);
    for (name, descriptor) in registry.fields() {
        let extra = match (&descriptor.raw_sql, &descriptor.join) {
            (Some(template), _) => format!("raw: {template}"),
            (None, Some(join)) => format!("join: {join}"),
            (None, None) => String::new(),
        };
        output.push_str(
            format!(
                "{:<20} {:<9} {:<25} {}",
                name,
                descriptor.field_type.as_str(),
                descriptor.column,
                extra
            )
            .trim_end(),
        );
        output.push('\n');
    }

    output.push('\n');
    let header = format!("{:<20} {:<35} {}", "Order", "Column", "Join");
    push_header(&mut output, &header, use_colors);
    for (name, field) in registry.order_fields() {
        output.push_str(
            format!(
                "{:<20} {:<35} {}",
                name,
                field.column,
                field.join.as_deref().unwrap_or("")
            )
            .trim_end(),
        );
        output.push('\n');
    }

    output
}

fn push_header(output: &mut String, header: &str, use_colors: bool) {
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(header);
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_rs::{FieldDescriptor, FieldType, OrderField};

    fn registry() -> FieldRegistry {
        FieldRegistry::new()
            .with_field("age", FieldDescriptor::new("p.age", FieldType::Int))
            .with_field(
                "team",
                FieldDescriptor::new("t.name", FieldType::String)
                    .with_join("JOIN teams t ON t.id = p.team_id"),
            )
            .with_order("age", OrderField::new("p.age"))
    }

    #[test]
    fn test_registry_table() {
        let output = format_registry_table(Path::new("reg.toml"), &registry(), false);
        assert!(output.starts_with("Registry: reg.toml\n"));
        assert!(output.contains("age                  int       p.age\n"), "{output}");
        assert!(output.contains("join: JOIN teams t ON t.id = p.team_id"));
        assert!(output.contains("age                  p.age\n"), "{output}");
    }

    #[test]
    fn test_registry_table_empty() {
        let output = format_registry_table(Path::new("reg.toml"), &FieldRegistry::new(), false);
        assert!(output.ends_with("No fields defined.\n"));
    }

    #[test]
    fn test_registry_json() {
        let output = format_registry_json(Path::new("reg.toml"), &registry()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["path"], "reg.toml");
        assert_eq!(json["registry"]["fields"]["age"]["type"], "int");
        assert_eq!(json["registry"]["order"]["age"]["column"], "p.age");
    }
}
