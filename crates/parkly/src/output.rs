//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use parkly_core::Vehicle;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// A status line for stderr: green check on success.
pub fn success(message: &str, color: bool) -> String {
    if color {
        format!("{} {message}", "✓".green().bold())
    } else {
        format!("✓ {message}")
    }
}

/// A status line for stderr: yellow bang for notices.
pub fn notice(message: &str, color: bool) -> String {
    if color {
        format!("{} {}", "!".yellow().bold(), message.yellow())
    } else {
        format!("! {message}")
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct VehicleRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Year")]
    pub year: String,
    #[tabled(rename = "Plate")]
    pub plate: String,
    #[tabled(rename = "Parked")]
    pub parked: &'static str,
    #[tabled(rename = "Logo")]
    pub logo: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id,
            brand: v.brand.clone().unwrap_or_default(),
            model: v.model.clone().unwrap_or_default(),
            year: v.year.map(|y| y.to_string()).unwrap_or_default(),
            plate: v.license_plate.clone().unwrap_or_default(),
            parked: if v.is_parking { "yes" } else { "no" },
            logo: v.logo.clone(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since detail views don't use the
/// `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a status line to stderr, respecting quiet mode.
pub fn print_status(line: &str, quiet: bool) {
    if !quiet {
        eprintln!("{line}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Serialization(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Serialization(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: 7,
            brand: Some("Toyota".into()),
            model: Some("Corolla".into()),
            year: Some(2019),
            license_plate: Some("ABC-123".into()),
            is_own: true,
            color: "N/A".into(),
            is_parking: true,
            logo: "toyota.png".into(),
            parking_spot: None,
        }
    }

    #[test]
    fn plain_lists_ids() {
        let out = render_list(
            &OutputFormat::Plain,
            &[vehicle(), Vehicle { id: 9, ..vehicle() }],
            |v| VehicleRow::from(v),
            |v| v.id.to_string(),
        )
        .unwrap();
        assert_eq!(out, "7\n9");
    }

    #[test]
    fn table_shows_vehicle_columns() {
        let out = render_list(&OutputFormat::Table, &[vehicle()], |v| VehicleRow::from(v), |v| {
            v.id.to_string()
        })
        .unwrap();
        assert!(out.contains("Plate"));
        assert!(out.contains("ABC-123"));
        assert!(out.contains("yes"));
    }

    #[test]
    fn compact_json_uses_wire_names() {
        let out = render_single(
            &OutputFormat::JsonCompact,
            &vehicle(),
            |_| String::new(),
            |_| String::new(),
        )
        .unwrap();
        assert!(out.contains(r#""licensePlate":"ABC-123""#));
        assert!(out.contains(r#""parkingSpot":null"#));
    }

    #[test]
    fn uncolored_status_lines() {
        assert_eq!(success("done", false), "✓ done");
        assert_eq!(notice("careful", false), "! careful");
    }
}
