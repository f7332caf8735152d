use clap::{Parser, Subcommand};
use eyre::{WrapErr, bail};
use serde::Serialize;
use serde_json::{Value, json};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt};
use unit_safe::Settings;
use unit_safe::normalize::{
    batch_normalize_canonical_urls, batch_normalize_subdomains, extract_subdomain_from_url,
};
use unit_safe::property::{import_property, validate_property_with_units};
use unit_safe::units::{
    self, BackendUnitValue, DisplayUnitValue, UnitType, create_conversion_warning,
    is_decimal_value, parse_numeric_value,
};

#[derive(Debug, Parser)]
#[command(name = "unit-safe", version, about = "Unit-safe property values and app URL cleanup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the units of a unit type with their storage scale.
    Units { unit_type: UnitType },
    /// Encode a display value into scaled-integer storage.
    Encode {
        #[arg(allow_hyphen_values = true)]
        value: String,
        unit: String,
        /// Unit type to encode under; defaults to the unit's own type.
        #[arg(long = "type")]
        unit_type: Option<UnitType>,
        #[arg(long)]
        strict: bool,
    },
    /// Decode a stored integer back into a display unit.
    Decode {
        #[arg(allow_hyphen_values = true)]
        value: i128,
        /// Stored base unit, e.g. `cm2`.
        unit: String,
        /// Display unit to decode into, e.g. `ft2`.
        display: String,
        #[arg(long)]
        strict: bool,
    },
    /// Convert a display value between two units of the same dimension.
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: String,
        from: String,
        to: String,
        #[arg(long)]
        strict: bool,
    },
    /// Validate a property payload read from a file or stdin.
    Validate {
        /// JSON file; `-` or nothing reads stdin.
        path: Option<PathBuf>,
        /// Also print the storage record when the payload is valid.
        #[arg(long)]
        import: bool,
    },
    /// Normalize subdomains, hosts or URLs to bare subdomain labels.
    Subdomain {
        inputs: Vec<String>,
        /// Read each input as a URL and take its subdomain label.
        #[arg(long)]
        from_url: bool,
    },
    /// Normalize pasted URLs into canonical `https://` form.
    Canonical { inputs: Vec<String> },
    /// Validate app URLs against the canonical domain, resolving through the
    /// app registry when they are malformed.
    Resolve {
        urls: Vec<String>,
        #[arg(long)]
        app: Option<String>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!(target = "unit_safe.cli", "{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> eyre::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();
    debug!(target = "unit_safe.cli", ?settings, "settings loaded");

    match cli.command {
        Command::Units { unit_type } => emit(&json!({
            "unitType": unit_type,
            "baseUnit": unit_type.base_unit(),
            "scale": unit_type.default_scale(),
            "units": units::get_units_for_type(unit_type),
        }))?,
        Command::Encode {
            value,
            unit,
            unit_type,
            strict,
        } => {
            let parsed = parse_numeric_value(value.as_str())?;
            let Some(unit_type) = unit_type.or_else(|| units::get_unit_type(&unit)) else {
                bail!("unknown unit `{unit}`; pass --type to store it unscaled");
            };
            let display = DisplayUnitValue::new(parsed, unit.as_str());
            let stored = if strict {
                units::try_to_backend_unit_value(&display, unit_type)?
            } else {
                units::to_backend_unit_value(&display, unit_type)
            }
            .with_editors(settings.editable_by.iter().cloned());
            let notice = create_conversion_warning(&value, parsed, &unit, is_decimal_value(parsed));
            emit(&json!({ "stored": stored, "notice": notice }))?;
        }
        Command::Decode {
            value,
            unit,
            display,
            strict,
        } => {
            let scale = units::registry::lookup(&unit).map(|def| def.scale()).unwrap_or(0);
            let stored = BackendUnitValue {
                value,
                unit,
                scale,
                editable_by: settings.editable_by.clone(),
            };
            let decoded = if strict {
                units::try_from_backend_unit_value(&stored, &display)?
            } else {
                units::from_backend_unit_value(&stored, &display)
            };
            emit(&decoded)?;
        }
        Command::Convert {
            value,
            from,
            to,
            strict,
        } => {
            let parsed = parse_numeric_value(value.as_str())?;
            let converted = if strict {
                units::try_convert_unit(parsed, &from, &to)?
            } else {
                units::convert_unit(parsed, &from, &to)
            };
            emit(&DisplayUnitValue::new(converted, to))?;
        }
        Command::Validate { path, import } => {
            let payload = read_payload(path.as_ref())?;
            let report = validate_property_with_units(&payload);
            if !report.valid {
                emit(&report)?;
                return Ok(ExitCode::FAILURE);
            }
            if import {
                let record = import_property(&payload, &settings.editable_by)?;
                emit(&json!({ "report": report, "record": record }))?;
            } else {
                emit(&report)?;
            }
        }
        Command::Subdomain { inputs, from_url } => {
            let labels: Vec<String> = if from_url {
                inputs
                    .iter()
                    .map(|url| extract_subdomain_from_url(url))
                    .filter(|label| !label.is_empty())
                    .collect()
            } else {
                batch_normalize_subdomains(&inputs)
            };
            emit(&labels)?;
        }
        Command::Canonical { inputs } => emit(&batch_normalize_canonical_urls(&inputs))?,
        Command::Resolve { urls, app } => {
            let registry = settings
                .load_registry()
                .wrap_err("failed to load app registry")?;
            let resolutions =
                registry.batch_validate(urls.iter().map(|url| (url.as_str(), app.as_deref())));
            emit(&resolutions)?;
            if resolutions.len() < urls.len() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_payload(path: Option<&PathBuf>) -> eyre::Result<Value> {
    let raw = match path.filter(|path| path.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).wrap_err("payload is not valid JSON")
}

fn emit<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
