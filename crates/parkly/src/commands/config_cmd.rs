//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use parkly_config::Profile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const VALID_KEYS: &str = "base_url, email, password_env, insecure, timeout, ca_cert, data_dir";

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        message: format!("Prompt failed: {e}"),
    }
}

fn invalid(field: &str, message: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        message: format!("Invalid value for {field}: {message}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ConfigCommand::Init => init(global, color),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{e}")),
                |c| c.active_profile_name(global.profile.as_deref()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::print_status(
                &output::success(&format!("Set {key} on profile '{profile_name}'"), color),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: parkly config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(
                &output::success(&format!("Default profile set to '{name}'"), color),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let secret = read_password()?;
            parkly_config::store_password(&profile_name, &secret)?;
            output::print_status(
                &output::success(
                    &format!("Password stored in system keyring for profile '{profile_name}'"),
                    color,
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("parkly configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let base_url: String = Input::new()
        .with_prompt("Service URL")
        .default("http://localhost:5000".into())
        .interact_text()
        .map_err(prompt_err)?;
    if url::Url::parse(&base_url).is_err() {
        return Err(invalid("base_url", &format!("not a URL: {base_url}")));
    }

    let email: String = Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(prompt_err)?;

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Don't store (prompt on login)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password = match store_selection {
        0 => {
            let secret = read_password()?;
            parkly_config::store_password(&profile_name, &secret)?;
            eprintln!("   {}", output::success("Password stored in system keyring", color));
            None
        }
        1 => {
            let pw = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            Some(pw)
        }
        _ => None,
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            base_url,
            email: Some(email),
            password,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!(
        "\n{}",
        output::success(
            &format!("Configuration written to {}", config_path.display()),
            color
        )
    );
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Sign in: parkly login");
    Ok(())
}

fn read_password() -> Result<SecretString, CliError> {
    let pw = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pw.is_empty() {
        return Err(invalid("password", "cannot be empty"));
    }
    Ok(SecretString::from(pw))
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" | "url" => {
            if url::Url::parse(&value).is_err() {
                return Err(invalid("base_url", &format!("not a URL: {value}")));
            }
            profile.base_url = value;
        }
        "email" => profile.email = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "data_dir" | "data-dir" => profile.data_dir = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                message: format!("Unknown config key '{other}'. Valid keys: {VALID_KEYS}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn set_key_updates_profile_fields() {
        let mut profile = Profile::default();
        set_key(&mut profile, "base-url", "http://localhost:5000".into()).unwrap();
        set_key(&mut profile, "email", "driver@example.com".into()).unwrap();
        set_key(&mut profile, "timeout", "12".into()).unwrap();
        set_key(&mut profile, "data_dir", "/tmp/parkly".into()).unwrap();

        assert_eq!(profile.base_url, "http://localhost:5000");
        assert_eq!(profile.email.as_deref(), Some("driver@example.com"));
        assert_eq!(profile.timeout, Some(12));
        assert_eq!(profile.data_dir, Some(PathBuf::from("/tmp/parkly")));
    }

    #[test]
    fn set_key_rejects_bad_values() {
        let mut profile = Profile::default();
        assert!(set_key(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_key(&mut profile, "base_url", "not a url".into()).is_err());
        let err = set_key(&mut profile, "colour", "red".into()).unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
