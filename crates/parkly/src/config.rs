//! Flag-aware wrappers over `parkly_config`.
//!
//! Profiles and credential resolution live in the shared crate; this
//! module only layers the global CLI flags on top and produces the
//! `ClientConfig` handed to `Parkly`.

use std::time::Duration;

use parkly_config::{Config, Profile};
use parkly_core::{ClientConfig, StorageConfig, TlsMode};
use secrecy::SecretString;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use parkly_config::{config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--url` alone is enough; the session is
/// then kept under the profile name's default data directory.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref url) = global.url {
            profile.base_url.clone_from(url);
        }
        parkly_config::profile_to_client_config(&profile, &profile_name, cfg.defaults.timeout)?
    } else if global.url.is_some() || global.profile.is_none() {
        let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
            field: "url".into(),
            message: format!("Invalid service URL: {url_str}"),
        })?;
        ClientConfig::new(url)
            .with_timeout(Duration::from_secs(cfg.defaults.timeout))
            .with_storage(StorageConfig::Directory(parkly_config::default_data_dir(
                &profile_name,
            )))
    } else {
        return Err(CliError::ProfileNotFound {
            available: available_profiles(&cfg),
            name: profile_name,
        });
    };

    Ok(apply_flags(config, global))
}

fn apply_flags(mut config: ClientConfig, global: &GlobalOpts) -> ClientConfig {
    if global.insecure {
        config = config.with_tls(TlsMode::DangerAcceptInvalid);
    }
    if let Some(secs) = global.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

/// The profile for `global`, or an empty one when only flags are in play.
pub fn active_profile(global: &GlobalOpts) -> (String, Profile) {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&name).cloned().unwrap_or_default();
    (name, profile)
}

/// Login email: `--email`, then the profile chain.
pub fn resolve_email(
    flag: Option<&str>,
    profile: &Profile,
    profile_name: &str,
) -> Result<String, CliError> {
    match flag {
        Some(email) => Ok(email.to_owned()),
        None => Ok(parkly_config::resolve_email(profile, profile_name)?),
    }
}

/// Password from the profile chain, else an interactive prompt.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, CliError> {
    match parkly_config::resolve_password(profile, profile_name) {
        Ok(secret) => Ok(secret),
        Err(parkly_config::ConfigError::NoCredentials { .. })
            if std::io::IsTerminal::is_terminal(&std::io::stdin()) =>
        {
            let pw = rpassword::prompt_password("Password: ")?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}
