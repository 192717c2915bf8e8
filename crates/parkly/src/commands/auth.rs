//! Account handlers: login, logout, register, whoami.

use parkly_core::{Identity, Parkly, Registration, UserData};
use serde_json::{Map, Value};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs, WhoamiArgs};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn login(client: &Parkly, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (profile_name, profile) = config::active_profile(global);
    let email = config::resolve_email(args.email.as_deref(), &profile, &profile_name)?;
    let password = config::resolve_password(&profile, &profile_name)?;

    let identity = util::envelope(client.login(&email, &password).await)?;

    let color = output::should_color(&global.color);
    output::print_status(
        &output::success(
            &format!(
                "Signed in as {} (profile '{profile_name}')",
                identity.display_name()
            ),
            color,
        ),
        global.quiet,
    );
    Ok(())
}

pub async fn logout(client: &Parkly, global: &GlobalOpts) -> Result<(), CliError> {
    let was_signed_in = client.is_authenticated();
    let result = util::envelope(client.logout().await);

    let color = output::should_color(&global.color);
    if was_signed_in {
        output::print_status(&output::success("Signed out", color), global.quiet);
    }
    result.map(drop)
}

pub async fn register(
    client: &Parkly,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (profile_name, profile) = config::active_profile(global);
    let password = config::resolve_password(&profile, &profile_name)?;
    let fields = parse_fields(&args.fields)?;

    let registration = Registration {
        email: args.email,
        password,
        fields,
    };
    let created = util::envelope(client.register(&registration).await)?;

    let out = output::render_single(
        &global.output,
        &created,
        |_| {
            output::success(
                &format!("Registered {}", registration.email),
                output::should_color(&global.color),
            )
        },
        |v| {
            v.get("id")
                .map(ToString::to_string)
                .unwrap_or_default()
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn whoami(
    client: &Parkly,
    args: WhoamiArgs,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let identity = util::require_session(client, profile)?;

    if args.remote {
        let data = util::envelope(client.get_user_data(Some(identity.user_id())).await)?;
        let out = output::render_single(&global.output, &data, user_data_detail, |d| {
            d.profile
                .as_ref()
                .map(|p| p.id.to_string())
                .unwrap_or_default()
        })?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let out = output::render_single(
        &global.output,
        identity.as_ref(),
        identity_detail,
        |i| i.user_id().to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Detail views ─────────────────────────────────────────────────────

fn identity_detail(identity: &Identity) -> String {
    let mut lines = vec![
        format!("User:     {}", identity.display_name()),
        format!("ID:       {}", identity.user_id()),
    ];
    if let Some(at) = identity.expires_at {
        lines.push(format!("Expires:  {}", at.to_rfc3339()));
    }
    lines.join("\n")
}

fn user_data_detail(data: &UserData) -> String {
    let mut lines = Vec::new();
    if let Some(ref profile) = data.profile {
        lines.push(format!("ID:       {}", profile.id));
        let mut keys: Vec<_> = profile.fields.keys().collect();
        keys.sort();
        for key in keys {
            if let Some(Value::String(s)) = profile.fields.get(key) {
                lines.push(format!("{key}: {s}"));
            }
        }
    }
    lines.push(format!(
        "Cars:     {} ({} parked)",
        data.cars.len(),
        data.parked_count()
    ));
    lines.join("\n")
}

/// Parse repeated `KEY=VALUE` flags into registration fields.
fn parse_fields(raw: &[String]) -> Result<Map<String, Value>, CliError> {
    raw.iter()
        .map(|pair| {
            let (key, value) = pair.split_once('=').ok_or_else(|| CliError::Validation {
                field: "field".into(),
                message: format!("Expected KEY=VALUE, got '{pair}'"),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "field".into(),
                    message: format!("Empty key in '{pair}'"),
                });
            }
            Ok((key.to_owned(), Value::String(value.to_owned())))
        })
        .collect()
}
