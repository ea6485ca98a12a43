//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use slide_config::{CloudSection, Config, ConfigError, LocalSection};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of `cfg` with every stored password masked.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    if let Some(cloud) = out.cloud.as_mut() {
        if cloud.password.is_some() {
            cloud.password = Some(REDACTED.into());
        }
    }
    for local in &mut out.local {
        if !local.password.is_empty() {
            local.password = REDACTED.into();
        }
    }
    out
}

fn prompt_cloud() -> Result<CloudSection, CliError> {
    let username: String = Input::new()
        .with_prompt("Cloud account email")
        .interact_text()
        .map_err(prompt_err)?;
    let password = rpassword::prompt_password("Cloud password: ").map_err(prompt_err)?;
    if username.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "cloud".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password = if store_selection == 0 {
        slide_config::store_cloud_password(&username, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    } else {
        Some(password)
    };

    let invert_position = Confirm::new()
        .with_prompt("Invert positions (100% = closed)?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    Ok(CloudSection {
        username,
        password,
        invert_position,
        base_url: None,
    })
}

fn prompt_locals() -> Result<Vec<LocalSection>, CliError> {
    let hosts: String = Input::new()
        .with_prompt("Device hosts (comma-separated IPs or names)")
        .interact_text()
        .map_err(prompt_err)?;

    hosts
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|host| {
            let mut section = LocalSection::new(host);
            section.invert_position = Confirm::new()
                .with_prompt(format!("Invert positions for {host}?"))
                .default(false)
                .interact()
                .map_err(prompt_err)?;
            Ok(section)
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path(global);
            eprintln!("slidectl configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            if path.exists()
                && !Confirm::new()
                    .with_prompt("A config file already exists. Overwrite it?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?
            {
                return Ok(());
            }

            let mode_choices = &["Cloud account", "Local devices", "Both"];
            let mode = Select::new()
                .with_prompt("How do you reach your Slides?")
                .items(mode_choices)
                .default(1)
                .interact()
                .map_err(prompt_err)?;

            let mut cfg = Config::default();
            if mode != 1 {
                cfg.cloud = Some(prompt_cloud()?);
            }
            if mode != 0 {
                cfg.local = prompt_locals()?;
            }

            // Catch mistakes before writing.
            match slide_config::to_integration_config(&cfg) {
                Ok(_)
                | Err(ConfigError::NoCredentials { .. } | ConfigError::Keyring(_)) => {}
                Err(e) => return Err(e.into()),
            }

            slide_config::save_config(&cfg, &path)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Test it: slidectl covers list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_or_default(global));
            let out = output::render_single(
                &global.output_format(),
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}")),
                |_| config::config_path(global).display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let cloud = cfg.cloud.ok_or_else(|| CliError::Validation {
                field: "cloud".into(),
                reason: "no [cloud] section configured. Run: slidectl config init".into(),
            })?;

            let secret = rpassword::prompt_password(format!("Password for {}: ", cloud.username))
                .map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            slide_config::store_cloud_password(&cloud.username, &secret)?;
            eprintln!("✓ Password stored in system keyring for '{}'", cloud.username);
            Ok(())
        }
    }
}
