//! Cover command handlers.

use std::sync::Arc;

use tabled::Tabled;

use slide_core::{Command as CoreCommand, Controller, Cover, CoverBackend, MotorStrength};

use crate::cli::{CoversArgs, CoversCommand, GlobalOpts, StrengthArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CoverRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Backend")]
    backend: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "State")]
    online: String,
}

impl CoverRow {
    fn new(c: &Arc<Cover>, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            backend: c.backend.alias(),
            status: output::paint_status(c.status, 0, color),
            position: util::percent_label(c),
            online: output::paint_online(c.online, color),
        }
    }
}

/// `12s ago`, `-` before the first completed poll.
fn age_label(age: Option<chrono::Duration>) -> String {
    age.map_or_else(|| "-".into(), |d| format!("{}s ago", d.num_seconds().max(0)))
}

fn detail(c: &Arc<Cover>, age: Option<chrono::Duration>, color: bool) -> String {
    let mut lines = vec![
        format!("ID:        {}", c.id),
        format!("Name:      {}", c.name),
        format!("Backend:   {}", c.backend.alias()),
        format!("Status:    {}", output::paint_status(c.status, 0, color)),
        format!("Position:  {}", util::percent_label(c)),
        format!(
            "Raw:       {}",
            c.position.map_or_else(|| "-".into(), |p| format!("{p:.3}"))
        ),
        format!("State:     {}", output::paint_online(c.online, color)),
        format!("Inverted:  {}", c.invert_position),
    ];
    if let Some(touch_go) = c.touch_go {
        lines.push(format!("Touch&Go:  {touch_go}"));
    }
    if let Some(ref d) = c.device {
        lines.push(format!("MAC:       {}", d.mac.as_deref().unwrap_or("-")));
        lines.push(format!("Board rev: {}", d.board_rev.map_or_else(|| "-".into(), |r| r.to_string())));
        lines.push(format!("Device:    {}", d.device_name.as_deref().unwrap_or("-")));
        lines.push(format!("Zone:      {}", d.zone_name.as_deref().unwrap_or("-")));
        lines.push(format!("Curtain:   {}", d.curtain_type.map_or_else(|| "-".into(), |t| t.to_string())));
        lines.push(format!("Calib:     {}", d.calib_time.map_or_else(|| "-".into(), |t| t.to_string())));
    }
    lines.push(format!("Updated:   {}", c.updated_at.to_rfc3339()));
    lines.push(format!("Data age:  {}", age_label(age)));
    lines.join("\n")
}

impl From<StrengthArg> for MotorStrength {
    fn from(arg: StrengthArg) -> Self {
        match arg {
            StrengthArg::Light => Self::Light,
            StrengthArg::Medium => Self::Medium,
            StrengthArg::Strong => Self::Strong,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: CoversArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();
    let color = output::should_color(&global.color_mode());

    match args.command {
        CoversCommand::List => {
            let snap = controller.covers_snapshot();
            let out = output::render_list(&format, &snap, |c| CoverRow::new(c, color), |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CoversCommand::Get { cover } => {
            let c = util::resolve_cover(controller, &cover).await?;
            let age = controller.store().data_age();
            let out = output::render_single(&format, &c, |c| detail(c, age, color), |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CoversCommand::Open { cover } => {
            let id = util::resolve_cover(controller, &cover).await?.id.clone();
            run(controller, CoreCommand::Open { id }, global).await
        }

        CoversCommand::Close { cover } => {
            let id = util::resolve_cover(controller, &cover).await?.id.clone();
            run(controller, CoreCommand::Close { id }, global).await
        }

        CoversCommand::Stop { cover } => {
            let id = util::resolve_cover(controller, &cover).await?.id.clone();
            run(controller, CoreCommand::Stop { id }, global).await
        }

        CoversCommand::SetPosition { cover, percent } => {
            let id = util::resolve_cover(controller, &cover).await?.id.clone();
            run(controller, CoreCommand::SetPosition { id, percent }, global).await
        }

        CoversCommand::Calibrate { cover } => {
            let c = util::resolve_cover(controller, &cover).await?;
            let prompt = format!("Calibrate {}? The curtain will travel end to end.", c.name);
            if !util::confirm("calibrate", &prompt, global.yes)? {
                return Ok(());
            }
            run(controller, CoreCommand::Calibrate { id: c.id.clone() }, global).await
        }

        CoversCommand::Strength { cover, strength } => {
            let id = util::resolve_cover(controller, &cover).await?.id.clone();
            let strength = MotorStrength::from(strength);
            run(controller, CoreCommand::SetMotorStrength { id, strength }, global).await
        }

        CoversCommand::TouchGo { cover, enabled } => {
            let id = util::resolve_cover(controller, &cover).await?.id.clone();
            run(controller, CoreCommand::SetTouchGo { id, enabled }, global).await
        }
    }
}

/// Execute one command and report the optimistic outcome on stderr.
async fn run(controller: &Controller, cmd: CoreCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let verb = cmd.name();
    let result = controller.execute(cmd).await?;
    if !global.quiet {
        let c = &result.cover;
        let via = match c.backend {
            CoverBackend::Cloud { .. } => "cloud",
            CoverBackend::Local { .. } => "local",
        };
        eprintln!("{verb} sent to {} via {via} ({})", c.name, c.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_core::CoverId;

    fn cover() -> Arc<Cover> {
        let mut c = Cover::new(
            CoverId::from("slide_300000000000"),
            "10.0.0.2",
            CoverBackend::Local {
                host: "10.0.0.2".into(),
            },
        );
        c.observe(0.25);
        Arc::new(c)
    }

    #[test]
    fn row_shows_user_facing_percent() {
        let row = CoverRow::new(&cover(), false);
        assert_eq!(row.position, "75%");
        assert_eq!(row.backend, "local:10.0.0.2");
        assert_eq!(row.online, "online");
    }

    #[test]
    fn row_colors_offline_covers_when_enabled() {
        let mut c = Cover::clone(&cover());
        c.online = false;
        let c = Arc::new(c);
        assert!(CoverRow::new(&c, true).online.contains('\u{1b}'));
        assert_eq!(CoverRow::new(&c, false).online, "offline");
    }

    #[test]
    fn detail_without_device_info() {
        let text = detail(&cover(), None, false);
        assert!(text.contains("Position:  75%"));
        assert!(text.contains("Data age:  -"));
        assert!(!text.contains("MAC:"));
    }

    #[test]
    fn detail_reports_data_age() {
        let text = detail(&cover(), Some(chrono::Duration::seconds(12)), false);
        assert!(text.contains("Data age:  12s ago"));
    }

    #[test]
    fn strength_arg_maps_to_preset() {
        assert_eq!(MotorStrength::from(StrengthArg::Strong).currents(), (1500, 1450));
    }
}
