//! `watch`: follow cover state until Ctrl-C.
//!
//! Prints the initial state of every cover, then one line per cover whenever
//! its status, position or reachability changes. Structured formats emit one
//! document per change (JSON lines for `json`/`json-compact`).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;

use slide_core::{Controller, Cover, CoverId, CoverStatus};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// The fields a change is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observed {
    status: CoverStatus,
    percent: Option<u8>,
    online: bool,
}

impl From<&Cover> for Observed {
    fn from(c: &Cover) -> Self {
        Self {
            status: c.status,
            percent: c.current_position_percent(),
            online: c.online,
        }
    }
}

#[derive(Serialize)]
struct ChangeEvent<'a> {
    id: &'a CoverId,
    name: &'a str,
    status: CoverStatus,
    position: Option<u8>,
    online: bool,
    updated_at: String,
}

pub async fn handle(controller: &Controller, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let only = match args.cover {
        Some(ref ident) => Some(util::resolve_cover(controller, ident).await?.id.clone()),
        None => None,
    };
    let format = global.output_format();
    let color = output::should_color(&global.color_mode());

    let mut stream = controller.covers();
    let mut seen: HashMap<CoverId, Observed> = HashMap::new();
    emit_changes(stream.current(), &mut seen, only.as_ref(), &format, color);

    if !global.quiet {
        eprintln!(
            "Watching {} cover(s) every {}s, Ctrl-C to stop",
            only.as_ref().map_or_else(|| controller.covers_snapshot().len(), |_| 1),
            controller.config().scan_interval.as_secs()
        );
    }

    loop {
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted, stopping watch");
                break;
            }
            snap = stream.changed() => {
                let Some(snap) = snap else { break };
                emit_changes(&snap, &mut seen, only.as_ref(), &format, color);
            }
        }
    }
    Ok(())
}

/// Print every cover whose observed fields differ from the last print.
fn emit_changes(
    snap: &[Arc<Cover>],
    seen: &mut HashMap<CoverId, Observed>,
    only: Option<&CoverId>,
    format: &OutputFormat,
    color: bool,
) {
    for cover in snap {
        if only.is_some_and(|id| *id != cover.id) {
            continue;
        }
        let now = Observed::from(cover.as_ref());
        if seen.get(&cover.id) == Some(&now) {
            continue;
        }
        seen.insert(cover.id.clone(), now);
        output::print_output(&render_change(cover, format, color), false);
    }
}

fn render_change(cover: &Cover, format: &OutputFormat, color: bool) -> String {
    let event = ChangeEvent {
        id: &cover.id,
        name: &cover.name,
        status: cover.status,
        position: cover.current_position_percent(),
        online: cover.online,
        updated_at: cover.updated_at.to_rfc3339(),
    };
    match format {
        OutputFormat::Table => format!(
            "{}  {:<20} {} {:>5}  {}",
            cover.updated_at.with_timezone(&Local).format("%H:%M:%S"),
            cover.name,
            output::paint_status(cover.status, 8, color),
            util::percent_label(cover),
            output::paint_online(cover.online, color),
        ),
        OutputFormat::Plain => format!(
            "{} {} {} {}",
            cover.id,
            cover.status,
            event.position.map_or_else(|| "-".into(), |p| p.to_string()),
            if cover.online { "online" } else { "offline" },
        ),
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(&event, true),
        OutputFormat::Yaml => format!("---\n{}", output::render_yaml(&event).trim_end()),
    }
}
