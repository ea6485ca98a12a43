// ── Poll result application ──
//
// Applies cloud overviews and local device readings into the CoverStore.
// Cloud data replaces the cloud covers wholesale; local readings update
// one cover at a time.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::CoverStore;
use crate::convert::{CloudObservation, CloudReading, LocalObservation};
use crate::model::{Cover, CoverBackend, CoverId};

impl CoverStore {
    /// Apply a successful `slides/overview` response.
    ///
    /// Covers are created on first sight. Known cloud covers missing from
    /// the overview are marked offline.
    pub(crate) fn apply_cloud_overview(
        &self,
        observations: Vec<CloudObservation>,
        invert_position: bool,
        offset: f64,
    ) {
        let mut seen = HashSet::with_capacity(observations.len());

        for obs in observations {
            seen.insert(obs.id.clone());
            let backend = CoverBackend::Cloud {
                slide_id: obs.slide_id,
            };
            let name = obs.name;
            let reading = obs.reading;

            self.upsert_with(
                &obs.id,
                backend.clone(),
                || {
                    Cover::new(obs.id.clone(), name.clone(), backend.clone())
                        .with_invert_position(invert_position)
                        .with_offset(offset)
                },
                |cover| {
                    cover.name.clone_from(&name);
                    match &reading {
                        CloudReading::Position(pos) => cover.observe(*pos),
                        CloudReading::Offline { code } => {
                            warn!(id = %cover.id, name = %cover.name, code = %code, "slide is offline");
                            cover.set_online(false);
                        }
                        CloudReading::Invalid => {
                            error!(id = %cover.id, name = %cover.name, "slide has invalid device_info");
                            cover.set_online(false);
                        }
                    }
                },
            );
        }

        for cover in self.covers_snapshot().iter() {
            if !cover.is_local() && cover.online && !seen.contains(&cover.id) {
                warn!(id = %cover.id, name = %cover.name, "slide missing from cloud overview");
                self.mark_offline(&cover.id);
            }
        }
    }

    /// Mark every cloud cover offline after a failed overview request.
    pub(crate) fn mark_cloud_offline(&self) {
        for cover in self.covers_snapshot().iter() {
            if !cover.is_local() && cover.online {
                self.mark_offline(&cover.id);
            }
        }
    }

    /// Apply a `Slide.GetInfo` reply from `host`.
    ///
    /// The cover is identified by the reported `slide_id`, falling back to
    /// the cover already registered for `host`. Returns `None` when neither
    /// is available. A reply without `pos` marks the cover offline.
    pub(crate) fn apply_local_info(
        &self,
        host: &str,
        obs: LocalObservation,
        invert_position: bool,
        offset: f64,
    ) -> Option<Arc<Cover>> {
        let backend = CoverBackend::Local {
            host: host.to_owned(),
        };
        let existing = self.cover_by_backend(&backend);

        let id = match (obs.id, existing.as_ref()) {
            (Some(id), Some(prev)) if id != prev.id => {
                warn!(host, old = %prev.id, new = %id, "device at host changed identity");
                self.remove(&prev.id);
                id
            }
            (Some(id), _) => id,
            (None, Some(prev)) => prev.id.clone(),
            (None, None) => return None,
        };

        let updated = self.upsert_with(
            &id,
            backend,
            || {
                Cover::new(id.clone(), host, CoverBackend::Local {
                    host: host.to_owned(),
                })
                .with_invert_position(invert_position)
                .with_offset(offset)
            },
            |cover| {
                cover.device = Some(obs.device);
                if obs.touch_go.is_some() {
                    cover.touch_go = obs.touch_go;
                }
                match obs.position {
                    Some(pos) => cover.observe(pos),
                    None => {
                        error!(host, id = %cover.id, "slide returned info without a position");
                        cover.set_online(false);
                    }
                }
            },
        );
        Some(updated)
    }

    /// Update the cover with `id`, creating it with `make` first if needed.
    ///
    /// An existing cover whose backend address changed is re-inserted so
    /// the alias index follows it.
    fn upsert_with(
        &self,
        id: &CoverId,
        backend: CoverBackend,
        make: impl FnOnce() -> Cover,
        apply: impl FnOnce(&mut Cover),
    ) -> Arc<Cover> {
        if let Some(existing) = self.cover(id) {
            if existing.backend == backend {
                return self.update(id, apply).unwrap_or(existing);
            }
        }

        let mut cover = self.cover(id).map_or_else(make, |c| Cover::clone(&c));
        cover.backend = backend;
        apply(&mut cover);
        debug!(id = %cover.id, backend = %cover.backend.alias(), "storing cover");
        self.insert(cover.clone());
        Arc::new(cover)
    }
}
