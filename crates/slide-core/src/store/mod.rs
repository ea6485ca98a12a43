// ── Reactive cover store ──
//
// Lock-free cover storage with push-based change notification.

mod collection;
mod cover_store;
mod refresh;

pub use cover_store::CoverStore;
