//! Terminal rendering.
//!
//! Pure projection of engine state: these functions read the latest
//! snapshot, the ring histories and the session status, and never
//! mutate anything.

pub mod common;
pub mod disks;
pub mod overview;
pub mod processes;
pub mod theme;

pub use theme::Theme;
