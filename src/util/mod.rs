//! Shared utilities for the viewer loop.

/// Frame pacing, per-frame delta time and smoothed FPS.
pub mod frame_timing;
