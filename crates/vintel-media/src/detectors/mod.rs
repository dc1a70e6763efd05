//! Signal detectors.
//!
//! Pure functions over frame and audio samples. Every detector returns an
//! empty collection for degenerate input (no frames, no motion, too few
//! segments) rather than an error.

mod beat;
mod scene;
mod silence;

pub use beat::detect_beats;
pub use scene::detect_scenes;
pub use silence::detect_silence;
