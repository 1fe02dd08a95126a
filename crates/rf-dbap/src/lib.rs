//! ReelForge DBAP Speaker-Array Panning
//!
//! Distance-based amplitude panning of a point source over a fixed speaker array:
//!
//! ## Layouts
//! - Desktop stereo pair for bench testing
//! - 60-channel sphere: top, middle and bottom rings plus reserved slots
//! - Rolloff constant from a decay in dB
//! - Channel topology: move, opposite, next, reflect
//! - Named channel groups per layout
//!
//! ## Panning
//! - Inverse-distance gains normalized to the rolloff
//! - Explicit policy when the source sits on a speaker
//! - Allocation-free variant for control-rate updates on the audio thread
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rf_dbap::{LayoutKind, Position3D, SpeakerLayout};
//!
//! let layout = SpeakerLayout::new(LayoutKind::Sphere, 3.0)?;
//! let gains = layout.mix(Position3D::new(0.2, 0.4, -0.6));
//! assert_eq!(gains.len(), layout.num_channels());
//! ```

pub mod config;
pub mod layout;
pub mod mix;

mod error;
mod position;
mod source;

pub use config::DbapConfig;
pub use error::{SpatialError, SpatialResult};
pub use layout::{
    ChannelGroup, DEFAULT_DECAY_DB, LayoutKind, Speaker, SpeakerLayout, SpeakerRole,
    rolloff_from_decay,
};
pub use mix::{COINCIDENT_DISTANCE_SQ, SingularityPolicy};
pub use position::{Position3D, axis_angle};
pub use source::AudioSource;
