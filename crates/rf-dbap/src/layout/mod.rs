//! Speaker layouts
//!
//! A layout places every speaker of a fixed-size array once, at construction:
//! - Desktop: a stereo pair for bench testing
//! - Sphere: 60 slots on three rings of a unit sphere, for immersive venues
//!
//! Channel indices are positions in the layout's speaker array. All topology
//! queries (`move_by`, `opposite`, `next`, `reflect`) reduce their input modulo
//! the channel count and never return an index out of range.

mod groups;
mod placement;

pub use groups::ChannelGroup;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpatialError, SpatialResult};
use crate::mix::SingularityPolicy;
use crate::position::Position3D;

/// Default decay in dB (rolloff ≈ 0.708)
pub const DEFAULT_DECAY_DB: f32 = 3.0;

/// Physical speaker arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Stereo pair at (-1,0,0) and (1,0,0)
    #[default]
    Desktop,
    /// 60-channel spherical array (three rings plus reserved slots)
    Sphere,
}

impl LayoutKind {
    /// Every layout kind
    pub const ALL: [LayoutKind; 2] = [LayoutKind::Desktop, LayoutKind::Sphere];

    /// Fixed channel count for this kind
    pub const fn channel_count(self) -> usize {
        match self {
            LayoutKind::Desktop => 2,
            LayoutKind::Sphere => 60,
        }
    }

    /// Lowercase name, as accepted by `from_str`
    pub const fn name(self) -> &'static str {
        match self {
            LayoutKind::Desktop => "desktop",
            LayoutKind::Sphere => "sphere",
        }
    }

    /// Named channel groups, shared process-wide
    pub fn groups(self) -> &'static [ChannelGroup] {
        groups::groups_for(self)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "stereo" => Ok(LayoutKind::Desktop),
            "sphere" | "allosphere" | "allo" => Ok(LayoutKind::Sphere),
            _ => Err(SpatialError::UnknownLayout(s.to_string())),
        }
    }
}

/// What occupies a channel slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    /// Placed speaker taking part in panning
    Main,
    /// Unplaced slot (subwoofer or spare); sits at the origin and is never panned to
    Reserved,
}

/// Single speaker slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    /// Channel index
    pub channel: usize,
    /// Position in space
    pub position: Position3D,
    /// Slot role
    pub role: SpeakerRole,
}

impl Speaker {
    /// Create placed speaker
    pub fn new(channel: usize, position: Position3D) -> Self {
        Self {
            channel,
            position,
            role: SpeakerRole::Main,
        }
    }

    /// Create reserved slot at the origin sentinel
    pub fn reserved(channel: usize) -> Self {
        Self {
            channel,
            position: Position3D::origin(),
            role: SpeakerRole::Reserved,
        }
    }

    /// Is this a placed speaker
    #[inline]
    pub fn is_main(&self) -> bool {
        self.role == SpeakerRole::Main
    }
}

/// Convert decay in dB to the linear rolloff constant
#[inline]
pub fn rolloff_from_decay(decay_db: f32) -> f32 {
    10.0f32.powf(-decay_db / 20.0)
}

/// Fixed speaker array with rolloff and reflection table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerLayout {
    kind: LayoutKind,
    speakers: Vec<Speaker>,
    decay_db: f32,
    rolloff: f32,
    reflections: Vec<usize>,
    singularity: SingularityPolicy,
}

impl SpeakerLayout {
    /// Build the layout for `kind` with the given decay
    pub fn new(kind: LayoutKind, decay_db: f32) -> SpatialResult<Self> {
        validate_decay(decay_db)?;
        Ok(Self::build(kind, decay_db))
    }

    /// Build the layout, checking the caller's expected channel count
    pub fn with_channels(kind: LayoutKind, channels: usize, decay_db: f32) -> SpatialResult<Self> {
        let expected = kind.channel_count();
        if channels != expected {
            return Err(SpatialError::InvalidChannelCount {
                kind,
                expected,
                got: channels,
            });
        }
        Self::new(kind, decay_db)
    }

    /// Desktop stereo pair with default decay
    pub fn desktop() -> Self {
        Self::build(LayoutKind::Desktop, DEFAULT_DECAY_DB)
    }

    /// 60-channel sphere with default decay
    pub fn sphere() -> Self {
        Self::build(LayoutKind::Sphere, DEFAULT_DECAY_DB)
    }

    /// Replace the zero-distance policy used by `mix`
    pub fn with_singularity_policy(mut self, policy: SingularityPolicy) -> Self {
        self.singularity = policy;
        self
    }

    fn build(kind: LayoutKind, decay_db: f32) -> Self {
        let speakers = placement::place(kind);
        let reflections = placement::reflection_table(kind);
        debug_assert_eq!(speakers.len(), kind.channel_count());
        debug_assert_eq!(reflections.len(), kind.channel_count());

        let rolloff = rolloff_from_decay(decay_db);
        log::info!(
            "Initialized {} speaker layout ({} channels, rolloff {:.4})",
            kind,
            speakers.len(),
            rolloff
        );

        Self {
            kind,
            speakers,
            decay_db,
            rolloff,
            reflections,
            singularity: SingularityPolicy::default(),
        }
    }

    /// Re-initialize the rolloff from a new decay value
    pub fn set_decay_db(&mut self, decay_db: f32) -> SpatialResult<()> {
        validate_decay(decay_db)?;
        self.decay_db = decay_db;
        self.rolloff = rolloff_from_decay(decay_db);
        log::debug!("{} layout decay set to {} dB (rolloff {:.4})", self.kind, decay_db, self.rolloff);
        Ok(())
    }

    /// Layout kind
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Number of channels
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.speakers.len()
    }

    /// All speaker slots in channel order
    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    /// Speaker slot at `channel`
    pub fn speaker(&self, channel: usize) -> Option<&Speaker> {
        self.speakers.get(channel)
    }

    /// Position of `channel` (reserved slots report the origin)
    pub fn position(&self, channel: usize) -> Option<Position3D> {
        self.speakers.get(channel).map(|s| s.position)
    }

    /// Positions in channel order
    pub fn positions(&self) -> impl Iterator<Item = Position3D> + '_ {
        self.speakers.iter().map(|s| s.position)
    }

    /// Decay in dB
    pub fn decay_db(&self) -> f32 {
        self.decay_db
    }

    /// Linear rolloff constant
    #[inline]
    pub fn rolloff(&self) -> f32 {
        self.rolloff
    }

    /// Zero-distance policy
    pub fn singularity_policy(&self) -> SingularityPolicy {
        self.singularity
    }

    /// Reflection table in channel order
    pub fn reflections(&self) -> &[usize] {
        &self.reflections
    }

    /// Channel groups of this layout's kind
    pub fn groups(&self) -> &'static [ChannelGroup] {
        self.kind.groups()
    }

    /// Move by `n` channels (wraps in both directions)
    pub fn move_by(&self, channel: usize, n: isize) -> usize {
        let len = self.num_channels();
        let shift = n.rem_euclid(len as isize) as usize;
        (channel % len + shift) % len
    }

    /// Channel half-way around the array
    ///
    /// With an odd channel count this is the nearest channel below the true midpoint.
    pub fn opposite(&self, channel: usize) -> usize {
        self.move_by(channel, (self.num_channels() / 2) as isize)
    }

    /// Following channel
    pub fn next(&self, channel: usize) -> usize {
        self.move_by(channel, 1)
    }

    /// Mirrored channel
    pub fn reflect(&self, channel: usize) -> usize {
        self.reflections[channel % self.num_channels()]
    }
}

fn validate_decay(decay_db: f32) -> SpatialResult<()> {
    if decay_db.is_finite() {
        Ok(())
    } else {
        Err(SpatialError::InvalidDecay(decay_db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_channel_counts() {
        assert_eq!(SpeakerLayout::desktop().num_channels(), 2);
        assert_eq!(SpeakerLayout::sphere().num_channels(), 60);

        for kind in LayoutKind::ALL {
            let layout = SpeakerLayout::new(kind, DEFAULT_DECAY_DB).unwrap();
            assert_eq!(layout.num_channels(), kind.channel_count());
            assert_eq!(layout.reflections().len(), kind.channel_count());
        }
    }

    #[test]
    fn test_parse_layout_kind() {
        assert_eq!("desktop".parse::<LayoutKind>().unwrap(), LayoutKind::Desktop);
        assert_eq!(" Sphere ".parse::<LayoutKind>().unwrap(), LayoutKind::Sphere);
        assert_eq!("allosphere".parse::<LayoutKind>().unwrap(), LayoutKind::Sphere);

        let err = "octagon".parse::<LayoutKind>().unwrap_err();
        assert_eq!(err, SpatialError::UnknownLayout("octagon".into()));
    }

    #[test]
    fn test_channel_count_mismatch() {
        let err = SpeakerLayout::with_channels(LayoutKind::Sphere, 8, 3.0).unwrap_err();
        assert_eq!(
            err,
            SpatialError::InvalidChannelCount {
                kind: LayoutKind::Sphere,
                expected: 60,
                got: 8,
            }
        );
        assert!(SpeakerLayout::with_channels(LayoutKind::Desktop, 2, 3.0).is_ok());
    }

    #[test]
    fn test_invalid_decay() {
        assert!(matches!(
            SpeakerLayout::new(LayoutKind::Desktop, f32::NAN),
            Err(SpatialError::InvalidDecay(_))
        ));

        let mut layout = SpeakerLayout::desktop();
        assert!(layout.set_decay_db(f32::INFINITY).is_err());
        assert_eq!(layout.decay_db(), DEFAULT_DECAY_DB);
    }

    #[test]
    fn test_rolloff() {
        assert_relative_eq!(rolloff_from_decay(0.0), 1.0);
        assert_relative_eq!(rolloff_from_decay(20.0), 0.1, epsilon = 1e-6);
        assert_relative_eq!(SpeakerLayout::desktop().rolloff(), 0.707_946, epsilon = 1e-5);

        let mut layout = SpeakerLayout::desktop();
        layout.set_decay_db(6.0).unwrap();
        assert_relative_eq!(layout.rolloff(), 0.501_187, epsilon = 1e-5);
    }

    #[test]
    fn test_move_wraps() {
        let layout = SpeakerLayout::sphere();
        assert_eq!(layout.move_by(59, 1), 0);
        assert_eq!(layout.move_by(0, -1), 59);
        assert_eq!(layout.move_by(10, 60), 10);
        assert_eq!(layout.move_by(10, -125), 5);
        assert_eq!(layout.move_by(70, 0), 10);
    }

    #[test]
    fn test_topology_queries() {
        let layout = SpeakerLayout::sphere();
        assert_eq!(layout.opposite(0), 30);
        assert_eq!(layout.opposite(45), 15);
        assert_eq!(layout.next(7), 8);
        assert_eq!(layout.next(59), 0);

        let desktop = SpeakerLayout::desktop();
        assert_eq!(desktop.opposite(0), 1);
        assert_eq!(desktop.next(1), 0);
        assert_eq!(desktop.reflect(0), 1);
        assert_eq!(desktop.reflect(1), 0);
    }

    #[test]
    fn test_reserved_slots() {
        let layout = SpeakerLayout::sphere();
        for ch in (12..16).chain(46..48) {
            let speaker = layout.speaker(ch).unwrap();
            assert_eq!(speaker.role, SpeakerRole::Reserved);
            assert_eq!(speaker.position, Position3D::origin());
        }
        assert!(layout.speaker(60).is_none());
        assert!(layout.position(60).is_none());
    }
}
