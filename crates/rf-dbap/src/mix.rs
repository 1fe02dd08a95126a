//! Distance-based amplitude panning (DBAP)
//!
//! Each placed speaker gets a gain proportional to its inverse distance from the
//! source. Gains are normalized so the sum of their squares equals `rolloff²`:
//!
//! ```text
//! gain_i = rolloff · (1 / d_i) / sqrt(Σ 1 / d_j²)
//! ```
//!
//! Reserved slots always receive zero and stay out of the normalization.

use serde::{Deserialize, Serialize};

use crate::error::{SpatialError, SpatialResult};
use crate::layout::SpeakerLayout;
use crate::position::Position3D;

/// Squared distance at or below which a source sits on a speaker
pub const COINCIDENT_DISTANCE_SQ: f32 = 1e-12;

/// What to do when the source coincides with a speaker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SingularityPolicy {
    /// Coincident speakers share `rolloff` by equal power, all others are silent
    #[default]
    Snap,
    /// Distances shorter than `min_distance` are treated as `min_distance`
    Clamp { min_distance: f32 },
}

impl SingularityPolicy {
    fn floor_sq(self) -> f32 {
        match self {
            SingularityPolicy::Snap => 0.0,
            SingularityPolicy::Clamp { min_distance } => {
                let d = min_distance.abs();
                if d.is_finite() { d * d } else { 0.0 }
            }
        }
    }
}

impl SpeakerLayout {
    /// Compute DBAP gains for a source, one per channel
    pub fn mix(&self, source: Position3D) -> Vec<f32> {
        let mut gains = vec![0.0; self.num_channels()];
        self.fill_gains(source, &mut gains);
        gains
    }

    /// Compute DBAP gains into a caller buffer without allocating
    pub fn mix_into(&self, source: Position3D, gains: &mut [f32]) -> SpatialResult<()> {
        if gains.len() != self.num_channels() {
            return Err(SpatialError::BufferSizeMismatch {
                expected: self.num_channels(),
                got: gains.len(),
            });
        }
        self.fill_gains(source, gains);
        Ok(())
    }

    /// `gains` must hold exactly one slot per channel
    pub(crate) fn fill_gains(&self, source: Position3D, gains: &mut [f32]) {
        gains.fill(0.0);

        if !source.is_finite() {
            log::warn!("Non-finite source position {:?}, muting", source);
            return;
        }

        let floor_sq = self.singularity_policy().floor_sq();
        let rolloff = self.rolloff();
        let squared_distance = |position: Position3D| position.distance_squared_to(&source).max(floor_sq);

        let mut sum = 0.0f32;
        let mut coincident = 0usize;

        for (gain, speaker) in gains.iter_mut().zip(self.speakers()) {
            if !speaker.is_main() {
                continue;
            }

            let mag = squared_distance(speaker.position);
            if mag <= COINCIDENT_DISTANCE_SQ {
                coincident += 1;
                continue;
            }

            sum += 1.0 / mag;
            *gain = 1.0 / mag.sqrt();
        }

        if coincident > 0 {
            let share = rolloff / (coincident as f32).sqrt();
            for (gain, speaker) in gains.iter_mut().zip(self.speakers()) {
                let on_speaker =
                    speaker.is_main() && squared_distance(speaker.position) <= COINCIDENT_DISTANCE_SQ;
                *gain = if on_speaker { share } else { 0.0 };
            }
            return;
        }

        // Beyond f32 range every inverse term underflows
        if !(sum > 0.0 && sum.is_finite()) {
            gains.fill(0.0);
            return;
        }

        let k = rolloff / sum.sqrt();
        for gain in gains.iter_mut() {
            *gain *= k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_desktop_center_is_balanced() {
        let layout = SpeakerLayout::desktop();
        let gains = layout.mix(Position3D::origin());

        assert_eq!(gains.len(), 2);
        assert_relative_eq!(gains[0], gains[1]);
        assert_relative_eq!(gains[0], layout.rolloff() / 2.0f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_energy_matches_rolloff() {
        let layout = SpeakerLayout::sphere();
        let gains = layout.mix(Position3D::new(0.3, 0.2, -0.4));

        let energy: f32 = gains.iter().map(|g| g * g).sum();
        assert_relative_eq!(energy, layout.rolloff() * layout.rolloff(), epsilon = 1e-5);
    }

    #[test]
    fn test_nearest_speaker_dominates() {
        let layout = SpeakerLayout::sphere();
        let target = layout.position(20).unwrap() * 0.9;
        let gains = layout.mix(target);

        let loudest = gains
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(ch, _)| ch);
        assert_eq!(loudest, Some(20));
    }

    #[test]
    fn test_reserved_slots_are_silent() {
        let layout = SpeakerLayout::sphere();

        // Origin coincides with the reserved sentinel but not with any speaker
        let gains = layout.mix(Position3D::origin());
        for ch in (12..16).chain(46..48) {
            assert_eq!(gains[ch], 0.0);
        }
        assert!(gains.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn test_snap_on_speaker() {
        let layout = SpeakerLayout::desktop();
        let gains = layout.mix(Position3D::new(-1.0, 0.0, 0.0));

        assert_eq!(gains, vec![layout.rolloff(), 0.0]);
    }

    #[test]
    fn test_snap_is_limit_of_approach() {
        let layout = SpeakerLayout::desktop();
        let near = layout.mix(Position3D::new(-1.0 + 1e-4, 0.0, 0.0));

        assert_relative_eq!(near[0], layout.rolloff(), epsilon = 1e-4);
        assert!(near[1] < 1e-3);
    }

    #[test]
    fn test_clamp_policy() {
        let layout = SpeakerLayout::desktop()
            .with_singularity_policy(SingularityPolicy::Clamp { min_distance: 0.5 });
        let gains = layout.mix(Position3D::new(-1.0, 0.0, 0.0));

        // d0 clamped to 0.5, d1 = 2
        let r = layout.rolloff();
        let k = r / (4.0f32 + 0.25).sqrt();
        assert_relative_eq!(gains[0], 2.0 * k, epsilon = 1e-6);
        assert_relative_eq!(gains[1], 0.5 * k, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_source_is_muted() {
        let layout = SpeakerLayout::desktop();
        let gains = layout.mix(Position3D::new(f32::NAN, 0.0, 0.0));
        assert_eq!(gains, vec![0.0, 0.0]);
    }

    #[test]
    fn test_mix_into() {
        let layout = SpeakerLayout::new(LayoutKind::Sphere, 6.0).unwrap();
        let source = Position3D::new(0.1, 0.5, 0.2);

        let mut buffer = vec![1.0; 60];
        layout.mix_into(source, &mut buffer).unwrap();
        assert_eq!(buffer, layout.mix(source));

        let mut short = vec![0.0; 12];
        assert_eq!(
            layout.mix_into(source, &mut short),
            Err(SpatialError::BufferSizeMismatch {
                expected: 60,
                got: 12
            })
        );
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&SingularityPolicy::Clamp { min_distance: 0.1 }).unwrap();
        assert_eq!(json, r#"{"mode":"clamp","min_distance":0.1}"#);

        let snap: SingularityPolicy = serde_json::from_str(r#"{"mode":"snap"}"#).unwrap();
        assert_eq!(snap, SingularityPolicy::Snap);
    }
}
