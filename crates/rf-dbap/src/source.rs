//! Point source with cached speaker gains

use std::fmt;
use std::sync::Arc;

use crate::error::{SpatialError, SpatialResult};
use crate::layout::SpeakerLayout;
use crate::position::Position3D;

/// Audio source in 3D space
///
/// Gains are recomputed whenever the position changes.
#[derive(Debug, Clone)]
pub struct AudioSource {
    layout: Arc<SpeakerLayout>,
    position: Position3D,
    gains: Vec<f32>,
}

impl AudioSource {
    /// Create source at the origin
    pub fn new(layout: Arc<SpeakerLayout>) -> Self {
        Self::at(layout, Position3D::origin())
    }

    /// Create source at `position`
    pub fn at(layout: Arc<SpeakerLayout>, position: Position3D) -> Self {
        let gains = layout.mix(position);
        Self {
            layout,
            position,
            gains,
        }
    }

    /// Move the source and recompute gains
    pub fn set_position(&mut self, position: Position3D) {
        self.position = position;
        self.layout.fill_gains(position, &mut self.gains);
    }

    /// Current position
    pub fn position(&self) -> Position3D {
        self.position
    }

    /// Layout the source pans over
    pub fn layout(&self) -> &Arc<SpeakerLayout> {
        &self.layout
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.gains.len()
    }

    /// Gains in channel order
    pub fn gains(&self) -> &[f32] {
        &self.gains
    }

    /// Gain of `channel`, zero when out of range
    pub fn gain(&self, channel: usize) -> f32 {
        self.gains.get(channel).copied().unwrap_or(0.0)
    }

    /// Add a mono block into per-channel buffers, scaled by the channel gains
    ///
    /// Samples beyond the shorter of `mono` and a channel buffer are left untouched.
    pub fn render(&self, mono: &[f32], outputs: &mut [Vec<f32>]) -> SpatialResult<()> {
        if outputs.len() != self.gains.len() {
            return Err(SpatialError::BufferSizeMismatch {
                expected: self.gains.len(),
                got: outputs.len(),
            });
        }

        for (output, &gain) in outputs.iter_mut().zip(&self.gains) {
            if gain == 0.0 {
                continue;
            }
            for (out, &sample) in output.iter_mut().zip(mono) {
                *out += sample * gain;
            }
        }

        Ok(())
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (channel, gain) in self.gains.iter().enumerate() {
            writeln!(f, "mix at: {} is {}", channel, gain)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_source_tracks_position() {
        let layout = Arc::new(SpeakerLayout::desktop());
        let mut source = AudioSource::new(layout.clone());
        assert_relative_eq!(source.gain(0), source.gain(1));

        source.set_position(Position3D::new(0.5, 0.0, 0.0));
        assert!(source.gain(1) > source.gain(0));
        assert_eq!(source.gains(), layout.mix(Position3D::new(0.5, 0.0, 0.0)).as_slice());
        assert_eq!(source.gain(5), 0.0);
    }

    #[test]
    fn test_render_accumulates() {
        let layout = Arc::new(SpeakerLayout::desktop());
        let source = AudioSource::at(layout, Position3D::new(-0.5, 0.0, 0.0));

        let mono = [1.0, 0.5, -1.0];
        let mut outputs = vec![vec![0.0; 3], vec![0.0; 3]];
        source.render(&mono, &mut outputs).unwrap();
        source.render(&mono, &mut outputs).unwrap();

        for (ch, output) in outputs.iter().enumerate() {
            for (s, &value) in output.iter().enumerate() {
                assert_relative_eq!(value, 2.0 * mono[s] * source.gain(ch), epsilon = 1e-6);
            }
        }

        let mut wrong = vec![vec![0.0; 3]];
        assert!(source.render(&mono, &mut wrong).is_err());
    }

    #[test]
    fn test_display() {
        let source = AudioSource::new(Arc::new(SpeakerLayout::desktop()));
        let text = source.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("mix at: 0 is "));
    }
}
