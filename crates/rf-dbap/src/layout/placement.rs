//! Per-kind speaker placement and reflection tables

use std::f32::consts::{FRAC_PI_8, PI};
use std::ops::Range;

use super::{LayoutKind, Speaker};
use crate::position::{Position3D, axis_angle};

/// Reference direction every sphere ring starts from
const REFERENCE: Position3D = Position3D::new(-1.0, 0.0, 0.0);
/// Axis the ring tilt rotates about
const TILT_AXIS: Position3D = Position3D::new(0.0, 0.0, -1.0);
/// Vertical axis the rings spin around
const VERTICAL: Position3D = Position3D::new(0.0, 1.0, 0.0);

/// Horizontal ring of speakers on the unit sphere
#[derive(Debug, Clone)]
pub(crate) struct Ring {
    pub name: &'static str,
    /// Channel slots occupied by the ring
    pub channels: Range<usize>,
    /// Elevation of the ring, radians (positive = up)
    pub tilt: f32,
    /// Speaker `j` sits at azimuth `π · j / divisions`
    pub divisions: f32,
}

impl Ring {
    fn positions(&self) -> impl Iterator<Item = (usize, Position3D)> + '_ {
        let tilted = REFERENCE.spin(&axis_angle(self.tilt, TILT_AXIS));
        self.channels.clone().enumerate().map(move |(j, channel)| {
            let azimuth = PI * (j as f32 / self.divisions);
            (channel, tilted.spin(&axis_angle(azimuth, VERTICAL)))
        })
    }
}

pub(crate) const SPHERE_RINGS: [Ring; 3] = [
    Ring {
        name: "top",
        channels: 0..12,
        tilt: FRAC_PI_8,
        divisions: 12.0,
    },
    Ring {
        name: "middle",
        channels: 16..46,
        tilt: 0.0,
        divisions: 20.0,
    },
    Ring {
        name: "bottom",
        channels: 48..60,
        tilt: -FRAC_PI_8,
        divisions: 12.0,
    },
];

/// Slots the sphere never places (47 is the subwoofer)
pub(crate) const SPHERE_RESERVED: [Range<usize>; 2] = [12..16, 46..48];

pub(crate) fn place(kind: LayoutKind) -> Vec<Speaker> {
    match kind {
        LayoutKind::Desktop => place_desktop(),
        LayoutKind::Sphere => place_sphere(),
    }
}

fn place_desktop() -> Vec<Speaker> {
    vec![
        Speaker::new(0, Position3D::new(-1.0, 0.0, 0.0)),
        Speaker::new(1, Position3D::new(1.0, 0.0, 0.0)),
    ]
}

fn place_sphere() -> Vec<Speaker> {
    let mut speakers: Vec<Speaker> = (0..LayoutKind::Sphere.channel_count())
        .map(Speaker::reserved)
        .collect();

    for ring in &SPHERE_RINGS {
        for (channel, position) in ring.positions() {
            speakers[channel] = Speaker::new(channel, position);
        }
    }

    speakers
}

/// Channel blocks that mirror onto themselves
fn mirror_blocks(kind: LayoutKind) -> Vec<Range<usize>> {
    match kind {
        LayoutKind::Desktop => vec![0..2],
        LayoutKind::Sphere => SPHERE_RINGS
            .iter()
            .map(|ring| ring.channels.clone())
            .chain(SPHERE_RESERVED.iter().cloned())
            .collect(),
    }
}

/// Reverse each block: a ring's arc is mirrored across the vertical plane that
/// bisects it, and the desktop pair swaps left and right.
pub(crate) fn reflection_table(kind: LayoutKind) -> Vec<usize> {
    let mut table: Vec<usize> = (0..kind.channel_count()).collect();
    for block in mirror_blocks(kind) {
        for channel in block.clone() {
            table[channel] = block.start + block.end - 1 - channel;
        }
    }
    table
}
