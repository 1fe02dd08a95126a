//! Named channel groups per layout kind

use std::sync::OnceLock;

use serde::Serialize;

use super::LayoutKind;
use super::placement::{SPHERE_RESERVED, SPHERE_RINGS};

/// A named set of channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelGroup {
    /// Group name
    pub name: &'static str,
    /// Member channels, ascending
    pub channels: Vec<usize>,
}

impl ChannelGroup {
    fn new(name: &'static str, channels: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name,
            channels: channels.into_iter().collect(),
        }
    }

    /// Does the group include `channel`
    pub fn contains(&self, channel: usize) -> bool {
        self.channels.binary_search(&channel).is_ok()
    }

    /// Number of member channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True for a group without members
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Built on first use and never mutated afterwards
pub(crate) fn groups_for(kind: LayoutKind) -> &'static [ChannelGroup] {
    static DESKTOP: OnceLock<Vec<ChannelGroup>> = OnceLock::new();
    static SPHERE: OnceLock<Vec<ChannelGroup>> = OnceLock::new();

    match kind {
        LayoutKind::Desktop => DESKTOP.get_or_init(|| {
            vec![ChannelGroup::new("left", [0]), ChannelGroup::new("right", [1])]
        }),
        LayoutKind::Sphere => SPHERE.get_or_init(|| {
            let mut groups: Vec<ChannelGroup> = SPHERE_RINGS
                .iter()
                .map(|ring| ChannelGroup::new(ring.name, ring.channels.clone()))
                .collect();
            groups.push(ChannelGroup::new(
                "reserved",
                SPHERE_RESERVED.iter().cloned().flatten(),
            ));
            groups
        }),
    }
}
