//! Data model of a parsed architecture description.
//!
//! The aggregate root is [`ArchitectureDescription`]. It owns the pin-class
//! table ([`PinClass`]) and the pin table ([`PinRecord`]); pins refer back to
//! their class by [`ClassId`] only. Enumerations that appear as keywords in
//! the file implement [`Keyword`] so the scalar parsers can match them
//! generically.

use crate::ids::{ClassId, PinId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An enumeration spelled as a fixed, case-sensitive keyword in the file.
pub trait Keyword: Copy + Sized + 'static {
    /// Every variant, in canonical order.
    const ALL: &'static [Self];

    /// The keyword for this variant.
    fn keyword(self) -> &'static str;

    /// Looks up a variant by exact keyword.
    fn from_keyword(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.keyword() == text)
    }

    /// The accepted keywords joined with `|`, for error messages.
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|v| v.keyword())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// How the caller intends to route the fabric.
///
/// Detailed routing needs the Fc and switch-block fields and a uniform
/// channel-width profile; global routing does not.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum RouteMode {
    /// Coarse routing over channel capacities only.
    #[default]
    Global,
    /// Track-by-track routing through a routing-resource graph.
    Detailed,
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMode::Global => write!(f, "global"),
            RouteMode::Detailed => write!(f, "detailed"),
        }
    }
}

/// Whether a pin drives a net or receives one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PinDirection {
    /// An output pin (`outpin`).
    Driver,
    /// An input pin (`inpin`).
    Receiver,
}

impl PinDirection {
    /// The statement keyword that declares pins of this direction.
    pub fn statement(self) -> &'static str {
        match self {
            PinDirection::Driver => "outpin",
            PinDirection::Receiver => "inpin",
        }
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::Driver => write!(f, "driver"),
            PinDirection::Receiver => write!(f, "receiver"),
        }
    }
}

/// A side of the logic block a pin can reach the routing from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Side {
    /// `top`
    Top,
    /// `bottom`
    Bottom,
    /// `left`
    Left,
    /// `right`
    Right,
}

impl Side {
    fn bit(self) -> u8 {
        match self {
            Side::Top => 1 << 0,
            Side::Bottom => 1 << 1,
            Side::Left => 1 << 2,
            Side::Right => 1 << 3,
        }
    }
}

impl Keyword for Side {
    const ALL: &'static [Self] = &[Side::Top, Side::Bottom, Side::Left, Side::Right];

    fn keyword(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A set of [`Side`]s stored as a 4-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideSet(u8);

impl SideSet {
    /// The empty set.
    pub const EMPTY: SideSet = SideSet(0);

    /// Adds a side; adding a side twice is harmless.
    pub fn insert(&mut self, side: Side) {
        self.0 |= side.bit();
    }

    /// Returns `true` if `side` is in the set.
    pub fn contains(self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    /// Returns `true` if no side is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of sides in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the sides in top, bottom, left, right order.
    pub fn iter(self) -> impl Iterator<Item = Side> {
        Side::ALL.iter().copied().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Side> for SideSet {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        let mut set = SideSet::EMPTY;
        for side in iter {
            set.insert(side);
        }
        set
    }
}

impl fmt::Debug for SideSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Shape of a channel-width distribution across the fabric.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DistributionKind {
    /// Same width everywhere.
    Uniform,
    /// Bell curve around `xpeak`.
    Gaussian,
    /// Plateau of `width` around `xpeak`.
    Pulse,
    /// A single channel at `xpeak` is wider.
    Delta,
}

impl Keyword for DistributionKind {
    const ALL: &'static [Self] = &[
        DistributionKind::Uniform,
        DistributionKind::Gaussian,
        DistributionKind::Pulse,
        DistributionKind::Delta,
    ];

    fn keyword(self) -> &'static str {
        match self {
            DistributionKind::Uniform => "uniform",
            DistributionKind::Gaussian => "gaussian",
            DistributionKind::Pulse => "pulse",
            DistributionKind::Delta => "delta",
        }
    }
}

/// Relative channel widths along one axis.
///
/// `peak` is relative to the widest channel; `xpeak` is a normalized
/// position in `[0, 1]`; `dc` is a constant added everywhere.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum ChannelDistribution {
    /// `uniform peak`
    Uniform {
        /// Relative width of every channel.
        peak: f64,
    },
    /// `gaussian peak width xpeak dc`
    Gaussian {
        /// Height of the curve.
        peak: f64,
        /// Standard deviation, in normalized units.
        width: f64,
        /// Position of the maximum.
        xpeak: f64,
        /// Constant offset.
        dc: f64,
    },
    /// `pulse peak width xpeak dc`
    Pulse {
        /// Height of the plateau.
        peak: f64,
        /// Width of the plateau, in normalized units.
        width: f64,
        /// Centre of the plateau.
        xpeak: f64,
        /// Constant offset.
        dc: f64,
    },
    /// `delta peak xpeak dc`
    Delta {
        /// Extra width of the channel at `xpeak`.
        peak: f64,
        /// Position of the wide channel.
        xpeak: f64,
        /// Constant offset.
        dc: f64,
    },
}

impl ChannelDistribution {
    /// The distribution kind.
    pub fn kind(&self) -> DistributionKind {
        match self {
            ChannelDistribution::Uniform { .. } => DistributionKind::Uniform,
            ChannelDistribution::Gaussian { .. } => DistributionKind::Gaussian,
            ChannelDistribution::Pulse { .. } => DistributionKind::Pulse,
            ChannelDistribution::Delta { .. } => DistributionKind::Delta,
        }
    }

    /// The peak value, present for every kind.
    pub fn peak(&self) -> f64 {
        match *self {
            ChannelDistribution::Uniform { peak }
            | ChannelDistribution::Gaussian { peak, .. }
            | ChannelDistribution::Pulse { peak, .. }
            | ChannelDistribution::Delta { peak, .. } => peak,
        }
    }

    /// The width, for gaussian and pulse profiles.
    pub fn width(&self) -> Option<f64> {
        match *self {
            ChannelDistribution::Gaussian { width, .. } | ChannelDistribution::Pulse { width, .. } => {
                Some(width)
            }
            _ => None,
        }
    }

    /// The peak position, for every kind except uniform.
    pub fn xpeak(&self) -> Option<f64> {
        match *self {
            ChannelDistribution::Uniform { .. } => None,
            ChannelDistribution::Gaussian { xpeak, .. }
            | ChannelDistribution::Pulse { xpeak, .. }
            | ChannelDistribution::Delta { xpeak, .. } => Some(xpeak),
        }
    }

    /// The constant offset; zero for uniform profiles.
    pub fn dc(&self) -> f64 {
        match *self {
            ChannelDistribution::Uniform { .. } => 0.0,
            ChannelDistribution::Gaussian { dc, .. }
            | ChannelDistribution::Pulse { dc, .. }
            | ChannelDistribution::Delta { dc, .. } => dc,
        }
    }
}

/// How Fc values are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FcType {
    /// Fc is a number of tracks.
    Absolute,
    /// Fc is a fraction of the tracks in the channel.
    Fractional,
}

impl Keyword for FcType {
    const ALL: &'static [Self] = &[FcType::Absolute, FcType::Fractional];

    fn keyword(self) -> &'static str {
        match self {
            FcType::Absolute => "absolute",
            FcType::Fractional => "fractional",
        }
    }
}

/// Switch-block topology at channel intersections.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SwitchBlockType {
    /// Track `i` connects only to track `i` (disjoint).
    Subset,
    /// Wilton's rotational pattern.
    Wilton,
    /// Universal switch block.
    Universal,
}

impl Keyword for SwitchBlockType {
    const ALL: &'static [Self] = &[
        SwitchBlockType::Subset,
        SwitchBlockType::Wilton,
        SwitchBlockType::Universal,
    ];

    fn keyword(self) -> &'static str {
        match self {
            SwitchBlockType::Subset => "subset",
            SwitchBlockType::Wilton => "wilton",
            SwitchBlockType::Universal => "universal",
        }
    }
}

/// Parameters used only by detailed routing.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct DetailedRoutingArch {
    /// Fc for logic-block output pins.
    pub fc_output: f64,
    /// Fc for logic-block input pins.
    pub fc_input: f64,
    /// Fc for I/O pads.
    pub fc_pad: f64,
    /// Whether the Fc values are track counts or fractions.
    pub fc_type: FcType,
    /// Switch-block topology.
    pub switch_block_type: SwitchBlockType,
}

/// A set of logically equivalent pins.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PinClass {
    /// Class number from the file.
    pub id: ClassId,
    /// Direction shared by every member.
    pub direction: PinDirection,
    /// Member pins in declaration order.
    pub members: Vec<PinId>,
}

/// One physical pin of the logic block.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PinRecord {
    /// Position of the pin; matches the pin order of the netlist format.
    pub index: PinId,
    /// The class this pin belongs to.
    pub class: ClassId,
    /// Sides of the block the pin is reachable from (never empty).
    pub sides: SideSet,
}

/// A validated architecture description.
///
/// Built once by [`parse_architecture`](crate::parse_architecture) and
/// immutable afterwards.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ArchitectureDescription {
    /// I/O pads that fit in the space of one logic block.
    pub io_rat: u32,
    /// Width of the pad-to-core channels relative to the widest core channel.
    pub chan_width_io: f64,
    /// Width profile of the x-directed (horizontal) channels.
    pub chan_x: ChannelDistribution,
    /// Width profile of the y-directed (vertical) channels.
    pub chan_y: ChannelDistribution,
    /// Pin classes indexed by [`ClassId`].
    pub pin_classes: Vec<PinClass>,
    /// Pins indexed by [`PinId`].
    pub pins: Vec<PinRecord>,
    /// Maximum LUT+FF subblocks in one logic block.
    pub max_subblocks_per_block: u32,
    /// Inputs of each subblock LUT.
    pub subblock_lut_size: u32,
    /// Fc and switch-block parameters, when supplied.
    pub detailed_routing: Option<DetailedRoutingArch>,
}

impl ArchitectureDescription {
    /// Number of pin classes.
    pub fn num_classes(&self) -> usize {
        self.pin_classes.len()
    }

    /// Number of pins on each logic block.
    pub fn pins_per_block(&self) -> usize {
        self.pins.len()
    }

    /// Returns the class with the given ID.
    pub fn class(&self, id: ClassId) -> Option<&PinClass> {
        self.pin_classes.get(id.index())
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> Option<&PinRecord> {
        self.pins.get(id.index())
    }

    /// Direction of a pin, looked up through its class.
    pub fn pin_direction(&self, id: PinId) -> Option<PinDirection> {
        let pin = self.pin(id)?;
        self.class(pin.class).map(|c| c.direction)
    }

    /// Pins reachable from the given side, in index order.
    pub fn pins_on_side(&self, side: Side) -> impl Iterator<Item = PinId> + '_ {
        self.pins
            .iter()
            .filter(move |p| p.sides.contains(side))
            .map(|p| p.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_exact() {
        assert_eq!(Side::from_keyword("left"), Some(Side::Left));
        assert_eq!(Side::from_keyword("Left"), None);
        assert_eq!(FcType::from_keyword("fractional"), Some(FcType::Fractional));
        assert_eq!(
            SwitchBlockType::from_keyword("wilton"),
            Some(SwitchBlockType::Wilton)
        );
        assert_eq!(DistributionKind::from_keyword("uniformly"), None);
    }

    #[test]
    fn expected_lists_every_keyword() {
        assert_eq!(Side::expected(), "top|bottom|left|right");
        assert_eq!(DistributionKind::expected(), "uniform|gaussian|pulse|delta");
    }

    #[test]
    fn side_set_insert_is_idempotent() {
        let mut set = SideSet::EMPTY;
        assert!(set.is_empty());
        set.insert(Side::Right);
        set.insert(Side::Top);
        set.insert(Side::Right);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Side::Top, Side::Right]);
        assert!(!set.contains(Side::Bottom));
        assert_eq!(format!("{set:?}"), "{Top, Right}");
    }

    #[test]
    fn side_set_from_iter() {
        let set: SideSet = [Side::Left, Side::Bottom].into_iter().collect();
        assert!(set.contains(Side::Left) && set.contains(Side::Bottom));
    }

    #[test]
    fn distribution_accessors() {
        let uniform = ChannelDistribution::Uniform { peak: 1.0 };
        assert_eq!(uniform.kind(), DistributionKind::Uniform);
        assert_eq!(uniform.dc(), 0.0);
        assert_eq!(uniform.width(), None);
        assert_eq!(uniform.xpeak(), None);

        let delta = ChannelDistribution::Delta {
            peak: 3.0,
            xpeak: 0.5,
            dc: 0.25,
        };
        assert_eq!(delta.peak(), 3.0);
        assert_eq!(delta.width(), None);
        assert_eq!(delta.xpeak(), Some(0.5));

        let gaussian = ChannelDistribution::Gaussian {
            peak: -0.5,
            width: 0.3,
            xpeak: 0.2,
            dc: 0.1,
        };
        assert_eq!(gaussian.width(), Some(0.3));
        assert_eq!(gaussian.dc(), 0.1);
    }

    #[test]
    fn pin_lookups() {
        let arch = ArchitectureDescription {
            io_rat: 2,
            chan_width_io: 1.0,
            chan_x: ChannelDistribution::Uniform { peak: 1.0 },
            chan_y: ChannelDistribution::Uniform { peak: 1.0 },
            pin_classes: vec![
                PinClass {
                    id: ClassId::from_raw(0),
                    direction: PinDirection::Receiver,
                    members: vec![PinId::from_raw(0)],
                },
                PinClass {
                    id: ClassId::from_raw(1),
                    direction: PinDirection::Driver,
                    members: vec![PinId::from_raw(1)],
                },
            ],
            pins: vec![
                PinRecord {
                    index: PinId::from_raw(0),
                    class: ClassId::from_raw(0),
                    sides: [Side::Top, Side::Left].into_iter().collect(),
                },
                PinRecord {
                    index: PinId::from_raw(1),
                    class: ClassId::from_raw(1),
                    sides: [Side::Left].into_iter().collect(),
                },
            ],
            max_subblocks_per_block: 1,
            subblock_lut_size: 4,
            detailed_routing: None,
        };
        assert_eq!(arch.num_classes(), 2);
        assert_eq!(arch.pins_per_block(), 2);
        assert_eq!(
            arch.pin_direction(PinId::from_raw(1)),
            Some(PinDirection::Driver)
        );
        assert_eq!(arch.pin_direction(PinId::from_raw(5)), None);
        assert_eq!(arch.pins_on_side(Side::Left).count(), 2);
        assert_eq!(
            arch.pins_on_side(Side::Top).collect::<Vec<_>>(),
            vec![PinId::from_raw(0)]
        );
    }

    #[test]
    fn description_serde_roundtrip() {
        let dist = ChannelDistribution::Pulse {
            peak: 0.5,
            width: 0.25,
            xpeak: 0.5,
            dc: 0.0,
        };
        let json = serde_json::to_string(&dist).unwrap();
        let back: ChannelDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(dist, back);
    }
}
