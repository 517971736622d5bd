//! Channel widths from the architecture's distribution profiles.
//!
//! The outermost channel on each axis (index 0 and the last index) borders
//! the I/O ring and gets `chan_width_io`. Interior channels sample their
//! axis's [`ChannelDistribution`] at evenly spaced positions in `[0, 1]`.
//! Every channel gets at least one track.

use crate::layout::GridLayout;
use kiln_arch::ChannelDistribution;

/// Relative width of `dist` at normalized position `x`.
///
/// `separation` is the normalized distance between neighbouring channels;
/// a delta profile is wide only at the channel nearest `xpeak`.
pub fn relative_width(dist: &ChannelDistribution, x: f64, separation: f64) -> f64 {
    match *dist {
        ChannelDistribution::Uniform { peak } => peak,
        ChannelDistribution::Gaussian {
            peak,
            width,
            xpeak,
            dc,
        } => {
            let d = x - xpeak;
            peak * (-(d * d) / (2.0 * width * width)).exp() + dc
        }
        ChannelDistribution::Pulse {
            peak,
            width,
            xpeak,
            dc,
        } => {
            let on = (x - xpeak).abs() <= width / 2.0;
            (if on { peak } else { 0.0 }) + dc
        }
        ChannelDistribution::Delta { peak, xpeak, dc } => {
            let d = x - xpeak;
            let on = d > -separation / 2.0 && d <= separation / 2.0;
            (if on { peak } else { 0.0 }) + dc
        }
    }
}

/// Scales a relative width to whole tracks, rounding half up, minimum 1.
fn tracks(cfactor: u32, relative: f64) -> u32 {
    // Saturating cast: NaN and negatives become 0.
    let n = (f64::from(cfactor) * relative + 0.5).floor() as u32;
    n.max(1)
}

fn fill_axis(widths: &mut [u32], cfactor: u32, dist: &ChannelDistribution, io: u32) {
    let n = widths.len() - 1;
    widths[0] = io;
    widths[n] = io;
    match n {
        0 | 1 => {}
        // A lone interior channel sits at x = 0 and owns the whole axis.
        2 => widths[1] = tracks(cfactor, relative_width(dist, 0.0, 2.0)),
        _ => {
            let spacing = n as f64 - 2.0;
            let separation = 1.0 / spacing;
            for (i, slot) in widths.iter_mut().enumerate().take(n).skip(1) {
                let x = (i - 1) as f64 / spacing;
                *slot = tracks(cfactor, relative_width(dist, x, separation));
            }
        }
    }
}

impl GridLayout {
    /// Fills both channel-width arrays for a peak width of `cfactor` tracks.
    pub fn fill_channel_widths(
        &mut self,
        cfactor: u32,
        chan_x: &ChannelDistribution,
        chan_y: &ChannelDistribution,
        chan_width_io: f64,
    ) {
        let io = tracks(cfactor, chan_width_io);
        fill_axis(&mut self.chan_width_x, cfactor, chan_x, io);
        fill_axis(&mut self.chan_width_y, cfactor, chan_y, io);
        log::debug!(
            "channel widths x={:?} y={:?}",
            self.chan_width_x,
            self.chan_width_y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIFORM: ChannelDistribution = ChannelDistribution::Uniform { peak: 1.0 };

    #[test]
    fn uniform_fills_every_channel() {
        let mut grid = GridLayout::new(4, 3, 2);
        grid.fill_channel_widths(12, &UNIFORM, &UNIFORM, 1.0);
        assert_eq!(grid.chan_width_x(), &[12, 12, 12, 12]);
        assert_eq!(grid.chan_width_y(), &[12; 5]);
    }

    #[test]
    fn io_channels_use_io_width() {
        let mut grid = GridLayout::new(3, 3, 2);
        let half = ChannelDistribution::Uniform { peak: 0.5 };
        grid.fill_channel_widths(10, &half, &half, 0.25);
        // 2.5 rounds half up to 3
        assert_eq!(grid.chan_width_x(), &[3, 5, 5, 3]);
    }

    #[test]
    fn minimum_one_track() {
        let mut grid = GridLayout::new(2, 2, 1);
        let tiny = ChannelDistribution::Uniform { peak: 0.01 };
        grid.fill_channel_widths(4, &tiny, &tiny, 0.01);
        assert!(grid.chan_width_x().iter().all(|w| *w == 1));
    }

    #[test]
    fn delta_widens_one_channel() {
        // 6 rows: interior channels 1..=5 sampled at 0, .25, .5, .75, 1
        let mut grid = GridLayout::new(1, 6, 1);
        let delta = ChannelDistribution::Delta {
            peak: 1.0,
            xpeak: 0.5,
            dc: 0.5,
        };
        grid.fill_channel_widths(10, &delta, &UNIFORM, 1.0);
        assert_eq!(grid.chan_width_x(), &[10, 5, 5, 15, 5, 5, 10]);
    }

    #[test]
    fn pulse_plateau() {
        let pulse = ChannelDistribution::Pulse {
            peak: 1.0,
            width: 0.5,
            xpeak: 0.5,
            dc: 0.0,
        };
        assert_eq!(relative_width(&pulse, 0.5, 0.1), 1.0);
        assert_eq!(relative_width(&pulse, 0.75, 0.1), 1.0);
        assert_eq!(relative_width(&pulse, 0.8, 0.1), 0.0);
    }

    #[test]
    fn gaussian_peaks_at_xpeak() {
        let gauss = ChannelDistribution::Gaussian {
            peak: 1.0,
            width: 0.2,
            xpeak: 0.5,
            dc: 0.1,
        };
        assert!((relative_width(&gauss, 0.5, 0.1) - 1.1).abs() < 1e-12);
        assert!(relative_width(&gauss, 0.0, 0.1) < 0.2);
    }

    #[test]
    fn lone_interior_channel_takes_delta_peak() {
        let mut grid = GridLayout::new(2, 2, 1);
        let delta = ChannelDistribution::Delta {
            peak: 1.0,
            xpeak: 0.5,
            dc: 0.5,
        };
        grid.fill_channel_widths(10, &delta, &delta, 1.0);
        assert_eq!(grid.chan_width_x(), &[10, 15, 10]);
        assert_eq!(grid.chan_width_y(), &[10, 15, 10]);
    }

    #[test]
    fn lone_interior_channel_samples_axis_start() {
        let mut grid = GridLayout::new(2, 2, 1);
        let pulse = ChannelDistribution::Pulse {
            peak: 1.0,
            width: 0.2,
            xpeak: 0.9,
            dc: 0.25,
        };
        grid.fill_channel_widths(8, &pulse, &UNIFORM, 1.0);
        // x = 0 lies outside the plateau, leaving only dc.
        assert_eq!(grid.chan_width_x(), &[8, 2, 8]);
        assert_eq!(grid.chan_width_y(), &[8, 8, 8]);
    }

    #[test]
    fn single_row_has_only_io_channels() {
        let mut grid = GridLayout::new(1, 1, 1);
        grid.fill_channel_widths(8, &UNIFORM, &UNIFORM, 0.5);
        assert_eq!(grid.chan_width_x(), &[4, 4]);
    }
}
