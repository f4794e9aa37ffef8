//! Contiguous channel grouping of merged harmonic responses

use std::ops::Range;

use hgm_core::{Signal, Spectrum};

use crate::error::{IdentificationError, Result};

/// Ranges that partition `channels` into `branches` equal contiguous groups.
pub fn channel_groups(channels: usize, branches: usize) -> Result<Vec<Range<usize>>> {
    if branches == 0 || channels == 0 || channels % branches != 0 {
        return Err(IdentificationError::InvalidChannelGrouping { channels, branches });
    }
    let size = channels / branches;
    Ok((0..branches).map(|b| b * size..(b + 1) * size).collect())
}

/// Split a merged signal into one kernel per branch.
///
/// With `N` channels and `B` branches, kernel `i` holds channels
/// `i·N/B .. (i+1)·N/B`.
pub fn split(merged: &Signal, branches: usize) -> Result<Vec<Signal>> {
    channel_groups(merged.num_channels(), branches)?
        .into_iter()
        .map(|range| merged.split_channels(range).map_err(IdentificationError::from))
        .collect()
}

/// Split a merged spectrum into one group per harmonic.
pub fn split_spectrum(merged: &Spectrum, branches: usize) -> Result<Vec<Spectrum>> {
    channel_groups(merged.num_channels(), branches)?
        .into_iter()
        .map(|range| merged.split_channels(range).map_err(IdentificationError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_contiguous() {
        let groups = channel_groups(6, 3).unwrap();
        assert_eq!(groups, vec![0..2, 2..4, 4..6]);
    }

    #[test]
    fn split_keeps_channel_data() {
        let channels: Vec<Vec<f64>> = (0..6).map(|c| vec![c as f64; 4]).collect();
        let merged = Signal::new(channels, 1000.0).unwrap();
        let kernels = split(&merged, 3).unwrap();
        assert_eq!(kernels.len(), 3);
        for (i, kernel) in kernels.iter().enumerate() {
            assert_eq!(kernel.num_channels(), 2);
            assert_eq!(kernel.channel(0).unwrap()[0], (2 * i) as f64);
            assert_eq!(kernel.channel(1).unwrap()[0], (2 * i + 1) as f64);
        }
    }

    #[test]
    fn rejects_uneven_grouping() {
        assert_eq!(
            channel_groups(5, 2),
            Err(IdentificationError::InvalidChannelGrouping {
                channels: 5,
                branches: 2
            })
        );
        assert!(channel_groups(4, 0).is_err());
    }
}
