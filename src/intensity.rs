//! Per-ROI intensity statistics and the column names they are stored under.
use crate::error::AggregationError;
use crate::geometry::Mask;
use crate::image::ImageF32;
use serde::Serialize;

/// Population statistics over the pixels of one ROI.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Statistics of `image` under `mask`.
///
/// Mask and image must share the same size. An empty mask is an error rather
/// than a zero result, so "no data" never reads as "zero intensity".
pub fn aggregate(mask: &Mask, image: &ImageF32) -> Result<IntensityStats, AggregationError> {
    debug_assert_eq!((mask.w, mask.h), (image.w, image.h));
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (x, y) in mask.pixels() {
        let v = image.get(x, y) as f64;
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    if count == 0 {
        return Err(AggregationError::EmptyMask);
    }
    let mean = sum / count as f64;
    let var = mask
        .pixels()
        .map(|(x, y)| {
            let d = image.get(x, y) as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count as f64;
    Ok(IntensityStats {
        count,
        sum,
        mean,
        std: var.sqrt(),
        min,
        max,
    })
}

/// ROI kinds and their storage column prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoiKind {
    Spine,
    SpineBackground,
    Segment,
    SegmentBackground,
}

impl RoiKind {
    pub const ALL: [RoiKind; 4] = [
        RoiKind::Spine,
        RoiKind::SpineBackground,
        RoiKind::Segment,
        RoiKind::SegmentBackground,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            RoiKind::Spine => "s",
            RoiKind::SpineBackground => "sb",
            RoiKind::Segment => "seg",
            RoiKind::SegmentBackground => "segb",
        }
    }
}

/// Column name/value pairs such as `sSum_ch1` or `segbMean_ch2`.
///
/// `None` statistics produce no columns; callers keep the previous values or
/// mark the row as missing.
pub fn intensity_columns(
    kind: RoiKind,
    stats: Option<&IntensityStats>,
    channel: usize,
) -> Vec<(String, f64)> {
    let Some(s) = stats else {
        return Vec::new();
    };
    let p = kind.prefix();
    [
        ("Sum", s.sum),
        ("Mean", s.mean),
        ("Std", s.std),
        ("Min", s.min),
        ("Max", s.max),
    ]
    .into_iter()
    .map(|(name, v)| (format!("{p}{name}_ch{channel}"), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_is_an_error() {
        let mask = Mask::new(3, 3);
        let img = ImageF32::new(3, 3);
        assert_eq!(aggregate(&mask, &img), Err(AggregationError::EmptyMask));
    }

    #[test]
    fn single_pixel_statistics_collapse() {
        let mut mask = Mask::new(3, 3);
        mask.set(1, 2, true);
        let mut img = ImageF32::new(3, 3);
        img.set(1, 2, 7.5);
        let s = aggregate(&mask, &img).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.min, s.max);
        assert_eq!(s.mean, s.sum);
        assert_eq!(s.min, s.sum);
        assert_eq!(s.std, 0.0);
    }

    #[test]
    fn three_by_three_block() {
        let mut mask = Mask::new(5, 5);
        let mut img = ImageF32::new(5, 5);
        let mut v = 1.0;
        for y in 1..4 {
            for x in 1..4 {
                mask.set(x, y, true);
                img.set(x, y, v);
                v += 1.0;
            }
        }
        img.set(0, 0, 100.0);
        let s = aggregate(&mask, &img).unwrap();
        assert_eq!(s.sum, 45.0);
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 9.0);
        assert!((s.std - (60.0f64 / 9.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn column_names_follow_prefix_scheme() {
        let s = IntensityStats {
            count: 1,
            sum: 1.0,
            mean: 1.0,
            std: 0.0,
            min: 1.0,
            max: 1.0,
        };
        let cols = intensity_columns(RoiKind::SegmentBackground, Some(&s), 2);
        let names: Vec<_> = cols.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            ["segbSum_ch2", "segbMean_ch2", "segbStd_ch2", "segbMin_ch2", "segbMax_ch2"]
        );
        assert!(intensity_columns(RoiKind::Spine, None, 1).is_empty());
    }
}
