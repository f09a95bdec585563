//! レア度ポイント → コピー枚数テーブル
//!
//! パック開封の3段階（tier 1..=3）それぞれで何枚配布されるかを、
//! ポイント帯ごとの固定テーブルで決める。ポイントが高いほど枚数は少ない。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 段階の数
pub const TIER_COUNT: usize = 3;

/// 段階ごとの枚数 `[tier1, tier2, tier3]`
pub type TierCounts = [u32; TIER_COUNT];

/// ポイント帯（下限を含み、上限を含まない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointBand {
    pub lower: i64,
    pub upper: i64,
    pub counts: TierCounts,
}

impl PointBand {
    pub fn contains(&self, point: i64) -> bool {
        self.lower <= point && point < self.upper
    }
}

/// 帯テーブル（昇順・互いに素）
pub const POINT_BANDS: &[PointBand] = &[
    PointBand { lower: 1, upper: 12, counts: [5, 8, 15] },
    PointBand { lower: 12, upper: 23, counts: [5, 7, 13] },
    PointBand { lower: 23, upper: 34, counts: [4, 6, 11] },
    PointBand { lower: 34, upper: 45, counts: [3, 5, 9] },
    PointBand { lower: 45, upper: 56, counts: [2, 4, 7] },
    PointBand { lower: 56, upper: 67, counts: [2, 3, 5] },
    PointBand { lower: 67, upper: 100, counts: [1, 2, 3] },
];

/// ポイントに対応する帯を線形探索で返す。範囲外は None
pub fn band_for(point: i64) -> Option<&'static PointBand> {
    POINT_BANDS.iter().find(|band| band.contains(point))
}

/// 段階ごとの枚数と累積境界
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyTier {
    /// `{1:a, 2:b, 3:c}`
    pub interval: BTreeMap<u8, u32>,
    /// `{0:0, 1:a, 2:a+b, 3:a+b+c}`
    pub cumulated: BTreeMap<u8, u32>,
}

impl CopyTier {
    /// ポイントから段階情報を作る。帯に入らないポイントは None
    pub fn for_point(point: i64) -> Option<CopyTier> {
        band_for(point).map(|band| Self::from_counts(band.counts))
    }

    pub fn from_counts(counts: TierCounts) -> CopyTier {
        let interval = (1u8..)
            .zip(counts)
            .collect::<BTreeMap<u8, u32>>();
        CopyTier {
            cumulated: cumulate(&interval),
            interval,
        }
    }

    /// 全段階の合計枚数（抽選範囲 `[0, total)` の上限）
    pub fn total(&self) -> u32 {
        self.cumulated.values().last().copied().unwrap_or(0)
    }
}

/// 段階ごとの枚数から累積境界を作る。tier 0 は常に 0
pub fn cumulate(interval: &BTreeMap<u8, u32>) -> BTreeMap<u8, u32> {
    let mut cumulated = BTreeMap::new();
    cumulated.insert(0, 0);

    let mut running = 0;
    for (&tier, &count) in interval {
        running += count;
        cumulated.insert(tier, running);
    }

    cumulated
}
