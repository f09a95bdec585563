//! グループ別カタログ構築
//!
//! 全カードをグループで分割し、グループ内の一様確率とコピー段階を付与する。
//! 入力順は保持する（グループ分け以外の並べ替えはしない）。

use crate::copy_tier::CopyTier;
use crate::types::{CardDescriptor, CardRecord, GroupId, DASH, DEFAULT_IMAGE};

/// 1グループ分の出力
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCatalog {
    pub group: GroupId,
    pub cards: Vec<CardDescriptor>,
}

impl GroupCatalog {
    pub fn file_name(&self) -> String {
        self.group.file_name()
    }
}

/// 構築結果
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// 空でないグループ（処理順）
    pub groups: Vec<GroupCatalog>,
    /// レコードが1件もなかったグループ
    pub empty_groups: Vec<GroupId>,
    /// ポイントが帯の範囲外だったカードID
    pub out_of_range_points: Vec<u32>,
}

impl Catalog {
    pub fn card_count(&self) -> usize {
        self.groups.iter().map(|g| g.cards.len()).sum()
    }

    pub fn group(&self, group: GroupId) -> Option<&GroupCatalog> {
        self.groups.iter().find(|g| g.group == group)
    }
}

/// カード1枚分の記述子を作る
pub fn describe(record: &CardRecord, group_count: usize) -> CardDescriptor {
    CardDescriptor {
        id: record.id,
        names: record.localized_names(),
        point: record.point,
        group: record.group,
        individual_probability: 1.0 / group_count as f64,
        group_count,
        image: record.image.clone().unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        acquired_from: record.acquired_from.clone().unwrap_or_else(|| DASH.to_string()),
        copy: record.point.and_then(CopyTier::for_point),
    }
}

/// 全グループのカタログを構築
pub fn build_catalog(records: &[CardRecord]) -> Catalog {
    let mut catalog = Catalog::default();

    for group in GroupId::all() {
        let members: Vec<&CardRecord> = records.iter().filter(|r| r.group == group).collect();
        if members.is_empty() {
            catalog.empty_groups.push(group);
            continue;
        }

        let group_count = members.len();
        let cards = members
            .into_iter()
            .map(|record| describe(record, group_count))
            .collect();

        catalog.groups.push(GroupCatalog { group, cards });
    }

    catalog.out_of_range_points = records
        .iter()
        .filter(|r| matches!(r.point, Some(p) if CopyTier::for_point(p).is_none()))
        .map(|r| r.id)
        .collect();

    catalog
}
