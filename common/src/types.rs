//! カードデータの型定義
//!
//! CLIと共有される型:
//! - CardRecord: スプレッドシート1行分の入力（読み込み時に検証済み）
//! - CardDescriptor: グループ別JSONに出力される1枚分の記述子
//! - GroupId: 数値グループ(1..7)または番兵タグ

use crate::copy_tier::CopyTier;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 出力JSONで「値なし」を表す番兵文字列
pub const DASH: &str = "-";

/// 画像が未指定のときのファイル名
pub const DEFAULT_IMAGE: &str = "default.webp";

/// カードのグループ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupId {
    /// 収集対象グループ 1..=7
    Numbered(u8),
    Uncollectible,
    Exclusive,
}

impl GroupId {
    pub const MIN_NUMBERED: u8 = 1;
    pub const MAX_NUMBERED: u8 = 7;

    /// 処理順（1..7 → uncollectible → exclusive）
    pub fn all() -> Vec<GroupId> {
        (Self::MIN_NUMBERED..=Self::MAX_NUMBERED)
            .map(GroupId::Numbered)
            .chain([GroupId::Uncollectible, GroupId::Exclusive])
            .collect()
    }

    /// 出力ファイル名 `group-<group>.json`
    pub fn file_name(&self) -> String {
        format!("group-{}.json", self)
    }

    /// セル値からの変換。Excelの数値セル（`3.0`）も受け付ける
    pub fn parse_cell(raw: &str) -> Option<GroupId> {
        let raw = raw.trim();
        if let Ok(group) = raw.parse::<GroupId>() {
            return Some(group);
        }
        let value = raw.parse::<f64>().ok()?;
        if value.fract() != 0.0 {
            return None;
        }
        let n = value as i64;
        if (Self::MIN_NUMBERED as i64..=Self::MAX_NUMBERED as i64).contains(&n) {
            Some(GroupId::Numbered(n as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Numbered(n) => write!(f, "{}", n),
            GroupId::Uncollectible => write!(f, "uncollectible"),
            GroupId::Exclusive => write!(f, "exclusive"),
        }
    }
}

impl FromStr for GroupId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uncollectible" => Ok(GroupId::Uncollectible),
            "exclusive" => Ok(GroupId::Exclusive),
            other => match other.parse::<u8>() {
                Ok(n) if (Self::MIN_NUMBERED..=Self::MAX_NUMBERED).contains(&n) => {
                    Ok(GroupId::Numbered(n))
                }
                _ => Err(format!("Unknown group: {}. Use 1-7, uncollectible, or exclusive", s)),
            },
        }
    }
}

// 数値グループは数値、番兵タグは文字列のままJSONに出す
impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupId::Numbered(n) => serializer.serialize_u8(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let raw = match &value {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => return Err(serde::de::Error::custom(format!("invalid group: {}", other))),
        };
        GroupId::parse_cell(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid group: {}", raw)))
    }
}

/// スプレッドシート1行分のカード情報
///
/// 読み込み時に一度だけ検証され、以降は変更されない。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardRecord {
    pub id: u32,
    pub name: String,
    pub name_kr: Option<String>,
    pub name_br: Option<String>,
    pub name_tw: Option<String>,
    /// レア度ポイント（未入力・数値でない場合は None）
    pub point: Option<i64>,
    pub group: GroupId,
    pub image: Option<String>,
    pub acquired_from: Option<String>,
}

impl Default for GroupId {
    fn default() -> Self {
        GroupId::Numbered(Self::MIN_NUMBERED)
    }
}

impl CardRecord {
    /// ロケール別の表示名（未設定は英語名にフォールバック）
    pub fn localized_names(&self) -> LocalizedNames {
        let fallback = |v: &Option<String>| v.clone().unwrap_or_else(|| self.name.clone());
        LocalizedNames {
            en: self.name.clone(),
            kr: fallback(&self.name_kr),
            br: fallback(&self.name_br),
            tw: fallback(&self.name_tw),
        }
    }
}

/// ロケールコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Kr,
    Br,
    Tw,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Kr, Locale::Br, Locale::Tw];
}

/// 表示名（ロケール別）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNames {
    pub en: String,
    pub kr: String,
    pub br: String,
    pub tw: String,
}

impl LocalizedNames {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Kr => &self.kr,
            Locale::Br => &self.br,
            Locale::Tw => &self.tw,
        }
    }
}

/// グループ別JSONの1要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDescriptor {
    pub id: u32,
    pub names: LocalizedNames,
    #[serde(with = "dash_or_value")]
    pub point: Option<i64>,
    pub group: GroupId,
    pub individual_probability: f64,
    pub group_count: usize,
    pub image: String,
    pub acquired_from: String,
    #[serde(with = "copy_or_dash")]
    pub copy: Option<CopyTier>,
}

/// `Option<T>` を値または `"-"` として読み書きする
mod dash_or_value {
    use super::DASH;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer, T: Serialize>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(DASH),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>, T: DeserializeOwned>(
        deserializer: D,
    ) -> Result<Option<T>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some(DASH) {
            return Ok(None);
        }
        serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom)
    }
}

/// コピー段階。ポイントなしは `{"interval":"-","cumulated":"-"}`
mod copy_or_dash {
    use super::DASH;
    use crate::copy_tier::CopyTier;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Absent {
        interval: &'static str,
        cumulated: &'static str,
    }

    pub fn serialize<S: Serializer>(
        value: &Option<CopyTier>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(tier) => tier.serialize(serializer),
            None => Absent { interval: DASH, cumulated: DASH }.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CopyTier>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("interval").and_then(|v| v.as_str()) == Some(DASH) {
            return Ok(None);
        }
        serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom)
    }
}
