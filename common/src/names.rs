//! カード名のスラッグ化とロケール辞書

use crate::types::{CardRecord, Locale};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// 小文字化し、英数字以外の連続を `separator` 1文字に置換して両端を除去
pub fn slugify(name: &str, separator: char) -> String {
    let lower = name.to_lowercase();
    let replaced = NON_ALNUM.replace_all(&lower, separator.to_string().as_str());
    replaced.trim_matches(separator).to_string()
}

/// ロケール辞書のキー（`Fire Dragon!` → `fire_dragon`）
pub fn name_key(name: &str) -> String {
    slugify(name, '_')
}

/// 画像ファイル名の幹（`Fire Dragon!` → `fire-dragon`）
pub fn image_slug(name: &str) -> String {
    slugify(name, '-')
}

/// `card-names.json` の中身: ロケール → (名前キー → 表示名)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardNames(BTreeMap<Locale, BTreeMap<String, String>>);

impl CardNames {
    pub fn from_records(records: &[CardRecord]) -> Self {
        let mut dict: BTreeMap<Locale, BTreeMap<String, String>> =
            Locale::ALL.iter().map(|&l| (l, BTreeMap::new())).collect();

        for record in records {
            let key = name_key(&record.name);
            let names = record.localized_names();
            for locale in Locale::ALL {
                dict.entry(locale)
                    .or_default()
                    .insert(key.clone(), names.get(locale).to_string());
            }
        }

        CardNames(dict)
    }

    pub fn get(&self, locale: Locale, key: &str) -> Option<&str> {
        self.0.get(&locale)?.get(key).map(String::as_str)
    }

    /// 1ロケールあたりのキー数
    pub fn len(&self) -> usize {
        self.0.get(&Locale::En).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
