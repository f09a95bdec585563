//! 表形式の1行 → CardRecord の検証
//!
//! 列名は小文字化済みの前提。任意列の欠落や空セルは None として扱い、
//! 必須列（id, name, group）が不正な行のみエラーにする。

use crate::error::{Error, Result};
use crate::types::{CardRecord, GroupId};
use std::collections::{HashMap, HashSet};

/// 列名
pub mod columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const POINT: &str = "point";
    pub const IMAGE: &str = "image";
    pub const GROUP: &str = "group";
    pub const NAME_KR: &str = "namekr";
    pub const NAME_BR: &str = "namebr";
    pub const NAME_TW: &str = "nametw";
    pub const ACQUIRED_FROM: &str = "acquiredfrom";

    /// 欠けていると読み込み自体ができない列
    pub const REQUIRED: &[&str] = &[ID, NAME, GROUP];
}

/// 列名 → セル文字列
pub type RawRow = HashMap<String, String>;

/// シート上の行番号（1始まり）付きの行
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetRow {
    pub line: usize,
    pub cells: RawRow,
}

fn cell<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn optional(row: &RawRow, column: &str) -> Option<String> {
    cell(row, column).map(str::to_string)
}

/// ポイントを整数として解釈する。`"12"`・`"12.0"` は可、`"abc"`・`"12.5"` は None
pub fn parse_point(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

fn parse_id(raw: &str) -> Option<u32> {
    let id = parse_point(raw)?;
    u32::try_from(id).ok().filter(|&id| id > 0)
}

impl CardRecord {
    /// 1行分を検証して CardRecord を作る
    pub fn from_row(row: &RawRow) -> Result<Self> {
        let raw_id = cell(row, columns::ID)
            .ok_or_else(|| Error::InvalidRecord("idが空です".into()))?;
        let id = parse_id(raw_id)
            .ok_or_else(|| Error::InvalidRecord(format!("idが正の整数ではありません: {}", raw_id)))?;

        let name = optional(row, columns::NAME)
            .ok_or_else(|| Error::InvalidRecord(format!("id={}: nameが空です", id)))?;

        let raw_group = cell(row, columns::GROUP)
            .ok_or_else(|| Error::InvalidRecord(format!("id={}: groupが空です", id)))?;
        let group = GroupId::parse_cell(raw_group).ok_or_else(|| {
            Error::InvalidRecord(format!("id={}: 不明なgroup: {}", id, raw_group))
        })?;

        Ok(CardRecord {
            id,
            name,
            name_kr: optional(row, columns::NAME_KR),
            name_br: optional(row, columns::NAME_BR),
            name_tw: optional(row, columns::NAME_TW),
            point: cell(row, columns::POINT).and_then(parse_point),
            group,
            image: optional(row, columns::IMAGE),
            acquired_from: optional(row, columns::ACQUIRED_FROM),
        })
    }
}

/// 不正行を除外した読み込み結果
#[derive(Debug, Clone, Default)]
pub struct ValidatedRecords {
    pub records: Vec<CardRecord>,
    /// (シート上の行番号, 理由)
    pub rejected: Vec<(usize, String)>,
}

/// 全行を検証する。重複idは先勝ち
pub fn validate_rows(rows: &[SheetRow]) -> ValidatedRecords {
    let mut result = ValidatedRecords::default();
    let mut seen = HashSet::new();

    for row in rows {
        let line = row.line;
        match CardRecord::from_row(&row.cells) {
            Ok(record) if !seen.insert(record.id) => {
                result.rejected.push((line, format!("id={}: idが重複しています", record.id)));
            }
            Ok(record) => result.records.push(record),
            Err(e) => result.rejected.push((line, e.to_string())),
        }
    }

    result
}
