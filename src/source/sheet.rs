//! xlsx → 行データ
//!
//! 1枚目のシートの1行目をヘッダーとして読み、列名は小文字化する。

use crate::error::{CatalogError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use card_catalog_common::record::{columns, RawRow, SheetRow};
use std::io::Cursor;
use std::path::Path;

/// ファイルから1枚目のシートを読む（xlsx/xlsm/xls/ods）
pub fn read_file(path: &Path) -> Result<Vec<SheetRow>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CatalogError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Spreadsheet("シートがありません".into()))?
        .map_err(|e| CatalogError::Spreadsheet(e.to_string()))?;

    range_to_rows(&range)
}

/// ダウンロードしたxlsxのバイト列から読む
pub fn read_bytes(bytes: Vec<u8>) -> Result<Vec<SheetRow>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| CatalogError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Spreadsheet("シートがありません".into()))?
        .map_err(|e| CatalogError::Spreadsheet(e.to_string()))?;

    range_to_rows(&range)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// ヘッダー付きの表を列名 → 値のマップに変換
///
/// 行番号は空行を除外する前に、使用範囲の開始行から数えたシート上の番号
pub fn range_to_rows(range: &Range<Data>) -> Result<Vec<SheetRow>> {
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| CatalogError::Spreadsheet("ヘッダー行がありません".into()))?
        .iter()
        .map(|cell| cell_text(cell).to_lowercase())
        .collect();

    for required in columns::REQUIRED {
        if !header.iter().any(|h| h == required) {
            return Err(CatalogError::MissingColumn(required.to_string()));
        }
    }

    let records = rows
        .enumerate()
        .map(|(index, row)| (first_line + index + 1, row))
        .filter(|(_, row)| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|(line, row)| SheetRow {
            line,
            cells: header
                .iter()
                .zip(row.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, cell)| (name.clone(), cell_text(cell)))
                .collect::<RawRow>(),
        })
        .collect();

    Ok(records)
}
