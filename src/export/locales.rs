//! ロケール辞書（card-names.json）の出力

use super::write_json;
use crate::error::Result;
use card_catalog_common::CardNames;
use std::path::{Path, PathBuf};

pub const CARD_NAMES_FILE: &str = "card-names.json";

pub fn write_card_names(names: &CardNames, locales_dir: &Path) -> Result<PathBuf> {
    let path = locales_dir.join(CARD_NAMES_FILE);
    write_json(&path, names)?;
    Ok(path)
}
