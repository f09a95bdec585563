//! グループ別JSON（group-<group>.json）の出力

use super::write_json;
use crate::error::Result;
use card_catalog_common::Catalog;
use std::path::{Path, PathBuf};

/// 空でないグループを1ファイルずつ書き出し、書いたパスを返す
pub fn write_groups(catalog: &Catalog, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(catalog.groups.len());
    for group in &catalog.groups {
        let path = output_dir.join(group.file_name());
        write_json(&path, &group.cards)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_catalog_common::{build_catalog, CardRecord, GroupId};
    use tempfile::tempdir;

    #[test]
    fn test_write_groups_skips_empty() {
        let dir = tempdir().unwrap();
        let records = vec![
            CardRecord { id: 1, name: "A".into(), point: Some(5), group: GroupId::Numbered(1), ..Default::default() },
            CardRecord { id: 2, name: "B".into(), point: None, group: GroupId::Exclusive, ..Default::default() },
        ];
        let written = write_groups(&build_catalog(&records), dir.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(dir.path().join("group-1.json").exists());
        assert!(dir.path().join("group-exclusive.json").exists());
        assert!(!dir.path().join("group-4.json").exists());
    }

    #[test]
    fn test_write_groups_overwrites() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("group-1.json"), "stale content").unwrap();

        let records = vec![CardRecord {
            id: 1,
            name: "A".into(),
            group: GroupId::Numbered(1),
            ..Default::default()
        }];
        write_groups(&build_catalog(&records), dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("group-1.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }
}
