use crate::error::{CatalogError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    /// スキャン起点からの相対パス
    pub relative_path: PathBuf,
}

/// 拡張子が一致するか（大文字小文字を区別しない）
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// フォルダ以下（サブフォルダを含む）の指定拡張子のファイルを集める
pub fn scan_folder(folder: &Path, extension: &str) -> Result<Vec<ImageFile>> {
    if !folder.is_dir() {
        return Err(CatalogError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageFile> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extension))
        .map(|e| {
            let path = e.path().to_path_buf();
            let relative_path = path.strip_prefix(folder).unwrap_or(&path).to_path_buf();
            ImageFile { path, relative_path }
        })
        .collect();

    // 相対パスでソート
    images.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.webp"), "webp"));
        assert!(has_extension(Path::new("a.WEBP"), "webp"));
        assert!(!has_extension(Path::new("a.png"), "webp"));
        assert!(!has_extension(Path::new("webp"), "webp"));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"), "webp");
        assert!(matches!(result, Err(CatalogError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_recursive_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("group-2")).unwrap();

        File::create(dir.path().join("c.webp")).unwrap();
        File::create(dir.path().join("a.WEBP")).unwrap();
        File::create(dir.path().join("group-2").join("b.webp")).unwrap();
        File::create(dir.path().join("readme.txt")).unwrap();

        let result = scan_folder(dir.path(), "webp").unwrap();
        let names: Vec<String> = result
            .iter()
            .map(|i| i.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.WEBP", "c.webp", "group-2/b.webp"]);
    }
}
