//! Card Catalog Common Library
//!
//! カードデータの型・コピー段階テーブル・グループ集計（I/Oなし）

pub mod types;
pub mod copy_tier;
pub mod catalog;
pub mod record;
pub mod names;
pub mod error;

pub use types::{CardDescriptor, CardRecord, GroupId, Locale, LocalizedNames, DASH, DEFAULT_IMAGE};
pub use copy_tier::{band_for, cumulate, CopyTier, PointBand, POINT_BANDS};
pub use catalog::{build_catalog, describe, Catalog, GroupCatalog};
pub use record::{parse_point, validate_rows, RawRow, SheetRow, ValidatedRecords};
pub use names::{image_slug, name_key, CardNames};
pub use error::{Error, Result};
