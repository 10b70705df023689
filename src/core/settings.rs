//! Persisted settings - a small key/value store in the `settings` table.
//!
//! Used for application bookkeeping such as the time of the last remote import.

use crate::{
    entities::{Setting, setting},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};

/// Key under which the last successful remote import time is stored
pub const LAST_IMPORT_KEY: &str = "last_import";

/// Reads a setting, `None` when it was never written.
pub async fn get_setting<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = Setting::find()
        .filter(setting::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(state.map(|s| s.value))
}

/// Writes a setting, replacing any previous value.
pub async fn set_setting<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = Setting::find()
        .filter(setting::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: setting::ActiveModel = state.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_missing_setting_is_none() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_setting(&db, LAST_IMPORT_KEY).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_overwrites_single_row() -> Result<()> {
        let db = setup_test_db().await?;
        set_setting(&db, "feature.reports", "on").await?;
        set_setting(&db, "feature.reports", "off").await?;

        assert_eq!(
            get_setting(&db, "feature.reports").await?.as_deref(),
            Some("off")
        );
        let count = Setting::find()
            .filter(setting::Column::Key.eq("feature.reports"))
            .count(&db)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }
}
