use super::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use toml_edit::{DocumentMut, Item, Table, Value};

type Result<T> = std::result::Result<T, ConfigError>;

/// Migrates config file to latest format if needed
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    events: Option<&Arc<mediastore_events::EventBus>>,
) -> Result<()> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut doc = content.parse::<DocumentMut>()?;

    let added_fields = migrate_document(&mut doc)?;

    // Only write if something changed
    if !added_fields.is_empty() {
        tokio::fs::write(path.as_ref(), doc.to_string()).await?;
        tracing::info!("Migrated {} ({} change(s))", path.as_ref().display(), added_fields.len());

        if let Some(event_bus) = events {
            event_bus.emit(mediastore_events::AppEvent::ConfigMigrated {
                added_fields: added_fields.clone(),
            });
        }
    }

    Ok(())
}

/// Brings a parsed document up to date, returning a description of every change
pub(crate) fn migrate_document(doc: &mut DocumentMut) -> Result<Vec<String>> {
    let mut added_fields = Vec::new();

    migrate_storage_section(doc, &mut added_fields)?;
    migrate_legacy_cloudinary_section(doc, &mut added_fields)?;

    Ok(added_fields)
}

fn migrate_storage_section(doc: &mut DocumentMut, added_fields: &mut Vec<String>) -> Result<()> {
    let storage = ensure_table(doc.as_table_mut(), "storage", "storage", added_fields)?;
    ensure_field(storage, "storage", "backend", Value::from("local"), added_fields);

    let cloudinary = ensure_table(storage, "cloudinary", "storage.cloudinary", added_fields)?;
    ensure_field(cloudinary, "storage.cloudinary", "cloud_name", Value::from(""), added_fields);
    ensure_field(cloudinary, "storage.cloudinary", "api_key", Value::from(""), added_fields);
    ensure_field(cloudinary, "storage.cloudinary", "api_secret", Value::from(""), added_fields);
    ensure_field(
        cloudinary,
        "storage.cloudinary",
        "api_base_url",
        Value::from("https://api.cloudinary.com"),
        added_fields,
    );
    ensure_field(cloudinary, "storage.cloudinary", "timeout_secs", Value::from(60), added_fields);

    let local = ensure_table(storage, "local", "storage.local", added_fields)?;
    ensure_field(local, "storage.local", "base_path", Value::from("media"), added_fields);
    ensure_field(
        local,
        "storage.local",
        "base_url",
        Value::from("http://localhost:8080/media"),
        added_fields,
    );

    let s3 = ensure_table(storage, "s3", "storage.s3", added_fields)?;
    ensure_field(s3, "storage.s3", "endpoint_url", Value::from(""), added_fields);
    ensure_field(s3, "storage.s3", "region", Value::from("auto"), added_fields);
    ensure_field(s3, "storage.s3", "access_key_id", Value::from(""), added_fields);
    ensure_field(s3, "storage.s3", "secret_access_key", Value::from(""), added_fields);
    ensure_field(s3, "storage.s3", "bucket_name", Value::from("mediastore"), added_fields);
    ensure_field(s3, "storage.s3", "public_url", Value::from(""), added_fields);
    ensure_field(s3, "storage.s3", "bucket_prefix", Value::from(""), added_fields);

    Ok(())
}

/// Moves credentials from the deprecated top-level [cloudinary] section into
/// [storage.cloudinary]. Values already set in the new section win.
fn migrate_legacy_cloudinary_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<()> {
    let Some(legacy) = doc.get("cloudinary").and_then(|item| item.as_table()).cloned() else {
        return Ok(());
    };

    let target = doc["storage"]["cloudinary"]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError("Invalid [storage.cloudinary] section".to_string()))?;

    for (new_key, legacy_keys) in [
        ("cloud_name", ["cloud_name", "cloudName"]),
        ("api_key", ["api_key", "apiKey"]),
        ("api_secret", ["api_secret", "apiSecret"]),
    ] {
        let legacy_value = legacy_keys
            .iter()
            .find_map(|key| legacy.get(key).and_then(|item| item.as_str()))
            .filter(|value| !value.is_empty());

        let current_is_empty = target
            .get(new_key)
            .and_then(|item| item.as_str())
            .map_or(true, str::is_empty);

        if let (Some(value), true) = (legacy_value, current_is_empty) {
            target[new_key] = Item::Value(Value::from(value));
            added_fields.push(format!("storage.cloudinary.{} (migrated from cloudinary)", new_key));
        }
    }

    doc.remove("cloudinary");
    added_fields.push("removed deprecated [cloudinary] section".to_string());

    Ok(())
}

fn ensure_table<'a>(
    parent: &'a mut Table,
    key: &str,
    path: &str,
    added_fields: &mut Vec<String>,
) -> Result<&'a mut Table> {
    if !parent.contains_key(key) {
        let mut table = Table::new();
        table.set_implicit(true);
        parent[key] = Item::Table(table);
        added_fields.push(path.to_string());
    }

    // Inline tables cannot hold the fields added below, expand them to a section
    if let Some(inline) = parent[key].as_inline_table() {
        let table = inline.clone().into_table();
        parent[key] = Item::Table(table);
    }

    parent[key]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError(format!("Invalid [{}] section in config", path)))
}

fn ensure_field(
    table: &mut Table,
    path: &str,
    key: &str,
    default_value: Value,
    added_fields: &mut Vec<String>,
) {
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        added_fields.push(format!("{}.{}", path, key));
    }
}
