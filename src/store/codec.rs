//! TOML representation of a [`ConfigStore`].
//!
//! Top-level scalars belong to the root namespace and every top-level table
//! is a namespace:
//!
//! ```toml
//! a = true
//! b = 5.6
//! c = "Hello world"
//!
//! [custom]
//! d = "Hello d"
//! ```
//!
//! A `[default]` table also belongs to the root namespace. Rendering uses it
//! when a root key has the same name as a namespace, since TOML cannot hold
//! both as top-level keys.
//!
//! Scalars of any TOML type load as their string form. Rendering always
//! writes strings, so a rendered store loads back unchanged.

use std::path::Path;

use toml::{Table, Value};

use super::{ConfigStore, DEFAULT_NAMESPACE, StoreError};

/// Parses TOML `content` read from `path` into a store.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] for invalid TOML and
/// [`StoreError::Malformed`] for arrays or nested tables inside a namespace.
pub fn parse(content: &str, path: &Path) -> Result<ConfigStore, StoreError> {
    let table: Table = toml::from_str(content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut store = ConfigStore::new();
    for (key, value) in table {
        if let Value::Table(section) = value {
            for (inner_key, inner_value) in section {
                let text = scalar_to_string(inner_value)
                    .map_err(|reason| malformed(path, &format!("{key}.{inner_key}"), reason))?;
                store.set_string(&key, &inner_key, text);
            }
        } else {
            let text = scalar_to_string(value).map_err(|reason| malformed(path, &key, reason))?;
            store.set_string("", &key, text);
        }
    }
    Ok(store)
}

/// Renders `store` as TOML: root keys first, then one table per namespace.
///
/// Root keys go under a `[default]` table when any of them shares its name
/// with a namespace. Output depends only on the store's contents.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if TOML serialization fails.
pub fn render(store: &ConfigStore) -> Result<String, StoreError> {
    let mut out = String::new();

    let root = section_table(store, "");
    let namespaces: Vec<&str> = store.namespaces().filter(|ns| !ns.is_empty()).collect();

    if namespaces.iter().any(|ns| root.contains_key(*ns)) {
        out.push_str(&wrapped(DEFAULT_NAMESPACE, root)?);
    } else if !root.is_empty() {
        out.push_str(&toml::to_string(&root)?);
    }

    for namespace in namespaces {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&wrapped(namespace, section_table(store, namespace))?);
    }

    Ok(out)
}

fn wrapped(name: &str, section: Table) -> Result<String, StoreError> {
    let mut wrapper = Table::new();
    wrapper.insert(name.to_string(), Value::Table(section));
    Ok(toml::to_string(&wrapper)?)
}

fn section_table(store: &ConfigStore, namespace: &str) -> Table {
    store
        .entries(namespace)
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

fn scalar_to_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) => Err("arrays are not supported".to_string()),
        Value::Table(_) => Err("nested tables are not supported".to_string()),
    }
}

fn malformed(path: &Path, key: &str, reason: String) -> StoreError {
    StoreError::Malformed {
        path: path.to_path_buf(),
        key: key.to_string(),
        reason,
    }
}
