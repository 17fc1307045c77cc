use std::collections::{BTreeMap, HashSet};

use super::Registry;
use crate::error::{TraksError, TraksResult};

/// Old key to new key, built by keying every fragment under two normalizers.
pub type KeyMap = BTreeMap<String, String>;

/// Rename the entries of `registry` according to `keymap`.
///
/// Every live entry must have a mapping. Deleted entries keep their key.
/// Returns the `(old, new)` pairs that actually changed, in registry order.
pub fn remap_keys(registry: &mut Registry, keymap: &KeyMap) -> TraksResult<Vec<(String, String)>> {
    let mut renamed = Vec::new();
    let mut targets: Vec<Option<String>> = Vec::with_capacity(registry.entries.len());

    for entry in &registry.entries {
        if entry.is_deleted {
            targets.push(None);
            continue;
        }
        let new_key = keymap.get(&entry.key).ok_or_else(|| {
            TraksError::config(format!(
                "key {} could not be mapped; run `traks update` before migrating",
                entry.key
            ))
        })?;
        if *new_key == entry.key {
            targets.push(None);
        } else {
            targets.push(Some(new_key.clone()));
        }
    }

    let mut taken: HashSet<&str> = registry
        .entries
        .iter()
        .zip(&targets)
        .filter(|(_, target)| target.is_none())
        .map(|(entry, _)| entry.key.as_str())
        .collect();
    for (entry, target) in registry.entries.iter().zip(&targets) {
        if let Some(new_key) = target
            && !taken.insert(new_key.as_str())
        {
            return Err(TraksError::config(format!(
                "cannot map key {} to {}: an entry with that key already exists",
                entry.key, new_key
            )));
        }
    }

    for (entry, target) in registry.entries.iter_mut().zip(targets) {
        if let Some(new_key) = target {
            renamed.push((std::mem::replace(&mut entry.key, new_key.clone()), new_key));
        }
    }
    Ok(renamed)
}
