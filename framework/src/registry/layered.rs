//! Two-layer name map: entries added in code ("manual") and entries found
//! on disk ("discovered"). Every rescan recomputes the active view from both
//! layers with [`merge`], so it can never drop a manual entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which layer wins when a manual and a discovered entry share a name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    #[default]
    DiscoveredWins,
    ManualWins,
}

pub struct Merged<V> {
    pub active: HashMap<String, V>,
    /// Names present in both layers, sorted.
    pub collisions: Vec<String>,
}

pub fn merge<V: Clone>(
    manual: &HashMap<String, V>,
    discovered: &HashMap<String, V>,
    policy: CollisionPolicy,
) -> Merged<V> {
    let (base, overlay) = match policy {
        CollisionPolicy::DiscoveredWins => (manual, discovered),
        CollisionPolicy::ManualWins => (discovered, manual),
    };

    let mut active = base.clone();
    let mut collisions = Vec::new();
    for (name, value) in overlay {
        if active.insert(name.clone(), value.clone()).is_some() {
            collisions.push(name.clone());
        }
    }
    collisions.sort_unstable();

    Merged { active, collisions }
}

pub struct Layered<V> {
    policy: CollisionPolicy,
    manual: HashMap<String, V>,
    discovered: HashMap<String, V>,
    active: HashMap<String, V>,
}

impl<V: Clone> Layered<V> {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            manual: HashMap::new(),
            discovered: HashMap::new(),
            active: HashMap::new(),
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Adds an entry to the manual layer and makes it active right away,
    /// shadowing a discovered entry of the same name until the next
    /// [`replace_discovered`](Self::replace_discovered) applies the policy.
    ///
    /// Returns the name if it collides with a discovered entry.
    pub fn insert_manual(&mut self, name: String, value: V) -> Vec<String> {
        self.manual.insert(name.clone(), value.clone());
        self.active.insert(name.clone(), value);

        if self.discovered.contains_key(&name) {
            vec![name]
        } else {
            Vec::new()
        }
    }

    /// Replaces the whole discovered layer. Later entries win over earlier
    /// ones with the same name.
    ///
    /// Returns the duplicated names within `entries` and the names colliding
    /// with the manual layer.
    pub fn replace_discovered(
        &mut self,
        entries: impl IntoIterator<Item = (String, V)>,
    ) -> (Vec<String>, Vec<String>) {
        self.discovered.clear();

        let mut duplicates = Vec::new();
        for (name, value) in entries {
            if self.discovered.insert(name.clone(), value).is_some() {
                duplicates.push(name);
            }
        }

        (duplicates, self.recompute())
    }

    fn recompute(&mut self) -> Vec<String> {
        let merged = merge(&self.manual, &self.discovered, self.policy);
        self.active = merged.active;
        merged.collisions
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.active.get(name)
    }

    pub fn active(&self) -> &HashMap<String, V> {
        &self.active
    }

    pub fn manual(&self) -> &HashMap<String, V> {
        &self.manual
    }

    pub fn discovered(&self) -> &HashMap<String, V> {
        &self.discovered
    }

    /// Active names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.active.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn disjoint_layers_union() {
        let merged = merge(
            &map(&[("reload", "manual")]),
            &map(&[("ping", "disk"), ("profile", "disk")]),
            CollisionPolicy::DiscoveredWins,
        );

        assert_eq!(merged.active.len(), 3);
        assert!(merged.collisions.is_empty());
    }

    #[test]
    fn collision_policies() {
        let manual = map(&[("ping", "manual")]);
        let discovered = map(&[("ping", "disk")]);

        let merged = merge(&manual, &discovered, CollisionPolicy::DiscoveredWins);
        assert_eq!(merged.active["ping"], "disk");
        assert_eq!(merged.collisions, vec!["ping".to_string()]);

        let merged = merge(&manual, &discovered, CollisionPolicy::ManualWins);
        assert_eq!(merged.active["ping"], "manual");
        assert_eq!(merged.collisions, vec!["ping".to_string()]);
    }

    #[test]
    fn manual_survives_replacing_discovered() {
        let mut layers = Layered::new(CollisionPolicy::DiscoveredWins);
        layers.insert_manual("reload".into(), "manual".to_string());
        layers.replace_discovered([("ping".to_string(), "disk".to_string())]);
        assert_eq!(layers.names(), vec!["ping", "reload"]);

        // the directory was emptied
        layers.replace_discovered(Vec::new());
        assert_eq!(layers.names(), vec!["reload"]);
        assert!(layers.discovered().is_empty());
    }

    #[test]
    fn duplicate_discovered_last_wins() {
        let mut layers = Layered::new(CollisionPolicy::DiscoveredWins);
        let (duplicates, collisions) = layers.replace_discovered([
            ("ping".to_string(), "a.toml".to_string()),
            ("ping".to_string(), "b.toml".to_string()),
        ]);

        assert_eq!(duplicates, vec!["ping".to_string()]);
        assert!(collisions.is_empty());
        assert_eq!(layers.get("ping").map(String::as_str), Some("b.toml"));
    }

    #[test]
    fn manual_insert_is_active_until_rescan() {
        let mut layers = Layered::new(CollisionPolicy::DiscoveredWins);
        layers.replace_discovered([("ping".to_string(), "disk".to_string())]);

        let collisions = layers.insert_manual("ping".into(), "manual".to_string());
        assert_eq!(collisions, vec!["ping".to_string()]);
        assert_eq!(layers.get("ping").map(String::as_str), Some("manual"));
        assert_eq!(layers.manual().len(), 1);

        // the policy applies again on the next rescan
        layers.replace_discovered([("ping".to_string(), "disk".to_string())]);
        assert_eq!(layers.get("ping").map(String::as_str), Some("disk"));
    }

    #[test]
    fn manual_insert_without_collision() {
        let mut layers = Layered::new(CollisionPolicy::ManualWins);
        let collisions = layers.insert_manual("reload".into(), "manual".to_string());

        assert!(collisions.is_empty());
        assert_eq!(layers.names(), vec!["reload"]);
    }
}
