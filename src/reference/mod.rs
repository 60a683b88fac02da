use leptos::logging::error;
use serde::{Deserialize, Serialize};

const BUNDLED_DATASET: &str = include_str!("../../data/reference.json");

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct MapEntry {
    pub id: String,
    pub name: String,
    pub continent: String,
    #[serde(rename = "type")]
    pub map_type: String,
    #[serde(default)]
    pub level_range: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NpcEntry {
    pub id: u32,
    pub name: String,
    pub map_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Guide {
    pub slug: String,
    pub title: String,
    pub body: String,
}

/// What a `[[Name]]` in a guide points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReferenceLink<'a> {
    Map(&'a MapEntry),
    Npc(&'a NpcEntry),
}

/// Read-only game-world data bundled with the app.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct ReferenceStore {
    #[serde(default)]
    maps: Vec<MapEntry>,
    #[serde(default)]
    npcs: Vec<NpcEntry>,
    #[serde(default)]
    guides: Vec<Guide>,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl ReferenceStore {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The dataset compiled into the binary. Falls back to an empty store if
    /// it does not parse; the unit tests keep that from shipping.
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_DATASET).unwrap_or_else(|e| {
            error!("bundled reference data is invalid: {e}");
            Self::default()
        })
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn find_map_by_id(&self, id: &str) -> Option<&MapEntry> {
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn find_npcs_for_map(&self, map_id: &str) -> Vec<&NpcEntry> {
        self.npcs.iter().filter(|n| n.map_id == map_id).collect()
    }

    /// Case-insensitive substring match on the name. Only the empty query
    /// matches everything; whitespace is matched literally.
    pub fn search_maps(&self, query: &str) -> Vec<&MapEntry> {
        let q = query.to_lowercase();
        self.maps
            .iter()
            .filter(|m| q.is_empty() || contains_ci(&m.name, &q))
            .collect()
    }

    /// Matches name, any tag, or description. Each NPC appears at most once.
    pub fn search_npcs(&self, query: &str) -> Vec<&NpcEntry> {
        let q = query.to_lowercase();
        self.npcs
            .iter()
            .filter(|n| {
                q.is_empty()
                    || contains_ci(&n.name, &q)
                    || n.tags.iter().any(|t| contains_ci(t, &q))
                    || contains_ci(&n.description, &q)
            })
            .collect()
    }

    pub fn filter_maps_by_continent(&self, continent: &str) -> Vec<&MapEntry> {
        self.maps.iter().filter(|m| m.continent == continent).collect()
    }

    pub fn filter_maps_by_type(&self, map_type: &str) -> Vec<&MapEntry> {
        self.maps.iter().filter(|m| m.map_type == map_type).collect()
    }

    /// Distinct continents in dataset order.
    pub fn continents(&self) -> Vec<&str> {
        distinct(self.maps.iter().map(|m| m.continent.as_str()))
    }

    /// Distinct map types in dataset order.
    pub fn map_types(&self) -> Vec<&str> {
        distinct(self.maps.iter().map(|m| m.map_type.as_str()))
    }

    pub fn find_guide(&self, slug: &str) -> Option<&Guide> {
        self.guides.iter().find(|g| g.slug == slug)
    }

    /// Exact-name lookup; maps take precedence over NPCs.
    pub fn resolve_link(&self, name: &str) -> Option<ReferenceLink<'_>> {
        if let Some(m) = self.maps.iter().find(|m| m.name == name) {
            return Some(ReferenceLink::Map(m));
        }
        self.npcs
            .iter()
            .find(|n| n.name == name)
            .map(ReferenceLink::Npc)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ReferenceStore {
        ReferenceStore::from_json(
            r#"{
                "maps": [
                    {"id": "m1", "name": "Harbor Town", "continent": "West", "type": "town"},
                    {"id": "m2", "name": "Old Mine", "continent": "West", "type": "dungeon", "level_range": "25-40"},
                    {"id": "m3", "name": "Frost Gate", "continent": "North", "type": "town"}
                ],
                "npcs": [
                    {"id": 1, "name": "Smith Bram", "map_id": "m1", "tags": ["craft", "repair"], "description": "Repairs gear."},
                    {"id": 2, "name": "Miner Den", "map_id": "m2", "tags": ["quest"], "description": "Needs help with golems in the mine."},
                    {"id": 3, "name": "Trader Mira", "map_id": "m1", "tags": ["shop"], "description": "Sells potions."},
                    {"id": 4, "name": "Mine Guard", "map_id": "m2", "tags": ["mine", "quest"], "description": "Guards the mine entrance."}
                ],
                "guides": [{"slug": "g", "title": "Guide", "body": "[[Old Mine]]"}]
            }"#,
        )
        .expect("fixture should parse")
    }

    fn ids<T, K: Clone>(items: &[&T], key: impl Fn(&T) -> K) -> Vec<K> {
        items.iter().map(|i| key(i)).collect()
    }

    #[test]
    fn test_bundled_dataset_parses_and_is_consistent() {
        let s = ReferenceStore::from_json(BUNDLED_DATASET).expect("bundled dataset should parse");
        assert!(!s.search_maps("").is_empty());
        assert!(!s.guides().is_empty());
        for npc in &s.npcs {
            assert!(
                s.find_map_by_id(&npc.map_id).is_some(),
                "npc {} points at unknown map {}",
                npc.id,
                npc.map_id
            );
        }
    }

    #[test]
    fn test_find_map_by_id() {
        let s = store();
        assert_eq!(s.find_map_by_id("m2").map(|m| m.name.as_str()), Some("Old Mine"));
        assert!(s.find_map_by_id("missing").is_none());
    }

    #[test]
    fn test_find_npcs_for_map_keeps_dataset_order() {
        let s = store();
        assert_eq!(ids(&s.find_npcs_for_map("m1"), |n| n.id), vec![1, 3]);
        assert!(s.find_npcs_for_map("m3").is_empty());
    }

    #[test]
    fn test_search_maps_is_case_insensitive_substring() {
        let s = store();
        assert_eq!(ids(&s.search_maps("MINE"), |m| m.id.clone()), vec!["m2"]);
        assert_eq!(ids(&s.search_maps("o"), |m| m.id.clone()), vec!["m1", "m2", "m3"]);
        assert!(s.search_maps("castle").is_empty());
    }

    #[test]
    fn test_search_maps_empty_query_returns_all() {
        let s = store();
        assert_eq!(s.search_maps("").len(), 3);
    }

    #[test]
    fn test_search_matches_whitespace_literally() {
        let s = store();
        assert!(s.search_maps("   ").is_empty());
        assert!(s.search_maps("Mine ").is_empty());
        assert_eq!(ids(&s.search_maps("old m"), |m| m.id.clone()), vec!["m2"]);
        for m in s.search_maps(" ") {
            assert!(m.name.to_lowercase().contains(' '));
        }
        assert!(s.search_npcs("  ").is_empty());
        assert_eq!(ids(&s.search_npcs("mine "), |n| n.id), vec![4]);
    }

    #[test]
    fn test_search_npcs_unions_name_tag_and_description_without_duplicates() {
        let s = store();
        // "mine": name of 2 and 4, tag of 4, description of 2 and 4.
        assert_eq!(ids(&s.search_npcs("mine"), |n| n.id), vec![2, 4]);
        // tag-only match
        assert_eq!(ids(&s.search_npcs("REPAIR"), |n| n.id), vec![1]);
        // description-only match
        assert_eq!(ids(&s.search_npcs("potions"), |n| n.id), vec![3]);
        assert_eq!(s.search_npcs("").len(), 4);
    }

    #[test]
    fn test_search_npcs_korean_text() {
        let s = ReferenceStore::bundled();
        let hits = s.search_npcs("경매");
        assert!(hits.iter().any(|n| n.name == "경매인 카사"));
    }

    #[test]
    fn test_filters_by_continent_and_type() {
        let s = store();
        assert_eq!(ids(&s.filter_maps_by_continent("West"), |m| m.id.clone()), vec!["m1", "m2"]);
        assert_eq!(ids(&s.filter_maps_by_type("town"), |m| m.id.clone()), vec!["m1", "m3"]);
        assert!(s.filter_maps_by_continent("west").is_empty());
    }

    #[test]
    fn test_distinct_continents_and_types() {
        let s = store();
        assert_eq!(s.continents(), vec!["West", "North"]);
        assert_eq!(s.map_types(), vec!["town", "dungeon"]);
    }

    #[test]
    fn test_resolve_link_prefers_maps() {
        let s = store();
        assert!(matches!(s.resolve_link("Old Mine"), Some(ReferenceLink::Map(m)) if m.id == "m2"));
        assert!(matches!(s.resolve_link("Trader Mira"), Some(ReferenceLink::Npc(n)) if n.id == 3));
        assert!(s.resolve_link("old mine").is_none());
        assert_eq!(s.find_guide("g").map(|g| g.title.as_str()), Some("Guide"));
    }
}
