use crate::attributes::ChampionAttributes;
use crate::index::ChampIndex;
use draftlab_core::ChampionId;
use draftlab_core::DraftMlError;
use draftlab_core::Patch;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

/// Generation metadata carried alongside the attribute map (spec.md §6.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMapMeta {
    pub patch: Patch,
    pub generated_at_unix: u64,
    pub total_champions: usize,
}

/// On-disk document shape: champion id keyed by string for stability,
/// an explicit `champ_index` ordering, and a `meta` block (spec.md §6.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttributeMapDocument {
    champions: BTreeMap<String, ChampionAttributes>,
    champ_index: Vec<String>,
    meta: AttributeMapMeta,
}

/// The loaded, queryable champion attribute map. Unknown champion ids are
/// a hard error at lookup time (spec.md §4.1): the feature vector's
/// semantics depend on `champ_index`, so silently skipping an unknown
/// champion would silently corrupt every downstream feature.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMap {
    attributes: HashMap<ChampionId, ChampionAttributes>,
    index: ChampIndex,
    meta: AttributeMapMeta,
}

impl AttributeMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DraftMlError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            DraftMlError::internal(format!(
                "reading attribute map {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, DraftMlError> {
        let doc: AttributeMapDocument = serde_json::from_slice(bytes)
            .map_err(|e| DraftMlError::invalid_request(format!("malformed attribute map: {e}")))?;
        Self::from_document(doc)
    }

    fn from_document(doc: AttributeMapDocument) -> Result<Self, DraftMlError> {
        let ordered_ids = doc
            .champ_index
            .iter()
            .map(|s| parse_champion_id(s))
            .collect::<Result<Vec<_>, _>>()?;
        let index = ChampIndex::from_ordered_ids(ordered_ids)?;

        let mut attributes = HashMap::with_capacity(doc.champions.len());
        for (id_str, attrs) in doc.champions {
            let id = parse_champion_id(&id_str)?;
            attributes.insert(id, attrs);
        }
        for id in index.ids() {
            if !attributes.contains_key(id) {
                return Err(DraftMlError::invalid_request(format!(
                    "champ_index references champion {id} missing from champions map"
                )));
            }
        }
        Ok(Self {
            attributes,
            index,
            meta: doc.meta,
        })
    }

    pub fn get(&self, id: ChampionId) -> Result<&ChampionAttributes, DraftMlError> {
        self.attributes
            .get(&id)
            .ok_or_else(|| DraftMlError::invalid_request(format!("unknown champion id {id}")))
    }

    pub fn n(&self) -> usize {
        self.index.n()
    }

    pub fn index(&self) -> &ChampIndex {
        &self.index
    }

    pub fn meta(&self) -> &AttributeMapMeta {
        &self.meta
    }

    pub fn champion_ids(&self) -> impl Iterator<Item = ChampionId> + '_ {
        self.index.ids().iter().copied()
    }
}

fn parse_champion_id(s: &str) -> Result<ChampionId, DraftMlError> {
    s.parse::<ChampionId>()
        .map_err(|_| DraftMlError::invalid_request(format!("malformed champion id '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::Damage;
    use draftlab_core::Role;

    fn sample_attrs(role: Role) -> ChampionAttributes {
        ChampionAttributes {
            role,
            damage: Damage::Ap,
            engage: 1,
            hard_cc: 1,
            poke: 1,
            splitpush: 1,
            frontline: 1,
            skill_cap: 2,
            scaling_early: 1,
            scaling_mid: 2,
            scaling_late: 2,
        }
    }

    fn sample_doc() -> AttributeMapDocument {
        let mut champions = BTreeMap::new();
        champions.insert("1".to_string(), sample_attrs(Role::Top));
        champions.insert("2".to_string(), sample_attrs(Role::Jungle));
        AttributeMapDocument {
            champions,
            champ_index: vec!["1".to_string(), "2".to_string()],
            meta: AttributeMapMeta {
                patch: Patch::new(15, 20),
                generated_at_unix: 0,
                total_champions: 2,
            },
        }
    }

    #[test]
    fn loads_from_json_and_looks_up() {
        let doc = sample_doc();
        let bytes = serde_json::to_vec(&doc).unwrap();
        let map = AttributeMap::from_json(&bytes).unwrap();
        assert_eq!(map.n(), 2);
        assert!(map.get(1).is_ok());
        assert!(map.get(1).unwrap().role == Role::Top);
    }

    #[test]
    fn unknown_id_is_hard_error() {
        let doc = sample_doc();
        let bytes = serde_json::to_vec(&doc).unwrap();
        let map = AttributeMap::from_json(&bytes).unwrap();
        assert!(map.get(999).is_err());
    }

    #[test]
    fn index_must_be_fully_covered_by_champions() {
        let mut doc = sample_doc();
        doc.champ_index.push("3".to_string());
        let bytes = serde_json::to_vec(&doc).unwrap();
        assert!(AttributeMap::from_json(&bytes).is_err());
    }
}
