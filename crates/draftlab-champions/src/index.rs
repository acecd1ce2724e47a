use draftlab_core::ChampionId;
use draftlab_core::DraftMlError;
use std::collections::HashMap;

/// Stable bijection between champion id and a contiguous integer in
/// `[0, N)`. The ordering is part of the artifact and must be preserved
/// for a given feature version (spec.md §3, §9).
#[derive(Debug, Clone, PartialEq)]
pub struct ChampIndex {
    id_to_index: HashMap<ChampionId, usize>,
    index_to_id: Vec<ChampionId>,
}

impl ChampIndex {
    /// Builds the bijection from an explicit, order-preserving id list.
    /// The order given here is the order baked into every downstream
    /// feature vector and asset matrix.
    pub fn from_ordered_ids(ids: Vec<ChampionId>) -> Result<Self, DraftMlError> {
        let mut id_to_index = HashMap::with_capacity(ids.len());
        for (idx, id) in ids.iter().enumerate() {
            if id_to_index.insert(*id, idx).is_some() {
                return Err(DraftMlError::invalid_request(format!(
                    "duplicate champion id {id} in champ_index"
                )));
            }
        }
        Ok(Self {
            id_to_index,
            index_to_id: ids,
        })
    }

    pub fn n(&self) -> usize {
        self.index_to_id.len()
    }

    pub fn index_of(&self, id: ChampionId) -> Result<usize, DraftMlError> {
        self.id_to_index
            .get(&id)
            .copied()
            .ok_or_else(|| DraftMlError::invalid_request(format!("unknown champion id {id}")))
    }

    pub fn id_at(&self, index: usize) -> Option<ChampionId> {
        self.index_to_id.get(index).copied()
    }

    pub fn ids(&self) -> &[ChampionId] {
        &self.index_to_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_roundtrip() {
        let idx = ChampIndex::from_ordered_ids(vec![10, 20, 30]).unwrap();
        assert_eq!(idx.n(), 3);
        for (i, id) in [10, 20, 30].into_iter().enumerate() {
            assert_eq!(idx.index_of(id).unwrap(), i);
            assert_eq!(idx.id_at(i), Some(id));
        }
    }

    #[test]
    fn unknown_id_is_hard_error() {
        let idx = ChampIndex::from_ordered_ids(vec![10, 20]).unwrap();
        assert!(idx.index_of(999).is_err());
    }

    #[test]
    fn duplicate_ids_rejected() {
        assert!(ChampIndex::from_ordered_ids(vec![1, 2, 1]).is_err());
    }
}
