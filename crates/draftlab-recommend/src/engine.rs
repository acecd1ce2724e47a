use crate::candidate::RecommendationResult;
use crate::candidate::RecommendedCandidate;
use crate::reason::generate_reasons;
use draftlab_core::Config;
use draftlab_core::DraftMlError;
use draftlab_core::Patch;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_core::Tier;
use draftlab_infer::canonical_key;
use draftlab_infer::InferenceEngine;
use draftlab_infer::ResultCache;
use draftlab_records::Draft;
use draftlab_records::EMPTY_BAN;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// Ranks pick/ban candidates by re-invoking the inference engine on a
/// tentatively-completed draft per candidate (spec.md §4.9). Built on top
/// of [`InferenceEngine`] rather than reimplementing artifact lookup —
/// the recommendation engine never scores a model directly.
pub struct RecommendationEngine {
    infer: Arc<InferenceEngine>,
    config: Config,
    cache: ResultCache<RecommendationResult>,
}

impl RecommendationEngine {
    pub fn new(infer: Arc<InferenceEngine>, config: Config) -> Self {
        let cache = ResultCache::new(config.cache_ttl_seconds);
        Self { infer, config, cache }
    }

    pub fn recommend_picks(
        &self,
        draft: &Draft,
        tier: Tier,
        patch: Patch,
        side: Side,
        role: Role,
        top_n: Option<usize>,
    ) -> Result<RecommendationResult, DraftMlError> {
        let top_n = top_n.unwrap_or(self.config.recommend_top_n);
        let key = canonical_key(
            &format!("{}-pick-{}-{}-{}", tier.group(), side.opponent(), role, top_n),
            &patch.to_string(),
            &draft.blue_picks,
            &draft.red_picks,
            &draft.blue_bans,
            &draft.red_bans,
            &[],
        );
        if let Some(hit) = self.cache.get(key) {
            return Ok(hit);
        }

        let baseline = self.infer.predict(draft, tier, patch, None)?.blue_win_prob_raw;
        let occupied = draft.occupied();
        let attributes = self.infer.attributes();
        let assets = self.infer.assets_for(tier.group(), patch);
        let opponent_pick = draft.pick_at(side.opponent(), role);

        let candidates: Vec<_> = attributes
            .index()
            .ids()
            .iter()
            .copied()
            .filter(|id| !occupied.contains(id))
            .filter_map(|id| attributes.get(id).ok().map(|a| (id, *a)))
            .filter(|(_, a)| a.role == role)
            .take(self.config.recommend_pick_cap)
            .collect();

        let deadline = Instant::now() + Duration::from_secs_f32(self.config.request_deadline_seconds);
        let mut scored = Vec::with_capacity(candidates.len());
        let mut partial = false;
        for (id, attrs) in candidates {
            if Instant::now() >= deadline {
                partial = true;
                break;
            }
            let mut tentative = *draft;
            tentative.picks_mut(side)[role.index()] = id;
            let p_with = self.infer.predict(&tentative, tier, patch, None)?.blue_win_prob_raw;
            let mut delta = p_with - baseline;
            if side == Side::Red {
                delta = -delta;
            }
            let score = delta + tier.group().skill_bias() * attrs.skill_cap as f32;
            let reasons = generate_reasons(
                attributes,
                draft.picks(side),
                attrs,
                assets.as_deref(),
                side,
                role,
                id,
                opponent_pick,
            );
            scored.push(RecommendedCandidate { champion_id: id, delta, score, reasons });
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        scored.truncate(top_n);
        let result = RecommendationResult { candidates: scored, partial };
        self.cache.put(key, result.clone());
        Ok(result)
    }

    pub fn recommend_bans(
        &self,
        draft: &Draft,
        tier: Tier,
        patch: Patch,
        side: Side,
        top_n: Option<usize>,
    ) -> Result<RecommendationResult, DraftMlError> {
        let top_n = top_n.unwrap_or(self.config.recommend_top_n);
        let key = canonical_key(
            &format!("{}-ban-{}-{}", tier.group(), side, top_n),
            &patch.to_string(),
            &draft.blue_picks,
            &draft.red_picks,
            &draft.blue_bans,
            &draft.red_bans,
            &[],
        );
        if let Some(hit) = self.cache.get(key) {
            return Ok(hit);
        }

        let baseline = self.infer.predict(draft, tier, patch, None)?.blue_win_prob_raw;
        let occupied = draft.occupied();
        let attributes = self.infer.attributes();
        let assets = self.infer.assets_for(tier.group(), patch);
        let opponent_side = side.opponent();

        let candidates: Vec<_> = attributes
            .index()
            .ids()
            .iter()
            .copied()
            .filter(|id| !occupied.contains(id))
            .filter_map(|id| attributes.get(id).ok().map(|a| (id, *a)))
            .filter(|(_, a)| draft.pick_at(opponent_side, a.role) == EMPTY_BAN)
            .take(self.config.recommend_ban_cap)
            .collect();

        let deadline = Instant::now() + Duration::from_secs_f32(self.config.request_deadline_seconds);
        let mut scored = Vec::with_capacity(candidates.len());
        let mut partial = false;
        for (id, attrs) in candidates {
            if Instant::now() >= deadline {
                partial = true;
                break;
            }
            let mut tentative = *draft;
            tentative.picks_mut(opponent_side)[attrs.role.index()] = id;
            let p_with = self.infer.predict(&tentative, tier, patch, None)?.blue_win_prob_raw;
            let mut opponent_delta = p_with - baseline;
            if opponent_side == Side::Red {
                opponent_delta = -opponent_delta;
            }
            let score = opponent_delta + tier.group().skill_bias() * attrs.skill_cap as f32;
            let reasons = generate_reasons(
                attributes,
                draft.picks(opponent_side),
                attrs,
                assets.as_deref(),
                opponent_side,
                attrs.role,
                id,
                draft.pick_at(side, attrs.role),
            );
            scored.push(RecommendedCandidate { champion_id: id, delta: opponent_delta, score, reasons });
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        scored.truncate(top_n);
        let result = RecommendationResult { candidates: scored, partial };
        self.cache.put(key, result.clone());
        Ok(result)
    }
}
