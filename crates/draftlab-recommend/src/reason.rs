use draftlab_assets::AssetBundle;
use draftlab_champions::AttributeMap;
use draftlab_champions::ChampionAttributes;
use draftlab_core::ChampionId;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_records::EMPTY_BAN;

const TAG_THRESHOLD: u8 = 2;
const BALANCE_SKEW_THRESHOLD: f32 = 1.0;
const MATCHUP_NOTABLE_THRESHOLD: f32 = 0.1;

/// Human-readable reasons for one candidate (spec.md §4.9 step 6):
/// attribute tags, an AP/AD balance note, and — when assets are loaded —
/// a lane matchup summary against the role's direct opponent.
pub fn generate_reasons(
    attributes: &AttributeMap,
    own_team_before: &[ChampionId; 5],
    candidate: ChampionAttributes,
    assets: Option<&AssetBundle>,
    side: Side,
    role: Role,
    candidate_id: ChampionId,
    opponent_id: ChampionId,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if candidate.engage >= TAG_THRESHOLD {
        reasons.push("adds engage".to_string());
    }
    if candidate.hard_cc >= TAG_THRESHOLD {
        reasons.push("adds hard crowd control".to_string());
    }
    if candidate.poke >= TAG_THRESHOLD {
        reasons.push("adds poke damage".to_string());
    }
    if candidate.splitpush >= TAG_THRESHOLD {
        reasons.push("threatens a side lane".to_string());
    }
    if candidate.frontline >= TAG_THRESHOLD {
        reasons.push("adds frontline presence".to_string());
    }

    let team_sum: f32 = own_team_before
        .iter()
        .filter_map(|&id| attributes.get(id).ok())
        .map(|a| a.ap_ad_signed())
        .sum();
    let candidate_signed = candidate.ap_ad_signed();
    if team_sum.abs() >= BALANCE_SKEW_THRESHOLD && candidate_signed * team_sum < 0.0 {
        reasons.push("improves team damage-type balance".to_string());
    }

    if let (Some(assets), true) = (assets, opponent_id != EMPTY_BAN) {
        let index = attributes.index();
        if let (Ok(candidate_idx), Ok(opponent_idx)) = (index.index_of(candidate_id), index.index_of(opponent_id)) {
            if candidate_idx < assets.matchup.n && opponent_idx < assets.matchup.n {
                let advantage = match side {
                    Side::Blue => assets.matchup.advantage(role, candidate_idx, opponent_idx),
                    Side::Red => -assets.matchup.advantage(role, opponent_idx, candidate_idx),
                };
                if advantage >= MATCHUP_NOTABLE_THRESHOLD {
                    reasons.push(format!("favored lane matchup in {role}"));
                } else if advantage <= -MATCHUP_NOTABLE_THRESHOLD {
                    reasons.push(format!("a difficult lane matchup in {role}"));
                }
            }
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::Damage;

    fn attrs(overrides: impl Fn(&mut ChampionAttributes)) -> ChampionAttributes {
        let mut a = ChampionAttributes {
            role: Role::Top,
            damage: Damage::Ad,
            engage: 0,
            hard_cc: 0,
            poke: 0,
            splitpush: 0,
            frontline: 0,
            skill_cap: 0,
            scaling_early: 0,
            scaling_mid: 0,
            scaling_late: 0,
        };
        overrides(&mut a);
        a
    }

    #[test]
    fn high_engage_tag_surfaces_a_reason() {
        let bytes = serde_json::to_vec(&serde_json::json!({
            "champions": {},
            "champ_index": [],
            "meta": { "patch": "15.1", "generated_at_unix": 0, "total_champions": 0 },
        }))
        .unwrap();
        let attributes = AttributeMap::from_json(&bytes).unwrap();
        let candidate = attrs(|a| a.engage = 3);
        let reasons = generate_reasons(&attributes, &[-1; 5], candidate, None, Side::Blue, Role::Top, 1, -1);
        assert!(reasons.iter().any(|r| r == "adds engage"));
    }

    #[test]
    fn low_tags_produce_no_reasons() {
        let bytes = serde_json::to_vec(&serde_json::json!({
            "champions": {},
            "champ_index": [],
            "meta": { "patch": "15.1", "generated_at_unix": 0, "total_champions": 0 },
        }))
        .unwrap();
        let attributes = AttributeMap::from_json(&bytes).unwrap();
        let candidate = attrs(|_| {});
        let reasons = generate_reasons(&attributes, &[-1; 5], candidate, None, Side::Blue, Role::Top, 1, -1);
        assert!(reasons.is_empty());
    }
}
