use draftlab_champions::AttributeMap;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_core::Tier;
use draftlab_features::FeatureMode;
use draftlab_records::Draft;
use draftlab_records::EMPTY_BAN;

/// Same-team duo pairs used by the rich mode's compact duo block (mirrors
/// `draftlab_features::assemble`'s private `DUOS` constant — spec.md §4.4
/// block 6a).
const DUOS: [(Role, Role); 3] = [
    (Role::Top, Role::Jungle),
    (Role::Mid, Role::Jungle),
    (Role::Adc, Role::Support),
];

/// Builds a human-readable label for every index of the vector
/// `draftlab_features::assemble` would produce for the same inputs, in
/// the same order, so a classifier's per-feature contribution can be
/// reported back as "blue top pick" rather than a bare index (spec.md
/// §4.8 "explanations"). Onehot blocks are mostly zero; this labels only
/// the slot each came from, since a one-hot's contribution is only ever
/// nonzero at the champion actually occupying that slot.
pub fn label_vector(mode: FeatureMode, attributes: &AttributeMap, draft: &Draft, d: usize) -> Vec<String> {
    let n = attributes.n();
    let mut labels = Vec::new();

    for side in [Side::Blue, Side::Red] {
        for role in Role::ALL {
            push_onehot_labels(&mut labels, attributes, n, format!("{side:?}_{role}_pick").to_lowercase());
        }
    }
    for side in [Side::Blue, Side::Red] {
        for slot in 0..5 {
            push_onehot_labels(&mut labels, attributes, n, format!("{side:?}_ban_{slot}").to_lowercase());
        }
    }

    for side_name in ["blue", "red"] {
        for field in [
            "ap_ad_ratio",
            "engage_sum",
            "cc_sum",
            "poke_sum",
            "splitpush_sum",
            "frontline_sum",
            "skill_cap_sum",
            "scaling_early_sum",
            "scaling_mid_sum",
            "scaling_late_sum",
            "role_balance",
        ] {
            labels.push(format!("{side_name}_{field}"));
        }
    }
    for field in [
        "engage_sum",
        "cc_sum",
        "poke_sum",
        "splitpush_sum",
        "frontline_sum",
        "skill_cap_sum",
        "scaling_early_sum",
        "scaling_mid_sum",
    ] {
        labels.push(format!("diff_{field}"));
    }

    labels.push("patch_season".to_string());
    labels.push("patch_minor".to_string());

    for t in Tier::ALL {
        labels.push(format!("tier_{t:?}").to_lowercase());
    }

    match mode {
        FeatureMode::Basic => {
            labels.push("synergy_blue".to_string());
            labels.push("synergy_red".to_string());
            labels.push("counter_advantage".to_string());
        }
        FeatureMode::Rich => {
            for side in [Side::Blue, Side::Red] {
                for (a, b) in DUOS {
                    let side = format!("{side:?}").to_lowercase();
                    labels.push(format!("{side}_{a}_{b}_index").to_lowercase());
                    labels.push(format!("{side}_{b}_{a}_index").to_lowercase());
                    labels.push(format!("{side}_{a}_{b}_both_present").to_lowercase());
                }
            }
            for role in Role::ALL {
                labels.push(format!("matchup_{role}").to_lowercase());
            }
            for side in [Side::Blue, Side::Red] {
                let side = format!("{side:?}").to_lowercase();
                labels.push(format!("{side}_mean_winrate"));
                labels.push(format!("{side}_mean_pickrate"));
                labels.push(format!("{side}_mean_trend"));
            }
            for side in [Side::Blue, Side::Red] {
                let side = format!("{side:?}").to_lowercase();
                for i in 0..d {
                    labels.push(format!("{side}_embedding_dim_{i}"));
                }
            }
            for side in [Side::Blue, Side::Red] {
                let side = format!("{side:?}").to_lowercase();
                labels.push(format!("{side}_ban_threat"));
                labels.push(format!("{side}_comfort_removal"));
            }
        }
    }

    for field in ["objective_ap_ad_ratio", "objective_engage_score", "objective_splitpush_score", "objective_teamfight_synergy"] {
        labels.push(field.to_string());
    }

    let _ = draft;
    labels
}

fn push_onehot_labels(labels: &mut Vec<String>, attributes: &AttributeMap, n: usize, slot: String) {
    for i in 0..n {
        let champ = attributes.index().id_at(i).unwrap_or(EMPTY_BAN);
        labels.push(format!("{slot}={champ}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_champions::AttributeMap;
    use draftlab_core::Damage;

    fn attrs(n: usize) -> AttributeMap {
        let mut champions = serde_json::Map::new();
        let mut champ_index = Vec::new();
        for i in 1..=n {
            champ_index.push(i.to_string());
            champions.insert(
                i.to_string(),
                serde_json::json!({
                    "role": "top", "damage": if i % 2 == 0 { Damage::Ap } else { Damage::Ad },
                    "engage": 1, "hard_cc": 1, "poke": 1, "splitpush": 1, "frontline": 1,
                    "skill_cap": 2, "scaling_early": 1, "scaling_mid": 2, "scaling_late": 2,
                }),
            );
        }
        let bytes = serde_json::to_vec(&serde_json::json!({
            "champions": champions,
            "champ_index": champ_index,
            "meta": { "patch": "15.1", "generated_at_unix": 0, "total_champions": n },
        }))
        .unwrap();
        AttributeMap::from_json(&bytes).unwrap()
    }

    #[test]
    fn label_count_matches_basic_feature_dim() {
        let attributes = attrs(20);
        let draft = Draft::empty();
        let labels = label_vector(FeatureMode::Basic, &attributes, &draft, 0);
        assert_eq!(labels.len(), draftlab_features::feature_dim(FeatureMode::Basic, 20, 0));
    }

    #[test]
    fn label_count_matches_rich_feature_dim() {
        let attributes = attrs(20);
        let draft = Draft::empty();
        let labels = label_vector(FeatureMode::Rich, &attributes, &draft, 32);
        assert_eq!(labels.len(), draftlab_features::feature_dim(FeatureMode::Rich, 20, 32));
    }
}
