use crate::feature_dim;
use crate::FeatureMode;
use draftlab_assets::AssetBundle;
use draftlab_champions::AttributeMap;
use draftlab_champions::ChampionAttributes;
use draftlab_core::ChampionId;
use draftlab_core::Config;
use draftlab_core::Patch;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_core::Tier;
use draftlab_history::HistoryIndex;
use draftlab_records::Draft;
use draftlab_records::DerivedFeatures;
use draftlab_records::EMPTY_BAN;
use std::collections::HashMap;

/// Implementer aid only (spec.md §4.4): scalar features keyed by name,
/// for explanations and tests. Never consumed by a classifier.
pub type NamedFeatures = HashMap<String, f32>;

/// Same-team duo role pairs used by the rich mode's compact duo encoding
/// (spec.md §4.4 block 6a).
const DUOS: [(Role, Role); 3] = [
    (Role::Top, Role::Jungle),
    (Role::Mid, Role::Jungle),
    (Role::Adc, Role::Support),
];

/// Assembles one fixed-length feature vector from a draft (spec.md §4.4).
/// Pure and deterministic: no I/O, no logging, the same inputs always
/// produce the same output. Picks equal to [`EMPTY_BAN`] are treated like
/// empty ban slots — an all-zero one-hot contribution — which lets the
/// recommendation engine assemble a *partial* draft by leaving
/// not-yet-decided slots at the sentinel.
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    draft: &Draft,
    tier: Tier,
    patch: Patch,
    derived: Option<DerivedFeatures>,
    attributes: &AttributeMap,
    history: Option<&HistoryIndex>,
    assets: Option<&AssetBundle>,
    mode: FeatureMode,
    config: &Config,
) -> (Vec<f32>, NamedFeatures) {
    let n = attributes.n();
    let d = assets.map(|a| a.embedding.d).unwrap_or(0);
    let mut v = Vec::with_capacity(feature_dim(mode, n, d));
    let mut named = NamedFeatures::new();

    push_role_onehots(&mut v, draft, attributes, Side::Blue);
    push_role_onehots(&mut v, draft, attributes, Side::Red);
    push_ban_onehots(&mut v, draft, attributes, Side::Blue);
    push_ban_onehots(&mut v, draft, attributes, Side::Red);

    push_composition_block(&mut v, &mut named, draft, attributes);

    let season = patch.season_feature(config.reference_season);
    let minor = patch.minor_feature();
    v.push(season);
    v.push(minor);
    named.insert("patch_season".to_string(), season);
    named.insert("patch_minor".to_string(), minor);

    for t in Tier::ALL {
        v.push(if t == tier { 1.0 } else { 0.0 });
    }

    match mode {
        FeatureMode::Basic => push_history_block(&mut v, &mut named, draft, history, config),
        FeatureMode::Rich => push_rich_block(&mut v, &mut named, draft, attributes, assets, config),
    }

    push_objectives_block(&mut v, &mut named, derived);

    for x in v.iter_mut() {
        if !x.is_finite() {
            *x = 0.0;
        }
    }

    debug_assert_eq!(v.len(), feature_dim(mode, n, d));
    (v, named)
}

fn push_role_onehots(v: &mut Vec<f32>, draft: &Draft, attributes: &AttributeMap, side: Side) {
    for &champ in draft.picks(side) {
        push_onehot(v, attributes, champ);
    }
}

fn push_ban_onehots(v: &mut Vec<f32>, draft: &Draft, attributes: &AttributeMap, side: Side) {
    for &champ in draft.bans(side) {
        push_onehot(v, attributes, champ);
    }
}

fn push_onehot(v: &mut Vec<f32>, attributes: &AttributeMap, champ: ChampionId) {
    let n = attributes.n();
    let start = v.len();
    v.resize(start + n, 0.0);
    if champ == EMPTY_BAN {
        return;
    }
    let idx = attributes.index().index_of(champ).expect("known champion id in draft");
    v[start + idx] = 1.0;
}

/// Per-team composition scores, in the fixed order the `named` dict and
/// the diff block below both rely on.
struct Composition {
    ap_ad_ratio: f32,
    engage_sum: f32,
    cc_sum: f32,
    poke_sum: f32,
    splitpush_sum: f32,
    frontline_sum: f32,
    skill_cap_sum: f32,
    scaling_early_sum: f32,
    scaling_mid_sum: f32,
    scaling_late_sum: f32,
    role_balance: f32,
}

fn composition_for(attributes: &AttributeMap, picks: &[ChampionId; 5]) -> Composition {
    let attrs: Vec<ChampionAttributes> =
        picks.iter().filter(|&&id| id != EMPTY_BAN).filter_map(|&id| attributes.get(id).ok().copied()).collect();
    let sum_ord = |f: fn(&ChampionAttributes) -> u8| attrs.iter().map(|a| f(a) as f32).sum::<f32>();

    let mut present_roles = std::collections::HashSet::new();
    for a in &attrs {
        present_roles.insert(a.role);
    }
    let role_balance = 1.0 - (5 - present_roles.len()) as f32 / 5.0;

    Composition {
        ap_ad_ratio: attrs.iter().map(|a| a.ap_ad_signed()).sum::<f32>() / 5.0,
        engage_sum: sum_ord(|a| a.engage),
        cc_sum: sum_ord(|a| a.hard_cc),
        poke_sum: sum_ord(|a| a.poke),
        splitpush_sum: sum_ord(|a| a.splitpush),
        frontline_sum: sum_ord(|a| a.frontline),
        skill_cap_sum: sum_ord(|a| a.skill_cap),
        scaling_early_sum: sum_ord(|a| a.scaling_early),
        scaling_mid_sum: sum_ord(|a| a.scaling_mid),
        scaling_late_sum: sum_ord(|a| a.scaling_late),
        role_balance,
    }
}

fn push_composition_block(v: &mut Vec<f32>, named: &mut NamedFeatures, draft: &Draft, attributes: &AttributeMap) {
    let blue = composition_for(attributes, draft.picks(Side::Blue));
    let red = composition_for(attributes, draft.picks(Side::Red));

    for (side_name, c) in [("blue", &blue), ("red", &red)] {
        let fields = [
            ("ap_ad_ratio", c.ap_ad_ratio),
            ("engage_sum", c.engage_sum),
            ("cc_sum", c.cc_sum),
            ("poke_sum", c.poke_sum),
            ("splitpush_sum", c.splitpush_sum),
            ("frontline_sum", c.frontline_sum),
            ("skill_cap_sum", c.skill_cap_sum),
            ("scaling_early_sum", c.scaling_early_sum),
            ("scaling_mid_sum", c.scaling_mid_sum),
            ("scaling_late_sum", c.scaling_late_sum),
            ("role_balance", c.role_balance),
        ];
        for (name, value) in fields {
            v.push(value);
            named.insert(format!("{side_name}_{name}"), value);
        }
    }

    // Diffs for the eight aggregate "_sum" scores: the per-team score isn't
    // comparable across a ratio or a [0,1] fraction, so ap_ad_ratio,
    // scaling_late_sum, and role_balance are left out of the diff block.
    let diffs = [
        ("engage_sum", blue.engage_sum - red.engage_sum),
        ("cc_sum", blue.cc_sum - red.cc_sum),
        ("poke_sum", blue.poke_sum - red.poke_sum),
        ("splitpush_sum", blue.splitpush_sum - red.splitpush_sum),
        ("frontline_sum", blue.frontline_sum - red.frontline_sum),
        ("skill_cap_sum", blue.skill_cap_sum - red.skill_cap_sum),
        ("scaling_early_sum", blue.scaling_early_sum - red.scaling_early_sum),
        ("scaling_mid_sum", blue.scaling_mid_sum - red.scaling_mid_sum),
    ];
    for (name, value) in diffs {
        v.push(value);
        named.insert(format!("diff_{name}"), value);
    }
}

fn push_history_block(
    v: &mut Vec<f32>,
    named: &mut NamedFeatures,
    draft: &Draft,
    history: Option<&HistoryIndex>,
    config: &Config,
) {
    let (synergy_blue, synergy_red, counter) = match history {
        Some(h) => (
            h.synergy(draft.picks(Side::Blue), config),
            h.synergy(draft.picks(Side::Red), config),
            h.counter_advantage(draft.picks(Side::Blue), draft.picks(Side::Red), config),
        ),
        None => (0.0, 0.0, 0.0),
    };
    v.push(synergy_blue);
    v.push(synergy_red);
    v.push(counter);
    named.insert("synergy_blue".to_string(), synergy_blue);
    named.insert("synergy_red".to_string(), synergy_red);
    named.insert("counter_advantage".to_string(), counter);
}

fn push_rich_block(
    v: &mut Vec<f32>,
    named: &mut NamedFeatures,
    draft: &Draft,
    attributes: &AttributeMap,
    assets: Option<&AssetBundle>,
    config: &Config,
) {
    let n = attributes.n().max(1);

    // 6a. Compact duo encoding.
    for side in [Side::Blue, Side::Red] {
        let picks = draft.picks(side);
        for (role_a, role_b) in DUOS {
            let champ_a = picks[role_a.index()];
            let champ_b = picks[role_b.index()];
            let idx_a = attributes.index().index_of(champ_a).ok();
            let idx_b = attributes.index().index_of(champ_b).ok();
            let a_frac = idx_a.map(|i| i as f32 / n as f32).unwrap_or(0.0);
            let b_frac = idx_b.map(|i| i as f32 / n as f32).unwrap_or(0.0);
            let both = if idx_a.is_some() && idx_b.is_some() { 1.0 } else { 0.0 };
            v.push(a_frac);
            v.push(b_frac);
            v.push(both);
        }
    }

    // 6b. Lane matchup scores.
    for role in Role::ALL {
        let blue_champ = draft.pick_at(Side::Blue, role);
        let red_champ = draft.pick_at(Side::Red, role);
        let score = assets
            .and_then(|a| {
                if blue_champ == EMPTY_BAN || red_champ == EMPTY_BAN {
                    return None;
                }
                let bi = attributes.index().index_of(blue_champ).ok()?;
                let ri = attributes.index().index_of(red_champ).ok()?;
                if bi >= a.matchup.n || ri >= a.matchup.n {
                    return None;
                }
                Some(a.matchup.advantage(role, bi, ri))
            })
            .unwrap_or(0.0);
        v.push(score);
        named.insert(format!("matchup_{role}"), score);
    }

    // 6c. Meta priors.
    for side in [Side::Blue, Side::Red] {
        let (mean_winrate, mean_pickrate, mean_trend) = mean_priors(assets, draft.picks(side));
        v.push(mean_winrate);
        v.push(mean_pickrate);
        v.push(mean_trend);
    }

    // 6d. Team embedding sum.
    let d = assets.map(|a| a.embedding.d).unwrap_or(0);
    for side in [Side::Blue, Side::Red] {
        let sum = embedding_sum(assets, attributes, draft.picks(side), d);
        v.extend(sum);
    }

    // 6e. Ban context.
    for side in [Side::Blue, Side::Red] {
        let ban_threat = sum_relative_winrate(assets, draft.bans(side.opponent()));
        let comfort_removal = sum_relative_winrate(assets, draft.bans(side));
        v.push(ban_threat);
        v.push(comfort_removal);
        named.insert(format!("{side:?}_ban_threat").to_lowercase(), ban_threat);
        named.insert(format!("{side:?}_comfort_removal").to_lowercase(), comfort_removal);
    }

    let _ = config;
}

fn mean_priors(assets: Option<&AssetBundle>, picks: &[ChampionId; 5]) -> (f32, f32, f32) {
    let Some(assets) = assets else { return (0.0, 0.0, 0.0) };
    let values: Vec<_> = picks.iter().filter(|&&id| id != EMPTY_BAN).filter_map(|id| assets.priors.get(id)).collect();
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let len = values.len() as f32;
    let winrate = values.iter().map(|p| p.base_winrate).sum::<f32>() / len;
    let pickrate = values.iter().map(|p| p.pick_rate).sum::<f32>() / len;
    let trend = values.iter().map(|p| p.trend_3patch).sum::<f32>() / len;
    (winrate, pickrate, trend)
}

fn embedding_sum(assets: Option<&AssetBundle>, attributes: &AttributeMap, picks: &[ChampionId; 5], d: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; d];
    let Some(assets) = assets else { return sum };
    for &champ in picks.iter().filter(|&&id| id != EMPTY_BAN) {
        if let Ok(idx) = attributes.index().index_of(champ) {
            if idx < assets.embedding.n {
                for (s, x) in sum.iter_mut().zip(assets.embedding.row(idx)) {
                    *s += x;
                }
            }
        }
    }
    sum
}

fn sum_relative_winrate(assets: Option<&AssetBundle>, champs: &[ChampionId; 5]) -> f32 {
    let Some(assets) = assets else { return 0.0 };
    champs
        .iter()
        .filter(|&&id| id != EMPTY_BAN)
        .filter_map(|id| assets.priors.get(id))
        .map(|p| p.base_winrate - 0.5)
        .sum()
}

fn push_objectives_block(v: &mut Vec<f32>, named: &mut NamedFeatures, derived: Option<DerivedFeatures>) {
    let d = derived.unwrap_or(DerivedFeatures {
        ap_ad_ratio: 0.0,
        engage_score: 0.0,
        splitpush_score: 0.0,
        teamfight_synergy: 0.0,
    });
    v.push(d.ap_ad_ratio);
    v.push(d.engage_score);
    v.push(d.splitpush_score);
    v.push(d.teamfight_synergy);
    named.insert("objective_ap_ad_ratio".to_string(), d.ap_ad_ratio);
    named.insert("objective_engage_score".to_string(), d.engage_score);
    named.insert("objective_splitpush_score".to_string(), d.splitpush_score);
    named.insert("objective_teamfight_synergy".to_string(), d.teamfight_synergy);
}
