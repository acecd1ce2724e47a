/// Summary of one completed refresh, returned for logging/diagnostics.
/// Carries counts rather than the rebuilt data itself — callers that need
/// the data read it back from the engine or the meta snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub matches_considered: usize,
    pub history_tier_groups_rebuilt: usize,
    pub asset_bundles_rebuilt: usize,
    pub meta_patches_rebuilt: usize,
}
