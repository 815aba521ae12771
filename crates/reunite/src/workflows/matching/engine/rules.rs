use super::super::domain::{ClothingItem, Location, PhysicalTrait};
use super::super::geo;
use super::config::MatchingConfig;

pub(crate) const SAME_STATE_LABEL: &str = "Same state";
pub(crate) const SAME_MUNICIPALITY_LABEL: &str = "Same municipality";

/// Location portion of a score: proximity tier plus exact state/municipality
/// equality. The bonuses are additive and independent of one another.
pub(crate) fn location_score(
    config: &MatchingConfig,
    source: &Location,
    candidate: &Location,
) -> (i32, Vec<String>) {
    let mut total = 0;
    let mut criteria = Vec::new();

    if let Some((points, label)) = geo::proximity_signal(config, source, candidate) {
        total += points;
        criteria.push(label.to_string());
    }

    if !source.state.trim().is_empty() && source.state == candidate.state {
        total += config.same_state_points;
        criteria.push(SAME_STATE_LABEL.to_string());
    }

    if !source.municipality.trim().is_empty() && source.municipality == candidate.municipality {
        total += config.same_municipality_points;
        criteria.push(SAME_MUNICIPALITY_LABEL.to_string());
    }

    (total, criteria)
}

/// Score physical traits: every source trait matched by a candidate trait
/// with the same body part and (case-insensitively) the same trait type earns
/// the per-direction weight. A single candidate trait may satisfy several
/// source traits.
pub(crate) fn trait_score(
    points_per_match: i32,
    source: &[PhysicalTrait],
    candidate: &[PhysicalTrait],
) -> (i32, Vec<String>) {
    let mut total = 0;
    let mut criteria = Vec::new();

    for wanted in source {
        let satisfied = candidate.iter().any(|seen| {
            seen.body_part.id == wanted.body_part.id
                && seen.trait_type.to_lowercase() == wanted.trait_type.to_lowercase()
        });
        if satisfied {
            total += points_per_match;
            criteria.push(format!(
                "Matching physical trait: {}",
                wanted.body_part.name
            ));
        }
    }

    (total, criteria)
}

/// Score clothing: garment types must match; when the source specifies a
/// color the candidate's color must match it case-insensitively, otherwise
/// garment type alone is enough.
pub(crate) fn clothing_score(
    points_per_match: i32,
    source: &[ClothingItem],
    candidate: &[ClothingItem],
) -> (i32, Vec<String>) {
    let mut total = 0;
    let mut criteria = Vec::new();

    for wanted in source {
        let satisfied = candidate.iter().any(|seen| {
            if seen.garment.id != wanted.garment.id {
                return false;
            }
            match wanted.color.as_deref() {
                Some(color) if !color.trim().is_empty() => seen
                    .color
                    .as_deref()
                    .map(|candidate_color| candidate_color.to_lowercase() == color.to_lowercase())
                    .unwrap_or(false),
                _ => true,
            }
        });
        if satisfied {
            total += points_per_match;
            criteria.push(format!("Matching clothing: {}", wanted.garment.name));
        }
    }

    (total, criteria)
}
