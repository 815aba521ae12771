use super::domain::Location;
use super::engine::MatchingConfig;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const PROXIMITY_CLOSE_LABEL: &str = "Geographic proximity (<10km)";
pub const PROXIMITY_NEAR_LABEL: &str = "Geographic proximity (<50km)";

/// Great-circle distance between two coordinates using the Haversine formula.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * half_chord.sqrt().asin()
}

/// Classify the distance between two record locations into a proximity tier.
/// Either side missing a coordinate yields no signal rather than an error.
pub(crate) fn proximity_signal(
    config: &MatchingConfig,
    source: &Location,
    candidate: &Location,
) -> Option<(i32, &'static str)> {
    let (Some(from_lat), Some(from_lon)) = (source.latitude, source.longitude) else {
        return None;
    };
    let (Some(to_lat), Some(to_lon)) = (candidate.latitude, candidate.longitude) else {
        return None;
    };

    let distance = distance_km(from_lat, from_lon, to_lat, to_lon);
    if distance <= config.close_radius_km {
        Some((config.close_proximity_points, PROXIMITY_CLOSE_LABEL))
    } else if distance <= config.near_radius_km {
        Some((config.near_proximity_points, PROXIMITY_NEAR_LABEL))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_coordinates_are_zero_distance() {
        let distance = distance_km(19.4326, -99.1332, 19.4326, -99.1332);
        assert!(distance.abs() < 1e-9);
    }

    #[test]
    fn cdmx_to_guadalajara_is_roughly_460km() {
        let distance = distance_km(19.4326, -99.1332, 20.6597, -103.3496);
        assert!((440.0..480.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn zero_distance_lands_in_the_close_tier() {
        let config = MatchingConfig::default();
        let here = location_at(Some(19.4326), Some(-99.1332));
        let signal = proximity_signal(&config, &here, &here);
        assert_eq!(
            signal,
            Some((config.close_proximity_points, PROXIMITY_CLOSE_LABEL))
        );
    }

    #[test]
    fn missing_coordinates_produce_no_signal() {
        let config = MatchingConfig::default();
        let here = location_at(Some(19.4326), Some(-99.1332));
        let nowhere = location_at(None, None);
        assert_eq!(proximity_signal(&config, &here, &nowhere), None);
        assert_eq!(proximity_signal(&config, &nowhere, &here), None);
    }

    fn location_at(latitude: Option<f64>, longitude: Option<f64>) -> Location {
        Location {
            state: "Ciudad de México".to_string(),
            municipality: "Cuauhtémoc".to_string(),
            locality: "Centro".to_string(),
            street: None,
            reference_notes: None,
            postal_code: None,
            latitude,
            longitude,
        }
    }
}
