//! Density-based spatial clustering of anomalies
//!
//! DBSCAN over raw (lat, lon) degrees with Euclidean distance. A point is a
//! core point when its neighborhood (itself included) holds at least
//! `min_samples` points; clusters grow from core points in input order, so
//! labels are deterministic for a given anomaly order.

use crate::constants::detection::{CLUSTER_MIN_SIZE, CLUSTER_RADIUS_DEG};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::storm::{Anomaly, StormCenter};
use serde::{Deserialize, Serialize};

/// Cluster assignment of a single anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterLabel {
    Noise,
    Cluster(usize),
}

impl ClusterLabel {
    /// Numeric label, with -1 for noise
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Noise => -1,
            Self::Cluster(id) => id as i64,
        }
    }

    pub fn cluster_id(self) -> Option<usize> {
        match self {
            Self::Noise => None,
            Self::Cluster(id) => Some(id),
        }
    }
}

/// DBSCAN parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan {
    /// Neighborhood radius in degrees (inclusive)
    pub eps: f64,
    /// Minimum neighborhood size for a core point
    pub min_samples: usize,
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(CLUSTER_RADIUS_DEG, CLUSTER_MIN_SIZE)
    }
}

impl Dbscan {
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    /// Check that the radius is a positive, finite number of degrees
    pub fn validate(&self) -> Result<()> {
        validate_radius(self.eps)
    }

    /// Label every point
    pub fn fit(&self, points: &[Coordinates]) -> Vec<ClusterLabel> {
        let eps_sq = self.eps * self.eps;
        let neighborhoods: Vec<Vec<usize>> = points
            .iter()
            .map(|p| {
                points
                    .iter()
                    .enumerate()
                    .filter(|(_, q)| {
                        let dlat = p.lat - q.lat;
                        let dlon = p.lon - q.lon;
                        dlat * dlat + dlon * dlon <= eps_sq
                    })
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        let is_core: Vec<bool> = neighborhoods
            .iter()
            .map(|n| n.len() >= self.min_samples)
            .collect();

        let mut labels: Vec<Option<usize>> = vec![None; points.len()];
        let mut next_label = 0;

        for seed in 0..points.len() {
            if labels[seed].is_some() || !is_core[seed] {
                continue;
            }

            labels[seed] = Some(next_label);
            let mut frontier = vec![seed];
            while let Some(p) = frontier.pop() {
                // Border points join the cluster but do not expand it
                if !is_core[p] {
                    continue;
                }
                for &q in &neighborhoods[p] {
                    if labels[q].is_none() {
                        labels[q] = Some(next_label);
                        frontier.push(q);
                    }
                }
            }
            next_label += 1;
        }

        labels
            .into_iter()
            .map(|l| l.map_or(ClusterLabel::Noise, ClusterLabel::Cluster))
            .collect()
    }
}

/// The storm candidate selected from the clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantCluster {
    pub label: usize,
    /// Indices into the clustered anomaly slice
    pub members: Vec<usize>,
    pub center: StormCenter,
    /// Maximum `max_wind` among members
    pub max_wind: f64,
    /// Minimum `intensity` among members
    pub min_pressure: f64,
}

/// Select the largest cluster; ties go to the lowest label
///
/// Membership is decided by label, never by coordinate equality, so two
/// anomalies sharing a position in different clusters cannot leak wind
/// values into each other.
///
/// Returns `None` when every anomaly is noise.
pub fn dominant_cluster(anomalies: &[Anomaly], labels: &[ClusterLabel]) -> Option<DominantCluster> {
    let cluster_count = labels.iter().filter_map(|l| l.cluster_id()).max()? + 1;

    let mut sizes = vec![0usize; cluster_count];
    for id in labels.iter().filter_map(|l| l.cluster_id()) {
        sizes[id] += 1;
    }

    let mut label = 0;
    for (id, &size) in sizes.iter().enumerate() {
        if size > sizes[label] {
            label = id;
        }
    }

    let members: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, l)| **l == ClusterLabel::Cluster(label))
        .map(|(i, _)| i)
        .collect();

    let n = members.len() as f64;
    let lat = members.iter().map(|&i| anomalies[i].lat).sum::<f64>() / n;
    let lon = members.iter().map(|&i| anomalies[i].lon).sum::<f64>() / n;
    let max_wind = members
        .iter()
        .map(|&i| anomalies[i].max_wind)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_pressure = members
        .iter()
        .map(|&i| anomalies[i].intensity)
        .fold(f64::INFINITY, f64::min);

    Some(DominantCluster {
        label,
        members,
        center: Coordinates::new(lat, lon),
        max_wind,
        min_pressure,
    })
}

/// Reject radii that cannot bound a neighborhood
pub fn validate_radius(eps: f64) -> Result<()> {
    if !eps.is_finite() || eps <= 0.0 {
        return Err(Error::Config(format!(
            "Cluster radius must be positive, got {}",
            eps
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn anomaly(lat: f64, lon: f64, wind: f64) -> Anomaly {
        Anomaly {
            lat,
            lon,
            intensity: 975.0,
            max_wind: wind,
        }
    }

    fn coords(anomalies: &[Anomaly]) -> Vec<Coordinates> {
        anomalies.iter().map(|a| a.coords()).collect()
    }

    #[test]
    fn test_square_block_forms_one_cluster() {
        let anomalies = vec![
            anomaly(14.0, 110.0, 35.0),
            anomaly(14.0, 112.0, 36.0),
            anomaly(16.0, 110.0, 38.0),
            anomaly(16.0, 112.0, 34.0),
        ];
        let labels = Dbscan::default().fit(&coords(&anomalies));

        assert!(labels.iter().all(|l| *l == ClusterLabel::Cluster(0)));

        let dominant = dominant_cluster(&anomalies, &labels).unwrap();
        assert_eq!(dominant.members, vec![0, 1, 2, 3]);
        assert_relative_eq!(dominant.center.lat, 15.0);
        assert_relative_eq!(dominant.center.lon, 111.0);
        assert_eq!(dominant.max_wind, 38.0);
        assert_eq!(dominant.min_pressure, 975.0);
    }

    #[test]
    fn test_scattered_points_are_noise() {
        let anomalies = vec![
            anomaly(10.0, 108.0, 35.0),
            anomaly(14.0, 112.0, 35.0),
            anomaly(18.0, 116.0, 35.0),
        ];
        let labels = Dbscan::default().fit(&coords(&anomalies));

        assert!(labels.iter().all(|l| *l == ClusterLabel::Noise));
        assert!(dominant_cluster(&anomalies, &labels).is_none());
    }

    #[test]
    fn test_noise_label_is_minus_one() {
        assert_eq!(ClusterLabel::Noise.as_i64(), -1);
        assert_eq!(ClusterLabel::Cluster(2).as_i64(), 2);
    }

    #[test]
    fn test_chain_with_outlier() {
        // Chain 10-12-14 along latitude: 12 is core (3 neighbors), 10 and 14 are border.
        // 16.5 is outside eps of every other point, so it stays noise.
        let anomalies = vec![
            anomaly(10.0, 110.0, 35.0),
            anomaly(12.0, 110.0, 35.0),
            anomaly(14.0, 110.0, 35.0),
            anomaly(16.5, 110.0, 35.0),
        ];
        let labels = Dbscan::default().fit(&coords(&anomalies));

        assert_eq!(labels[0], ClusterLabel::Cluster(0));
        assert_eq!(labels[1], ClusterLabel::Cluster(0));
        assert_eq!(labels[2], ClusterLabel::Cluster(0));
        assert_eq!(labels[3], ClusterLabel::Noise);
    }

    #[test]
    fn test_largest_cluster_wins() {
        let anomalies = vec![
            // Small cluster (3 in a line)
            anomaly(10.0, 108.0, 50.0),
            anomaly(10.0, 110.0, 50.0),
            anomaly(10.0, 112.0, 50.0),
            // Larger cluster (2x2 block plus one)
            anomaly(30.0, 130.0, 35.0),
            anomaly(30.0, 132.0, 36.0),
            anomaly(32.0, 130.0, 37.0),
            anomaly(32.0, 132.0, 34.0),
            anomaly(34.0, 132.0, 33.5),
        ];
        let labels = Dbscan::default().fit(&coords(&anomalies));
        let dominant = dominant_cluster(&anomalies, &labels).unwrap();

        assert_eq!(dominant.label, 1);
        assert_eq!(dominant.members.len(), 5);
        // Wind of the other cluster must not leak in
        assert_eq!(dominant.max_wind, 37.0);
    }

    #[test]
    fn test_tie_goes_to_lowest_label() {
        let anomalies = vec![
            anomaly(30.0, 130.0, 40.0),
            anomaly(30.0, 132.0, 40.0),
            anomaly(30.0, 134.0, 40.0),
            anomaly(10.0, 108.0, 35.0),
            anomaly(10.0, 110.0, 35.0),
            anomaly(10.0, 112.0, 35.0),
        ];
        let labels = Dbscan::default().fit(&coords(&anomalies));
        let dominant = dominant_cluster(&anomalies, &labels).unwrap();

        assert_eq!(dominant.label, 0);
        assert_relative_eq!(dominant.center.lat, 30.0);
        assert_eq!(dominant.max_wind, 40.0);
    }

    #[test]
    fn test_center_lies_within_member_extent() {
        let anomalies = vec![
            anomaly(11.0, 109.5, 35.0),
            anomaly(12.0, 110.0, 35.0),
            anomaly(12.5, 111.0, 35.0),
            anomaly(13.0, 110.5, 35.0),
        ];
        let labels = Dbscan::default().fit(&coords(&anomalies));
        let dominant = dominant_cluster(&anomalies, &labels).unwrap();

        let lats: Vec<f64> = dominant.members.iter().map(|&i| anomalies[i].lat).collect();
        let lons: Vec<f64> = dominant.members.iter().map(|&i| anomalies[i].lon).collect();
        let within = |v: f64, vs: &[f64]| {
            v >= vs.iter().cloned().fold(f64::INFINITY, f64::min)
                && v <= vs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
        };
        assert!(within(dominant.center.lat, &lats));
        assert!(within(dominant.center.lon, &lons));
    }

    #[test]
    fn test_empty_input() {
        let labels = Dbscan::default().fit(&[]);
        assert!(labels.is_empty());
        assert!(dominant_cluster(&[], &labels).is_none());
    }

    #[test]
    fn test_radius_must_be_positive() {
        assert!(Dbscan::default().validate().is_ok());
        assert!(Dbscan::new(-2.0, 3).validate().is_err());
        assert!(Dbscan::new(0.0, 3).validate().is_err());
        assert!(Dbscan::new(f64::NAN, 3).validate().is_err());
        assert!(Dbscan::new(f64::INFINITY, 3).validate().is_err());
    }
}
