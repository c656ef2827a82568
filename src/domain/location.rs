//! Geographic fixes and the distance filter.
//!
//! A fix is "useful" when the device has moved far enough from the last saved
//! location to warrant capturing a new photo. The decision is a pure function of
//! the two locations and a displacement threshold.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Minimum great-circle displacement, in meters, for a fix to be useful.
pub const DEFAULT_MIN_DISPLACEMENT_METERS: f64 = 100.0;

/// A single location fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in meters.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        Haversine::distance(self.to_point(), other.to_point())
    }

    /// Returns whether this fix is worth acting on, using the default threshold.
    ///
    /// ```
    /// use locationstream::Location;
    ///
    /// let here = Location::new(10.0, 10.0);
    /// assert!(here.is_useful(None));
    /// assert!(!Location::new(10.0001, 10.0001).is_useful(Some(&here)));
    /// ```
    #[must_use]
    pub fn is_useful(&self, last_saved: Option<&Self>) -> bool {
        DistanceFilter::default().is_useful(self, last_saved)
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Decides whether a new fix is displaced enough from the last saved one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceFilter {
    min_displacement_meters: f64,
}

impl DistanceFilter {
    #[must_use]
    pub const fn new(min_displacement_meters: f64) -> Self {
        Self { min_displacement_meters }
    }

    #[must_use]
    pub const fn min_displacement_meters(&self) -> f64 {
        self.min_displacement_meters
    }

    /// The first fix is always useful; afterwards a fix must be strictly
    /// farther than the threshold from `last_saved`.
    #[must_use]
    pub fn is_useful(&self, location: &Location, last_saved: Option<&Location>) -> bool {
        let Some(last) = last_saved else {
            return true;
        };

        let distance = location.distance_to(last);
        tracing::trace!(
            distance_meters = distance,
            threshold_meters = self.min_displacement_meters,
            "distance from last saved location"
        );
        distance > self.min_displacement_meters
    }
}

impl Default for DistanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISPLACEMENT_METERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fix_is_always_useful() {
        let filter = DistanceFilter::new(1_000_000.0);
        assert!(filter.is_useful(&Location::new(0.0, 0.0), None));
    }

    #[test]
    fn nearby_fix_is_not_useful() {
        let last = Location::new(10.0, 10.0);
        let next = Location::new(10.0001, 10.0001);
        assert!(next.distance_to(&last) < DEFAULT_MIN_DISPLACEMENT_METERS);
        assert!(!next.is_useful(Some(&last)));
    }

    #[test]
    fn identical_fix_is_not_useful() {
        let last = Location::new(-33.8688, 151.2093);
        assert!(!last.is_useful(Some(&last)));
    }

    #[test]
    fn threshold_boundary_on_equator() {
        // One thousandth of a degree of longitude on the equator is ~111 m.
        let origin = Location::new(0.0, 0.0);
        assert!(Location::new(0.0, 0.001).is_useful(Some(&origin)));
        assert!(!Location::new(0.0, 0.0008).is_useful(Some(&origin)));
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let origin = Location::new(51.5074, -0.1278);
        let paris = Location::new(48.8566, 2.3522);
        let distance = paris.distance_to(&origin);
        assert!((distance - 343_000.0).abs() < 5_000.0);

        assert!(DistanceFilter::new(300_000.0).is_useful(&paris, Some(&origin)));
        assert!(!DistanceFilter::new(400_000.0).is_useful(&paris, Some(&origin)));
    }

    #[test]
    fn filter_is_symmetric() {
        let a = Location::new(40.7128, -74.0060);
        let b = Location::new(40.7138, -74.0060);
        let filter = DistanceFilter::new(50.0);
        assert_eq!(filter.is_useful(&a, Some(&b)), filter.is_useful(&b, Some(&a)));
    }
}
