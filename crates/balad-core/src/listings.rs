use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair. Both components are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Returns `None` unless both components are finite numbers.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }
}

/// A place listing normalized into the stable output schema, regardless of
/// which shape the upstream record had.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalListing {
    /// Never empty.
    pub name: String,
    /// Possibly empty.
    pub phone: String,
    /// Possibly empty.
    pub address: String,
    /// Serialized as `{"lat": .., "lon": ..}`, with both keys `null` when absent.
    #[serde(with = "location_format", default)]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Opaque upstream identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl CanonicalListing {
    /// A listing with only the required fields set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: String::new(),
            address: String::new(),
            location: None,
            rating: None,
            rating_count: None,
            website: None,
            category: None,
            token: None,
        }
    }
}

mod location_format {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::GeoPoint;

    #[derive(Serialize, Deserialize)]
    struct Wire {
        lat: Option<f64>,
        lon: Option<f64>,
    }

    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S: Serializer>(
        value: &Option<GeoPoint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let wire = Wire {
            lat: value.map(|p| p.lat),
            lon: value.map(|p| p.lon),
        };
        wire.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<GeoPoint>, D::Error> {
        let wire = Option::<Wire>::deserialize(deserializer)?;
        Ok(wire.and_then(|w| match (w.lat, w.lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => None,
        }))
    }
}

/// Field coverage counts over a collection of listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub with_phone: usize,
    pub with_location: usize,
    pub with_address: usize,
}

impl CollectionStats {
    #[must_use]
    pub fn from_listings(listings: &[CanonicalListing]) -> Self {
        listings.iter().fold(
            Self {
                total: listings.len(),
                ..Self::default()
            },
            |mut stats, listing| {
                if !listing.phone.is_empty() {
                    stats.with_phone += 1;
                }
                if listing.location.is_some() {
                    stats.with_location += 1;
                }
                if !listing.address.is_empty() {
                    stats.with_address += 1;
                }
                stats
            },
        )
    }
}
