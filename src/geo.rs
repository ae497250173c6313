//! Approximate country centroids for the ADR bubble map.
//!
//! Keyed by ISO 3166-1 alpha-3 code; coordinates are (longitude, latitude)
//! in degrees.

use crate::data::aggregate::CountryAdr;

const CENTROIDS: &[(&str, f64, f64)] = &[
    ("AGO", 17.9, -11.2),
    ("ALB", 20.0, 41.1),
    ("AND", 1.6, 42.5),
    ("ARE", 54.3, 23.9),
    ("ARG", -64.0, -34.0),
    ("ARM", 45.0, 40.1),
    ("AUS", 134.5, -25.7),
    ("AUT", 14.6, 47.6),
    ("AZE", 47.6, 40.1),
    ("BEL", 4.5, 50.6),
    ("BGD", 90.3, 23.7),
    ("BGR", 25.2, 42.8),
    ("BHR", 50.6, 26.0),
    ("BIH", 17.8, 44.2),
    ("BLR", 28.0, 53.5),
    ("BOL", -64.7, -16.7),
    ("BRA", -51.9, -14.2),
    ("CAN", -106.3, 56.1),
    ("CHE", 8.2, 46.8),
    ("CHL", -71.5, -35.7),
    ("CHN", 104.2, 35.9),
    ("CIV", -5.5, 7.5),
    ("CMR", 12.4, 7.4),
    ("COL", -74.3, 4.6),
    ("CPV", -23.6, 15.1),
    ("CRI", -84.0, 9.7),
    ("CUB", -79.0, 21.5),
    ("CYP", 33.4, 35.1),
    ("CZE", 15.5, 49.8),
    ("DEU", 10.4, 51.2),
    ("DNK", 9.5, 56.3),
    ("DOM", -70.2, 18.7),
    ("DZA", 1.7, 28.0),
    ("ECU", -78.2, -1.8),
    ("EGY", 30.8, 26.8),
    ("ESP", -3.7, 40.5),
    ("EST", 25.0, 58.6),
    ("ETH", 40.5, 9.1),
    ("FIN", 25.7, 61.9),
    ("FRA", 2.2, 46.2),
    ("GAB", 11.6, -0.8),
    ("GBR", -3.4, 55.4),
    ("GEO", 43.4, 42.3),
    ("GHA", -1.0, 7.9),
    ("GIB", -5.3, 36.1),
    ("GNB", -15.2, 11.8),
    ("GRC", 21.8, 39.1),
    ("HKG", 114.1, 22.4),
    ("HRV", 15.2, 45.1),
    ("HUN", 19.5, 47.2),
    ("IDN", 113.9, -0.8),
    ("IND", 78.9, 20.6),
    ("IRL", -8.2, 53.4),
    ("IRN", 53.7, 32.4),
    ("IRQ", 43.7, 33.2),
    ("ISL", -19.0, 65.0),
    ("ISR", 34.9, 31.0),
    ("ITA", 12.6, 41.9),
    ("JAM", -77.3, 18.1),
    ("JOR", 36.2, 30.6),
    ("JPN", 138.3, 36.2),
    ("KAZ", 66.9, 48.0),
    ("KEN", 37.9, 0.0),
    ("KOR", 127.8, 35.9),
    ("KWT", 47.5, 29.3),
    ("LBN", 35.9, 33.9),
    ("LKA", 80.8, 7.9),
    ("LTU", 23.9, 55.2),
    ("LUX", 6.1, 49.8),
    ("LVA", 24.6, 56.9),
    ("MAC", 113.5, 22.2),
    ("MAR", -7.1, 31.8),
    ("MDV", 73.2, 3.2),
    ("MEX", -102.6, 23.6),
    ("MKD", 21.7, 41.6),
    ("MLT", 14.4, 35.9),
    ("MOZ", 35.5, -18.7),
    ("MUS", 57.6, -20.3),
    ("MYS", 101.9, 4.2),
    ("NGA", 8.7, 9.1),
    ("NLD", 5.3, 52.1),
    ("NOR", 8.5, 60.5),
    ("NZL", 174.9, -40.9),
    ("OMN", 55.9, 21.5),
    ("PAK", 69.3, 30.4),
    ("PAN", -80.8, 8.5),
    ("PER", -75.0, -9.2),
    ("PHL", 121.8, 12.9),
    ("POL", 19.1, 51.9),
    ("PRI", -66.6, 18.2),
    ("PRT", -8.2, 39.4),
    ("PRY", -58.4, -23.4),
    ("QAT", 51.2, 25.4),
    ("ROU", 24.9, 45.9),
    ("RUS", 105.3, 61.5),
    ("SAU", 45.1, 23.9),
    ("SEN", -14.5, 14.5),
    ("SGP", 103.8, 1.4),
    ("SRB", 21.0, 44.0),
    ("STP", 6.6, 0.2),
    ("SVK", 19.7, 48.7),
    ("SVN", 14.9, 46.2),
    ("SWE", 18.6, 60.1),
    ("SYC", 55.5, -4.7),
    ("THA", 101.0, 15.9),
    ("TUN", 9.5, 33.9),
    ("TUR", 35.2, 39.0),
    ("TWN", 121.0, 23.7),
    ("TZA", 34.9, -6.4),
    ("UKR", 31.2, 48.4),
    ("URY", -55.8, -32.5),
    ("USA", -95.7, 37.1),
    ("UZB", 64.6, 41.4),
    ("VEN", -66.6, 6.4),
    ("VNM", 108.3, 14.1),
    ("ZAF", 22.9, -30.6),
    ("ZMB", 27.8, -13.1),
    ("ZWE", 29.2, -19.0),
];

/// (longitude, latitude) for an ISO-3 code.
pub fn centroid(code: &str) -> Option<(f64, f64)> {
    CENTROIDS
        .binary_search_by(|(c, _, _)| (*c).cmp(code))
        .ok()
        .map(|i| (CENTROIDS[i].1, CENTROIDS[i].2))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCountry {
    pub country: String,
    pub lon: f64,
    pub lat: f64,
    pub mean_adr: f64,
}

/// Split per-country ADR into points with a known centroid and the codes
/// that cannot be placed.
pub fn place(by_country: &[CountryAdr]) -> (Vec<PlacedCountry>, Vec<String>) {
    let mut placed = Vec::new();
    let mut unplaced = Vec::new();
    for entry in by_country {
        match centroid(&entry.country) {
            Some((lon, lat)) => placed.push(PlacedCountry {
                country: entry.country.clone(),
                lon,
                lat,
                mean_adr: entry.mean_adr,
            }),
            None => unplaced.push(entry.country.clone()),
        }
    }
    (placed, unplaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(CENTROIDS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(centroid("PRT"), Some((-8.2, 39.4)));
        assert_eq!(centroid("CN"), None);
    }

    #[test]
    fn test_place_splits_unknown_codes() {
        let input = vec![
            CountryAdr {
                country: "ESP".into(),
                mean_adr: 90.0,
            },
            CountryAdr {
                country: "XYZ".into(),
                mean_adr: 10.0,
            },
        ];
        let (placed, unplaced) = place(&input);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].country, "ESP");
        assert_eq!(unplaced, vec!["XYZ".to_string()]);
    }
}
