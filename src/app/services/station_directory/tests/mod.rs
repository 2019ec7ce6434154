//! Shared test utilities and fixtures for station directory tests

use crate::app::models::{Coordinates, Station};
use crate::app::services::station_directory::StationDirectory;
use std::fs;
use std::path::{Path, PathBuf};

pub mod handle_tests;

/// Create a test station with the given id, name and position
pub fn create_test_station(id: &str, name: &str, lat: f64, lon: f64) -> Station {
    Station::new(id.to_string(), name.to_string(), Coordinates::new(lat, lon)).unwrap()
}

/// A small slice of the Berlin network
pub fn sample_stations() -> Vec<Station> {
    vec![
        create_test_station("U-Ado", "Adenauerplatz", 52.499755, 13.307208),
        create_test_station("SU-A", "Alexanderplatz", 52.521508, 13.411267),
        create_test_station("U-Hptz", "Hermannplatz", 52.486957, 13.424708),
        create_test_station("S-Ost", "Ostkreuz", 52.503, 13.469),
        create_test_station("SU-Zoo", "Zoologischer Garten", 52.506921, 13.332707),
    ]
}

/// Build a directory from the sample stations
pub fn sample_directory() -> StationDirectory {
    let (directory, duplicates) = StationDirectory::from_stations(sample_stations());
    assert!(duplicates.is_empty());
    directory
}

/// Write a station dataset in the on-disk JSON format
pub fn write_stations_file(dir: &Path, stations: &[Station]) -> PathBuf {
    let mut content = String::from("{\n");
    for (index, station) in stations.iter().enumerate() {
        let separator = if index + 1 == stations.len() { "" } else { "," };
        content.push_str(&format!(
            r#"  "{}": {{ "name": "{}", "coordinates": {{ "latitude": {}, "longitude": {} }} }}{}"#,
            station.id,
            station.name,
            station.coordinates.latitude,
            station.coordinates.longitude,
            separator
        ));
        content.push('\n');
    }
    content.push('}');

    let path = dir.join("stations.json");
    fs::write(&path, content).unwrap();
    path
}

/// Write a raw file into the test directory
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
