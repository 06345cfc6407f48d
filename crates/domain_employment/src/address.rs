//! Postal address

use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::Fake;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Massachusetts zip code prefixes used for generated addresses
const MA_ZIP_PREFIXES: [&str; 6] = ["010", "014", "017", "019", "021", "024"];

/// A US postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// Creates a new address
    pub fn new(
        line_1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            line_1: line_1.into(),
            line_2: None,
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }

    /// Generates a Massachusetts street address
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        let prefix = MA_ZIP_PREFIXES[rng.gen_range(0..MA_ZIP_PREFIXES.len())];
        let zip = format!("{}{:02}", prefix, rng.gen_range(0..100));
        Self::new(format!("{} {}", number, street), city, "MA", zip)
    }

    /// Formats address on a single line
    pub fn single_line(&self) -> String {
        match &self.line_2 {
            Some(l2) => format!("{}, {}, {}, {} {}", self.line_1, l2, self.city, self.state, self.zip),
            None => format!("{}, {}, {} {}", self.line_1, self.city, self.state, self.zip),
        }
    }
}
