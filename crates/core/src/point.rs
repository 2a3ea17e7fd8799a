use serde::{Deserialize, Serialize};

/// A named survey point.
///
/// Easting and northing are planar coordinates in the project CRS. Elevation
/// and code ride along with the point but never take part in matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub easting: f64,
    pub northing: f64,
    pub elevation: f64,
    pub code: String,
}

impl Point {
    pub fn new(
        name: impl Into<String>,
        easting: f64,
        northing: f64,
        elevation: f64,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            easting,
            northing,
            elevation,
            code: code.into(),
        }
    }

    /// Planar position as `[easting, northing]`.
    pub fn position(&self) -> [f64; 2] {
        [self.easting, self.northing]
    }

    pub fn has_finite_position(&self) -> bool {
        self.easting.is_finite() && self.northing.is_finite()
    }
}

/// Render a coordinate in shortest round-trip form as a plain decimal,
/// keeping a decimal point on integral values (`100.0`, not `100`).
///
/// Never switches to exponent notation, so millimetre-level elevations come
/// out as `0.00001` rather than `1e-5`.
pub fn format_coordinate(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}
