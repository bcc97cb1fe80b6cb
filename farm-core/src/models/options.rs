//! Valid choices for the categorical form fields.

pub const CROP_OPTIONS: &[&str] = &[
    "Wheat",
    "Rice",
    "Maize",
    "Sugarcane",
    "Cotton",
    "Arecanut",
    "Arhar/Tur",
];

pub const STATE_OPTIONS: &[&str] = &[
    "Punjab",
    "Maharashtra",
    "Karnataka",
    "Assam",
    "Uttar Pradesh",
];

pub const SEASON_OPTIONS: &[&str] = &["Rabi", "Kharif", "Summer", "Whole Year"];

pub const SOIL_OPTIONS: &[&str] = &["Red", "Black", "Alluvial", "Laterite", "Clayey"];
