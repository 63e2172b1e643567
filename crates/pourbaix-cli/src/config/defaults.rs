use pourbaix2d::core::models::entry::DEFAULT_ION_CONCENTRATION;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub metastability: f64,
    pub ion_concentration: f64,
    pub ph_range: (f64, f64),
    pub potential_range: (f64, f64),
    pub output_directory: PathBuf,
    pub plot: bool,
    pub summary: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            metastability: 0.0,
            ion_concentration: DEFAULT_ION_CONCENTRATION,
            ph_range: (0.0, 14.0),
            potential_range: (-2.0, 2.0),
            output_directory: PathBuf::from("."),
            plot: true,
            summary: false,
        }
    }
}
