//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [storage] Section Defaults
// ============================================================================

pub mod storage {
    pub fn driver() -> String {
        String::new()
    }

    pub fn name() -> String {
        String::new()
    }
}

// ============================================================================
// [publish] Section Defaults
// ============================================================================

pub mod publish {
    use std::path::PathBuf;

    pub fn looking_path() -> Option<PathBuf> {
        None
    }

    pub fn looking_file() -> Option<PathBuf> {
        None
    }
}

// ============================================================================
// [techdocs] Section Defaults
// ============================================================================

pub mod techdocs {
    use std::path::PathBuf;

    pub fn command() -> Vec<String> {
        vec!["techdocs-cli".into()]
    }

    pub fn docker_image() -> String {
        "spotify/techdocs:v1.1.0".into()
    }

    pub fn output_dir() -> PathBuf {
        "site".into()
    }
}
