pub mod scripted;
pub mod stub;

#[cfg(feature = "backend-tract")]
pub mod tract;

pub use scripted::ScriptedBackend;
pub use stub::StubBackend;

#[cfg(feature = "backend-tract")]
pub use tract::TractYoloBackend;

use anyhow::{anyhow, Result};

use crate::config::ModelSettings;
use crate::detect::backend::DetectorBackend;

/// Build the backend named in the model settings.
pub fn open_backend(settings: &ModelSettings) -> Result<Box<dyn DetectorBackend>> {
    match settings.backend.as_str() {
        "stub" => Ok(Box::new(StubBackend::new())),
        "tract" => open_tract(settings),
        other => Err(anyhow!("unknown model backend '{}'", other)),
    }
}

#[cfg(feature = "backend-tract")]
fn open_tract(settings: &ModelSettings) -> Result<Box<dyn DetectorBackend>> {
    Ok(Box::new(TractYoloBackend::new(settings)?))
}

#[cfg(not(feature = "backend-tract"))]
fn open_tract(_settings: &ModelSettings) -> Result<Box<dyn DetectorBackend>> {
    Err(anyhow!("the tract model backend requires the backend-tract feature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_backend_is_selectable() -> Result<()> {
        let settings = ModelSettings {
            backend: "stub".to_string(),
            ..ModelSettings::default()
        };
        assert_eq!(open_backend(&settings)?.name(), "stub");
        Ok(())
    }

    #[cfg(not(feature = "backend-tract"))]
    #[test]
    fn tract_backend_names_the_missing_feature() {
        let err = open_backend(&ModelSettings::default()).err().expect("must fail");
        assert!(err.to_string().contains("backend-tract"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let settings = ModelSettings {
            backend: "coreml".to_string(),
            ..ModelSettings::default()
        };
        assert!(open_backend(&settings).is_err());
    }
}
