//! Game/device compatibility checking and repair
//!
//! Runs a fixed battery of checks (screen size, orientation, performance
//! class, control requirements, feature support) for a game on the current
//! device, derives applicable adaptations and fallback mechanisms, and
//! condenses everything into a 0-100 compatibility score. The companion
//! [`CompatibilityChecker::adapt`] call applies the adaptations, wiring the
//! touch adapter up when keyboard/mouse input has to be converted.
//!
//! Compatibility degrades, it never hard-fails: unknown games get
//! permissive default requirements and the generic control scheme from the
//! adaptation catalog.
//!
//! # Example
//!
//! ```
//! use arcadia_compat::{CompatibilityChecker, SnapshotProbe};
//! use arcadia_device::EnvironmentSnapshot;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let checker = CompatibilityChecker::new();
//! let env = EnvironmentSnapshot::touch_screen(390, 844);
//! let probe = SnapshotProbe::from_env(&env);
//!
//! let report = checker.check("box-jump", &env, &probe).await;
//! println!("{}: score {}", report.game_id, report.score);
//! # Ok(())
//! # }
//! ```

mod adapt;
mod checker;
mod probe;
mod report;
mod requirements;

pub use adapt::Adapted;
pub use checker::CompatibilityChecker;
pub use probe::{FeatureProbe, SnapshotProbe};
pub use report::{
    AdaptationKind, CompatibilityIssue, CompatibilityReport, FallbackKind, FallbackMechanism,
    GameAdaptation, IssueKind, ScoringConfig, Severity,
};
pub use requirements::{GameRequirements, RequirementsRegistry};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompatError {
    #[error("No game surface provided for adaptation")]
    SurfaceMissing,

    #[error("Requirements file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
