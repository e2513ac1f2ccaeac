//! The compatibility checker
//!
//! Four independent check passes feed one report: basic display
//! constraints, performance heuristics, control requirements and display
//! refinements. Control and display passes also propose adaptations, and
//! the union of issues decides which fallback mechanisms are offered.

use crate::report::{
    AdaptationKind, CompatibilityIssue, CompatibilityReport, FallbackKind, FallbackMechanism,
    GameAdaptation, IssueKind, ScoringConfig, Severity,
};
use crate::requirements::{GameRequirements, RequirementsRegistry};
use crate::FeatureProbe;
use arcadia_catalog::AdaptationCatalog;
use arcadia_device::{DeviceProfile, EnvironmentSnapshot, ScreenSize};
use serde_json::json;

/// Screen width below which a device counts as low-end.
const LOW_END_WIDTH: u32 = 768;

/// Pixel ratio below which a display counts as low-end.
const LOW_END_PIXEL_RATIO: f64 = 2.0;

/// Core count below which a CPU counts as low-end.
const LOW_END_CORES: u32 = 4;

/// Pixel ratio above which rendering cost is clamped.
const PIXEL_RATIO_CLAMP: f64 = 2.0;

/// Screen width below which the portal UI is scaled down.
const COMPACT_UI_WIDTH: u32 = 480;

/// Scores and repairs game/device compatibility.
pub struct CompatibilityChecker {
    registry: RequirementsRegistry,
    catalog: AdaptationCatalog,
    scoring: ScoringConfig,
}

impl CompatibilityChecker {
    /// Checker over the built-in registry and catalog.
    pub fn new() -> Self {
        Self {
            registry: RequirementsRegistry::builtin(),
            catalog: AdaptationCatalog::builtin(),
            scoring: ScoringConfig::default(),
        }
    }

    /// Checker over explicit tables and scoring knobs.
    pub fn with_parts(
        registry: RequirementsRegistry,
        catalog: AdaptationCatalog,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            registry,
            catalog,
            scoring,
        }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub(crate) fn catalog(&self) -> &AdaptationCatalog {
        &self.catalog
    }

    /// Run the full check battery for a game on the device described by
    /// `env`. Never fails; unknown games degrade to permissive defaults.
    pub async fn check(
        &self,
        game_id: &str,
        env: &EnvironmentSnapshot,
        probe: &impl FeatureProbe,
    ) -> CompatibilityReport {
        let profile = DeviceProfile::detect(env);
        let requirements = self.registry.get(game_id);

        let mut issues = Vec::new();
        let mut adaptations = Vec::new();

        self.check_basic(requirements, &profile, &mut issues);
        self.check_performance(requirements, &profile, env, probe, &mut issues)
            .await;
        self.check_controls(requirements, &profile, env, &mut issues, &mut adaptations);
        self.check_display(&profile, &mut adaptations);

        let fallbacks = self.derive_fallbacks(game_id, requirements, &profile, &issues);

        let score = self
            .scoring
            .score(&issues, adaptations.len(), fallbacks.len());
        let is_compatible = score >= self.scoring.compat_threshold;

        tracing::info!(
            game = game_id,
            score,
            compatible = is_compatible,
            issues = issues.len(),
            "compatibility check complete"
        );

        CompatibilityReport {
            game_id: game_id.to_string(),
            is_compatible,
            score,
            issues,
            adaptations,
            fallbacks,
        }
    }

    fn check_basic(
        &self,
        requirements: &GameRequirements,
        profile: &DeviceProfile,
        issues: &mut Vec<CompatibilityIssue>,
    ) {
        if let Some(min) = requirements.min_screen
            && !meets_screen_floor(profile.screen, min)
        {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Display,
                    Severity::High,
                    format!(
                        "Screen {}x{} is below the game's minimum of {}x{}",
                        profile.screen.width, profile.screen.height, min.width, min.height
                    ),
                )
                .with_solution("Use a device with a larger screen"),
            );
        }

        if !requirements.supports_orientation(profile.orientation) {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Display,
                    Severity::Medium,
                    format!("The game does not support {:?} orientation", profile.orientation),
                )
                .with_solution("Rotate the device"),
            );
        }
    }

    async fn check_performance(
        &self,
        requirements: &GameRequirements,
        profile: &DeviceProfile,
        env: &EnvironmentSnapshot,
        probe: &impl FeatureProbe,
        issues: &mut Vec<CompatibilityIssue>,
    ) {
        let cores = env.hardware_concurrency.unwrap_or(LOW_END_CORES);
        let low_end = profile.screen.width < LOW_END_WIDTH
            || profile.pixel_ratio < LOW_END_PIXEL_RATIO
            || cores < LOW_END_CORES;
        if low_end {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Performance,
                    Severity::Medium,
                    "Device appears to be low-end; frame rate may suffer",
                )
                .with_solution("Enable reduced quality mode"),
            );
        }

        if requirements.needs_3d && !probe.supports_3d().await {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Features,
                    Severity::High,
                    "The game requires 3D rendering, which this device does not support",
                )
                .with_solution("Try the simplified mode if offered"),
            );
        }

        if let Some(min_memory) = requirements.min_memory_mb
            && let Some(available) = probe.available_memory_mb().await
            && available < min_memory
        {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Performance,
                    Severity::High,
                    format!(
                        "Estimated {available} MB of memory is below the game's {min_memory} MB minimum"
                    ),
                )
                .with_solution("Close other apps to free memory"),
            );
        }
    }

    fn check_controls(
        &self,
        requirements: &GameRequirements,
        profile: &DeviceProfile,
        env: &EnvironmentSnapshot,
        issues: &mut Vec<CompatibilityIssue>,
        adaptations: &mut Vec<GameAdaptation>,
    ) {
        if requirements.needs_keyboard && profile.is_mobile {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Controls,
                    Severity::High,
                    "The game requires a keyboard, which mobile devices lack",
                )
                .with_solution("On-screen touch controls will be provided"),
            );
            adaptations.push(
                GameAdaptation::new(
                    AdaptationKind::Controls,
                    "Convert keyboard input to synthesized touch controls",
                )
                .with_config(json!({ "source": "keyboard", "target": "touch" })),
            );
        }

        if requirements.needs_mouse && profile.is_touch_only() {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Controls,
                    Severity::Medium,
                    "The game requires a mouse on a touch-only device",
                )
                .with_solution("Touch gestures will replace mouse input"),
            );
            adaptations.push(
                GameAdaptation::new(
                    AdaptationKind::Controls,
                    "Convert mouse input to touch gestures",
                )
                .with_config(json!({ "source": "mouse", "target": "touch" })),
            );
        }

        // No automatic adaptation exists for a missing gamepad; only the
        // alternative-controls fallback applies.
        if requirements.needs_gamepad && !env.gamepad_connected {
            issues.push(
                CompatibilityIssue::new(
                    IssueKind::Controls,
                    Severity::Low,
                    "The game prefers a gamepad and none is connected",
                )
                .with_solution("Connect a controller for the best experience"),
            );
        }
    }

    fn check_display(&self, profile: &DeviceProfile, adaptations: &mut Vec<GameAdaptation>) {
        if profile.pixel_ratio > PIXEL_RATIO_CLAMP {
            adaptations.push(
                GameAdaptation::new(
                    AdaptationKind::Viewport,
                    "Clamp the effective pixel ratio to limit rendering cost",
                )
                .with_config(json!({ "max_pixel_ratio": PIXEL_RATIO_CLAMP })),
            );
        }

        if profile.screen.width < COMPACT_UI_WIDTH {
            adaptations.push(
                GameAdaptation::new(
                    AdaptationKind::Ui,
                    "Scale the portal UI down for a narrow screen",
                )
                .with_config(json!({ "ui_scale": 0.85 })),
            );
        }
    }

    fn derive_fallbacks(
        &self,
        game_id: &str,
        requirements: &GameRequirements,
        profile: &DeviceProfile,
        issues: &[CompatibilityIssue],
    ) -> Vec<FallbackMechanism> {
        let mut fallbacks = Vec::new();

        if issues.iter().any(|i| i.kind == IssueKind::Controls) {
            let entry = self.catalog.entry(game_id, profile);
            let scheme: Vec<&str> = entry.controls.iter().map(|c| c.id.as_str()).collect();
            fallbacks.push(
                FallbackMechanism::new(
                    FallbackKind::AlternativeControls,
                    "On-screen touch control set from the adaptation catalog",
                )
                .with_config(json!({ "controls": scheme })),
            );
        }

        if issues.iter().any(|i| i.kind == IssueKind::Performance) {
            fallbacks.push(FallbackMechanism::new(
                FallbackKind::ReducedQuality,
                "Lower rendering quality to keep the frame rate up",
            ));
        }

        if issues.iter().any(|i| i.kind == IssueKind::Features) {
            fallbacks.push(FallbackMechanism::new(
                FallbackKind::SimplifiedMode,
                "Run the game's simplified mode without unsupported features",
            ));
        }

        // Offline capability is always worth surfacing, issues or not.
        if requirements.offline_capable {
            fallbacks.push(FallbackMechanism::new(
                FallbackKind::OfflineMode,
                "Play offline with the cached version",
            ));
        }

        fallbacks
    }
}

impl Default for CompatibilityChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// A rotatable screen satisfies a floor when its long and short sides do;
/// a portrait phone is not failed against a landscape-shaped floor it
/// could meet by rotating.
fn meets_screen_floor(screen: ScreenSize, floor: ScreenSize) -> bool {
    screen.width.max(screen.height) >= floor.width.max(floor.height)
        && screen.width.min(screen.height) >= floor.width.min(floor.height)
}
