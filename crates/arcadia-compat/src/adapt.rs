//! Adaptation application
//!
//! Re-runs the compatibility check, then performs each listed adaptation:
//! control conversion attaches the touch adapter, viewport/UI adaptations
//! become presentation hints on the surface. One failed adaptation is
//! logged and skipped, never aborting its siblings. If the score is still
//! under the activation threshold afterwards, every available fallback is
//! switched on.

use crate::checker::CompatibilityChecker;
use crate::report::{AdaptationKind, CompatibilityReport};
use crate::{CompatError, FeatureProbe};
use arcadia_catalog::GameConfig;
use arcadia_device::{DeviceProfile, EnvironmentSnapshot};
use arcadia_input::{GameSurface, InputInjector, PresentationHint, TouchAdapter};

/// Result of an adaptation run: the session config for the caller's
/// rendering layer, the final report, and the touch adapter (attached when
/// a controls adaptation applied). When no controls adaptation consumed
/// the surface it is handed back untouched.
pub struct Adapted<S: GameSurface, I: InputInjector> {
    pub config: GameConfig,
    pub report: CompatibilityReport,
    pub adapter: TouchAdapter<S, I>,
    pub surface: Option<S>,
}

impl CompatibilityChecker {
    /// Check, repair and prepare a game session on the given surface.
    ///
    /// Fails only when no surface is provided; every per-adaptation
    /// failure is logged and skipped so the remaining adaptations still
    /// run.
    pub async fn adapt<S: GameSurface, I: InputInjector>(
        &self,
        game_id: &str,
        surface: Option<S>,
        injector: I,
        env: &EnvironmentSnapshot,
        probe: &impl FeatureProbe,
    ) -> Result<Adapted<S, I>, CompatError> {
        let mut surface = surface.ok_or(CompatError::SurfaceMissing)?;

        let mut report = self.check(game_id, env, probe).await;
        let profile = DeviceProfile::detect(env);
        let config = self.catalog().game_config(game_id, &profile);
        let mut adapter = TouchAdapter::new(injector);

        // Presentation-level adaptations first, while the surface is still
        // in hand; the controls adaptation hands it to the touch adapter.
        let mut wants_touch_controls = false;
        for adaptation in report.adaptations.iter_mut().filter(|a| !a.applied) {
            match adaptation.kind {
                AdaptationKind::Controls => {
                    wants_touch_controls = true;
                }
                AdaptationKind::Viewport => {
                    let hint = PresentationHint::ClampPixelRatio(
                        pixel_ratio_limit(adaptation.config.as_ref()),
                    );
                    match surface.apply_hint(&hint) {
                        Ok(()) => adaptation.applied = true,
                        Err(e) => {
                            tracing::warn!("Viewport adaptation failed, skipping: {e}");
                        }
                    }
                }
                AdaptationKind::Ui => {
                    let hint = PresentationHint::UiScale(ui_scale(adaptation.config.as_ref()));
                    match surface.apply_hint(&hint) {
                        Ok(()) => adaptation.applied = true,
                        Err(e) => {
                            tracing::warn!("UI adaptation failed, skipping: {e}");
                        }
                    }
                }
                AdaptationKind::Performance | AdaptationKind::Audio => {
                    // Advisory only; the portal applies these itself.
                    tracing::debug!("No runtime apply step for {:?} adaptation", adaptation.kind);
                }
            }
        }

        let surface = if wants_touch_controls {
            match adapter.attach(surface, config.clone()) {
                Ok(()) => {
                    adapter.enable_gestures();
                    for adaptation in &mut report.adaptations {
                        if adaptation.kind == AdaptationKind::Controls {
                            adaptation.applied = true;
                        }
                    }
                    None
                }
                Err(e) => {
                    // The adapter tears its partial state down itself; the
                    // surface is gone with it, but the session still runs
                    // with whatever else applied.
                    tracing::warn!("Controls adaptation failed, skipping: {e}");
                    None
                }
            }
        } else {
            Some(surface)
        };

        if report.score < self.scoring().fallback_activation_threshold {
            for fallback in report.fallbacks.iter_mut().filter(|f| !f.enabled) {
                fallback.enabled = true;
                tracing::warn!(
                    kind = ?fallback.kind,
                    "score {} below activation threshold; fallback enabled",
                    report.score
                );
            }
        }

        Ok(Adapted {
            config,
            report,
            adapter,
            surface,
        })
    }
}

fn pixel_ratio_limit(config: Option<&serde_json::Value>) -> f64 {
    config
        .and_then(|c| c.get("max_pixel_ratio"))
        .and_then(|v| v.as_f64())
        .unwrap_or(2.0)
}

fn ui_scale(config: Option<&serde_json::Value>) -> f32 {
    config
        .and_then(|c| c.get("ui_scale"))
        .and_then(|v| v.as_f64())
        .unwrap_or(0.85) as f32
}
