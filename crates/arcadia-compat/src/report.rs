//! Compatibility report types and scoring
//!
//! Issues, adaptations and fallbacks are built fresh on every check; a
//! report is never cached across device-state changes. The score weights
//! are tunable parameters collected in [`ScoringConfig`]; the defaults
//! match the values the portal's games were balanced against.

use serde::{Deserialize, Serialize};

/// What part of the device a compatibility issue concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Performance,
    Controls,
    Display,
    Features,
    Network,
}

/// How badly an issue hurts playability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One problem found by a check pass. Ephemeral; rebuilt on every check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub description: String,

    /// Hint the portal can show next to the warning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

impl CompatibilityIssue {
    pub fn new(kind: IssueKind, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            solution: None,
        }
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }
}

/// Kind of repair the engine can perform automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationKind {
    Controls,
    Viewport,
    Performance,
    Ui,
    Audio,
}

/// One applicable adaptation. `applied` flips once the adapt step
/// performs it successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAdaptation {
    pub kind: AdaptationKind,
    pub description: String,
    pub applied: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl GameAdaptation {
    pub fn new(kind: AdaptationKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            applied: false,
            config: None,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// Degraded-but-functional mode offered when adaptations alone are not
/// enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    AlternativeControls,
    ReducedQuality,
    SimplifiedMode,
    OfflineMode,
}

/// One available fallback mechanism. `enabled` flips when activated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackMechanism {
    pub kind: FallbackKind,
    pub description: String,
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl FallbackMechanism {
    pub fn new(kind: FallbackKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            enabled: false,
            config: None,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// Aggregate result of one compatibility check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub game_id: String,
    pub is_compatible: bool,
    pub score: u8,
    pub issues: Vec<CompatibilityIssue>,
    pub adaptations: Vec<GameAdaptation>,
    pub fallbacks: Vec<FallbackMechanism>,
}

impl CompatibilityReport {
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    pub fn has_adaptation(&self, kind: AdaptationKind) -> bool {
        self.adaptations.iter().any(|a| a.kind == kind)
    }

    pub fn has_fallback(&self, kind: FallbackKind) -> bool {
        self.fallbacks.iter().any(|f| f.kind == kind)
    }
}

/// Score weights and thresholds.
///
/// These are tuning knobs, not derived invariants: the penalty and bonus
/// constants carry no deeper meaning than the balance the portal shipped
/// with, and can be overridden from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub critical_penalty: u8,
    pub high_penalty: u8,
    pub medium_penalty: u8,
    pub low_penalty: u8,

    /// Added per identified adaptation.
    pub adaptation_bonus: u8,
    /// Added per available fallback.
    pub fallback_bonus: u8,

    /// Minimum score to count as compatible ("playable with help").
    pub compat_threshold: u8,
    /// Below this post-adaptation score, every fallback is activated.
    pub fallback_activation_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            critical_penalty: 40,
            high_penalty: 25,
            medium_penalty: 15,
            low_penalty: 5,
            adaptation_bonus: 10,
            fallback_bonus: 5,
            compat_threshold: 60,
            fallback_activation_threshold: 70,
        }
    }
}

impl ScoringConfig {
    pub fn penalty(&self, severity: Severity) -> i32 {
        let penalty = match severity {
            Severity::Critical => self.critical_penalty,
            Severity::High => self.high_penalty,
            Severity::Medium => self.medium_penalty,
            Severity::Low => self.low_penalty,
        };
        i32::from(penalty)
    }

    /// Derive the 0-100 score: start at 100, subtract per issue by
    /// severity, add the adaptation and fallback bonuses, clamp.
    pub fn score(
        &self,
        issues: &[CompatibilityIssue],
        adaptation_count: usize,
        fallback_count: usize,
    ) -> u8 {
        let mut score: i32 = 100;
        for issue in issues {
            score -= self.penalty(issue.severity);
        }
        score += adaptation_count as i32 * i32::from(self.adaptation_bonus);
        score += fallback_count as i32 * i32::from(self.fallback_bonus);
        score.clamp(0, 100) as u8
    }
}
