//! Scripted landscape analysis.
//!
//! There is no real terrain model behind this: the analysis walks through six
//! timed stages and then yields the same [`LandscapeReport`] for every spot.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::progress::{Clock, ProgressError, ProgressState, Stage, SteppedTask};
use crate::models::{Difficulty, SpotId};

/// Qualitative band for a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::Excellent
        } else if score >= 6.0 {
            ScoreBand::Good
        } else {
            ScoreBand::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureScore {
    pub kind: String,
    pub label: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightWindow {
    pub name: String,
    /// `HH:MM`, absent for all-day windows.
    pub start: Option<String>,
    pub end: Option<String>,
    pub quality: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherFactors {
    pub wind_exposure: String,
    pub thermal_activity: String,
    pub precipitation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRecommendation {
    pub shot: String,
    pub description: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeReport {
    pub cinematic_score: f64,
    pub features: Vec<FeatureScore>,
    pub lighting: Vec<LightWindow>,
    pub weather: WeatherFactors,
    pub shots: Vec<ShotRecommendation>,
    pub safety_notes: Vec<String>,
}

impl LandscapeReport {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.cinematic_score)
    }
}

fn feature(kind: &str, label: &str, score: f64, description: &str) -> FeatureScore {
    FeatureScore {
        kind: kind.to_string(),
        label: label.to_string(),
        score,
        description: description.to_string(),
    }
}

fn window(name: &str, start: Option<&str>, end: Option<&str>, quality: &str, note: Option<&str>) -> LightWindow {
    LightWindow {
        name: name.to_string(),
        start: start.map(str::to_string),
        end: end.map(str::to_string),
        quality: quality.to_string(),
        note: note.map(str::to_string),
    }
}

fn shot(name: &str, description: &str, difficulty: Difficulty) -> ShotRecommendation {
    ShotRecommendation {
        shot: name.to_string(),
        description: description.to_string(),
        difficulty,
    }
}

static CANNED_REPORT: Lazy<LandscapeReport> = Lazy::new(|| LandscapeReport {
    cinematic_score: 8.7,
    features: vec![
        feature("elevation", "Elevation Changes", 9.2, "Dramatic height variations for dynamic shots"),
        feature("water", "Water Features", 7.8, "Rivers and coastal areas for reflective shots"),
        feature("vegetation", "Vegetation Density", 6.5, "Mixed forest and open areas"),
        feature("structures", "Interesting Structures", 8.1, "Bridges, buildings, and landmarks"),
    ],
    lighting: vec![
        window("golden_hour", Some("06:30"), Some("07:30"), "Excellent", None),
        window("blue_hour", Some("19:00"), Some("19:45"), "Good", None),
        window("midday", None, None, "Fair", Some("Harsh shadows, consider filters")),
    ],
    weather: WeatherFactors {
        wind_exposure: "Moderate".to_string(),
        thermal_activity: "Low".to_string(),
        precipitation: "Sheltered areas available".to_string(),
    },
    shots: vec![
        shot("Reveal Shot", "Start low behind trees, rise to reveal the valley", Difficulty::Intermediate),
        shot("Follow Shot", "Track along the river bend", Difficulty::Beginner),
        shot("Orbit Shot", "Circle the prominent rock formation", Difficulty::Expert),
        shot("Proximity Shot", "Weave between tree branches", Difficulty::Expert),
    ],
    safety_notes: vec![
        "Watch for thermal updrafts near cliff faces".to_string(),
        "Maintain safe distance from water surface".to_string(),
        "Be aware of wildlife activity in early morning".to_string(),
        "Check wind conditions before attempting proximity shots".to_string(),
    ],
});

/// The fixed report every analysis produces.
pub fn canned_report() -> LandscapeReport {
    CANNED_REPORT.clone()
}

pub fn analysis_stages() -> Vec<Stage> {
    vec![
        Stage::millis("Analyzing topography...", 800),
        Stage::millis("Identifying water features...", 600),
        Stage::millis("Evaluating vegetation patterns...", 700),
        Stage::millis("Assessing lighting conditions...", 500),
        Stage::millis("Generating shot recommendations...", 900),
        Stage::millis("Calculating cinematic score...", 400),
    ]
}

/// Analysis run for one spot.
#[derive(Debug)]
pub struct LandscapeAnalysis {
    spot_id: SpotId,
    task: SteppedTask<LandscapeReport>,
}

impl LandscapeAnalysis {
    pub fn new(spot_id: SpotId) -> Self {
        Self {
            spot_id,
            task: SteppedTask::new(analysis_stages()),
        }
    }

    pub fn spot_id(&self) -> SpotId {
        self.spot_id
    }

    pub fn start(&mut self, clock: &dyn Clock) -> Result<(), ProgressError> {
        log::info!("Starting landscape analysis for spot {}", self.spot_id);
        self.task.start(clock, canned_report())
    }

    pub fn poll(&mut self, clock: &dyn Clock) -> &ProgressState<LandscapeReport> {
        self.task.poll(clock);
        self.task.state()
    }

    pub fn report(&self) -> Option<&LandscapeReport> {
        match self.task.state() {
            ProgressState::Complete { result } => Some(result),
            _ => None,
        }
    }
}
