use comfy_table::Color;

/// Health band of a cluster score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Critical,
    Warning,
    Healthy,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score < 40.0 {
            ScoreBand::Critical
        } else if score < 70.0 {
            ScoreBand::Warning
        } else {
            ScoreBand::Healthy
        }
    }

    /// Color used by the HTML report
    pub fn hex(&self) -> &'static str {
        match self {
            ScoreBand::Critical => "#B71C1C",
            ScoreBand::Warning => "#ffa000",
            ScoreBand::Healthy => "#4CAF50",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ScoreBand::Critical => Color::Rgb { r: 0xB7, g: 0x1C, b: 0x1C },
            ScoreBand::Warning => Color::Rgb { r: 0xFF, g: 0xA0, b: 0x00 },
            ScoreBand::Healthy => Color::Rgb { r: 0x4C, g: 0xAF, b: 0x50 },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Critical => "Critical",
            ScoreBand::Warning => "Warning",
            ScoreBand::Healthy => "Healthy",
        }
    }
}

/// Text progress bar for a score, `width` cells wide
pub fn score_bar(score: f64, width: usize) -> String {
    let clamped = if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled.min(width)),
        "░".repeat(width - filled.min(width))
    )
}
