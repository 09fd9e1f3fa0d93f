use std::fmt;

/// One trial folder inside a category folder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trial {
    pub category: String,
    pub folder: String,
}

impl Trial {
    pub fn new(category: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            folder: folder.into(),
        }
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.folder)
    }
}

/// Trial state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Presenting,
    AwaitingResponse,
    Scoring,
    Feedback,
    Complete,
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub trial: Trial,
    pub reaction_time_s: f64,
    /// 1-based position the participant selected.
    pub chosen: usize,
    /// 1-based position of the correct stimulus after shuffling.
    pub correct_index: usize,
    pub correct: bool,
}

impl Response {
    pub fn new(trial: Trial, reaction_time_s: f64, chosen: usize, correct_index: usize) -> Self {
        Self {
            trial,
            reaction_time_s: reaction_time_s.max(0.0),
            chosen,
            correct_index,
            correct: chosen == correct_index,
        }
    }

    pub fn answer_label(&self) -> &'static str {
        if self.correct { "correct" } else { "incorrect" }
    }
}

/// Running totals for one participant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub trials_completed: usize,
    pub correct: usize,
    pub total_reaction_s: f64,
}

impl SessionStats {
    pub fn record(&mut self, response: &Response) {
        self.trials_completed += 1;
        self.total_reaction_s += response.reaction_time_s;
        if response.correct {
            self.correct += 1;
        }
    }

    pub fn average_reaction_s(&self) -> f64 {
        if self.trials_completed == 0 {
            0.0
        } else {
            self.total_reaction_s / self.trials_completed as f64
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.trials_completed == 0 {
            0.0
        } else {
            self.correct as f64 / self.trials_completed as f64
        }
    }

    pub fn finalize(&self) -> SessionSummary {
        SessionSummary {
            trials_completed: self.trials_completed,
            correct: self.correct,
            average_reaction_s: self.average_reaction_s(),
            accuracy: self.accuracy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub trials_completed: usize,
    pub correct: usize,
    pub average_reaction_s: f64,
    pub accuracy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(correct: bool, rt: f64) -> Response {
        let chosen = if correct { 2 } else { 1 };
        Response::new(Trial::new("a", "t1"), rt, chosen, 2)
    }

    #[test]
    fn stats_average_and_accuracy() {
        let mut stats = SessionStats::default();
        stats.record(&response(true, 0.5));
        stats.record(&response(false, 1.0));
        stats.record(&response(true, 1.5));
        stats.record(&response(true, 1.0));

        let summary = stats.finalize();
        assert_eq!(summary.trials_completed, 4);
        assert_eq!(summary.correct, 3);
        assert!((summary.average_reaction_s - 1.0).abs() < 1e-9);
        assert!((summary.accuracy - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_session_reports_zeroes() {
        let summary = SessionStats::default().finalize();
        assert_eq!(summary.average_reaction_s, 0.0);
        assert_eq!(summary.accuracy, 0.0);
    }

    #[test]
    fn negative_reaction_time_is_clamped() {
        let r = Response::new(Trial::new("a", "b"), -0.01, 1, 1);
        assert_eq!(r.reaction_time_s, 0.0);
        assert_eq!(r.answer_label(), "correct");
    }

    #[test]
    fn trial_displays_as_path() {
        assert_eq!(Trial::new("animals", "cat_03").to_string(), "animals/cat_03");
    }
}
