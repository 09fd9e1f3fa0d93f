/// Defines the screens of a session and their order
pub trait Phase: Copy + PartialEq + std::fmt::Debug + Default {
    fn next(&self) -> Option<Self>;
}

#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Welcome,
    AudioTuning,
    Instructions,
    Trials,
    Summary,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Welcome
    }
}

impl Phase for SessionPhase {
    fn next(&self) -> Option<Self> {
        use SessionPhase::*;
        Some(match self {
            Welcome => AudioTuning,
            AudioTuning => Instructions,
            Instructions => Trials,
            Trials => Summary,
            Summary => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_in_order_and_end_at_summary() {
        let mut seen = vec![SessionPhase::default()];
        while let Some(next) = seen.last().unwrap().next() {
            seen.push(next);
        }
        assert_eq!(
            seen,
            vec![
                SessionPhase::Welcome,
                SessionPhase::AudioTuning,
                SessionPhase::Instructions,
                SessionPhase::Trials,
                SessionPhase::Summary,
            ]
        );
    }
}
