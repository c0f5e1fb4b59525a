pub mod analyze;
pub mod dot;
pub mod generate;
pub mod run;

use clap::ValueEnum;
use critpath_analysis::AnalysisOptions;
use critpath_core::config::{ProjectConfig, ShortestTarget};

/// `--shortest-target` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Farthest,
    Nearest,
}

impl From<TargetArg> for ShortestTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Farthest => Self::Farthest,
            TargetArg::Nearest => Self::Nearest,
        }
    }
}

/// Report options from config, with an optional flag override.
pub fn analysis_options(config: &ProjectConfig, target: Option<TargetArg>) -> AnalysisOptions {
    AnalysisOptions {
        shortest_target: target.map_or(config.report.shortest_target, Into::into),
        include_timings: config.report.include_timings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config_policy() {
        let mut config = ProjectConfig::default();
        config.report.shortest_target = ShortestTarget::Nearest;
        config.report.include_timings = false;

        let from_config = analysis_options(&config, None);
        assert_eq!(from_config.shortest_target, ShortestTarget::Nearest);
        assert!(!from_config.include_timings);

        let overridden = analysis_options(&config, Some(TargetArg::Farthest));
        assert_eq!(overridden.shortest_target, ShortestTarget::Farthest);
    }
}
