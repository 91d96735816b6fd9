use crate::evaluation::ClassificationEvaluator;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One line of the evaluation report.
#[derive(Clone, Debug)]
pub struct EvaluationSummary {
    pub label: String,
    pub instances: u64,
    pub weight: f64,
    pub accuracy: f64,
    pub kappa: f64,
    pub extras: BTreeMap<String, f64>,
}

impl EvaluationSummary {
    pub fn from_evaluator(label: impl Into<String>, evaluator: &ClassificationEvaluator) -> Self {
        Self {
            label: label.into(),
            instances: evaluator.instances_seen(),
            weight: evaluator.total_weight(),
            accuracy: evaluator.accuracy(),
            kappa: evaluator.kappa(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extras.insert(name.into(), value);
        self
    }

    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }
}

impl Display for EvaluationSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: n={}, weight={}, acc={}, kappa={}",
            self.label,
            self.instances,
            Self::fmtv(self.weight),
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa)
        )?;

        const ORDER: &[&str] = &["error_rate", "seconds"];

        for key in ORDER {
            if let Some(v) = self.extras.get(*key) {
                write!(f, ", {}={}", key, Self::fmtv(*v))?;
            }
        }

        for (k, v) in self.extras.iter() {
            if ORDER.iter().any(|kk| *kk == k.as_str()) {
                continue;
            }
            write!(f, ", {}={}", k, Self::fmtv(*v))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_known_extras_first() {
        let summary = EvaluationSummary {
            label: "train".into(),
            instances: 10,
            weight: 10.0,
            accuracy: 0.9,
            kappa: 0.8,
            extras: BTreeMap::new(),
        }
        .with_extra("alpha", 0.5)
        .with_extra("error_rate", 0.1);

        assert_eq!(
            summary.to_string(),
            "train: n=10, weight=10.000000, acc=0.900000, kappa=0.800000, \
             error_rate=0.100000, alpha=0.500000"
        );
    }

    #[test]
    fn empty_evaluator_prints_nan_accuracy() {
        let summary = EvaluationSummary::from_evaluator("test", &ClassificationEvaluator::new(2));
        assert_eq!(
            summary.to_string(),
            "test: n=0, weight=0.000000, acc=NaN, kappa=0.000000"
        );
    }
}
