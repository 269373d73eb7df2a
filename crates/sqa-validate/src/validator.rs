use sqa_core::{TestCase, TestCaseValidator, ValidatedTestCase};
use tracing::{debug, info};

use crate::rule::{NonEmptyRule, Rule};
use crate::types::{NOTE_INVALID, NOTE_VALID};

/// A case is valid when no rule reports a finding.
pub struct RuleValidator {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleValidator {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn check(&self, case: &TestCase) -> ValidatedTestCase {
        let findings: Vec<_> = self.rules.iter().flat_map(|r| r.eval(case)).collect();
        for finding in &findings {
            debug!("{}: {}", finding.rule_id, finding.message);
        }
        let is_valid = findings.is_empty();
        ValidatedTestCase {
            case: case.clone(),
            is_valid,
            validation_notes: if is_valid { NOTE_VALID } else { NOTE_INVALID }.to_string(),
        }
    }
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new(vec![Box::new(NonEmptyRule)])
    }
}

impl TestCaseValidator for RuleValidator {
    fn validate(&self, cases: &[TestCase]) -> Vec<ValidatedTestCase> {
        let validated: Vec<ValidatedTestCase> = cases.iter().map(|c| self.check(c)).collect();
        let valid = validated.iter().filter(|v| v.is_valid).count();
        info!("validated {} test cases ({valid} valid)", validated.len());
        validated
    }
}
