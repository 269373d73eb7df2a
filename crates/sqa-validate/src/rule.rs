use sqa_core::TestCase;

use crate::types::Finding;

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn eval(&self, case: &TestCase) -> Vec<Finding>;
}

/// Fails a case whose text is the empty string. Whitespace counts as content.
pub struct NonEmptyRule;

impl Rule for NonEmptyRule {
    fn id(&self) -> &str {
        "non_empty"
    }

    fn eval(&self, case: &TestCase) -> Vec<Finding> {
        if case.test_case.is_empty() {
            return vec![Finding {
                rule_id: self.id().to_string(),
                message: format!("test case for {} is empty", case.story_id),
            }];
        }
        vec![]
    }
}
