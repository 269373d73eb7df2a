use sqa_core::TestCase;

pub const DEFAULT_REPORT_PATH: &str = "generated_test_cases.txt";

/// Line between two report blocks.
pub fn separator() -> String {
    "-".repeat(40)
}

/// Renders the human-readable review file: one block per test case.
pub fn render_report(cases: &[TestCase]) -> String {
    let sep = separator();
    let mut out = String::new();
    for case in cases {
        out.push_str(&format!("Story ID: {}\n", case.story_id));
        out.push_str(&case.test_case);
        out.push_str(&format!("\n\n{sep}\n\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_block_per_case() {
        let cases = vec![
            TestCase::new("STORY-1", "Test case for User can log in (mocked)"),
            TestCase::new("STORY-2", "Test case for User can reset password (mocked)"),
        ];
        let dashes = "-".repeat(40);
        let expected = format!(
            "Story ID: STORY-1\nTest case for User can log in (mocked)\n\n{dashes}\n\n\
             Story ID: STORY-2\nTest case for User can reset password (mocked)\n\n{dashes}\n\n"
        );
        assert_eq!(render_report(&cases), expected);
    }

    #[test]
    fn empty_list_renders_empty_file() {
        assert_eq!(render_report(&[]), "");
    }

    #[test]
    fn separator_is_forty_dashes() {
        assert_eq!(separator().len(), 40);
        assert!(separator().chars().all(|c| c == '-'));
    }
}
