// file: src/exporter/text.rs
// description: terminal rendering of ranked answers and unanswered reports

use crate::models::{Question, RankedResult};
use crate::search::FetchFailure;
use crate::stackexchange::UnansweredReport;
use colored::*;

pub const DEFAULT_EXCERPT_LEN: usize = 240;

pub fn render_ranked(result: &RankedResult, show: usize, excerpt_len: usize) -> String {
    let mut out = format!(
        "{} {}\n\n",
        "Results for".bold(),
        format!("\"{}\"", result.query).cyan()
    );

    for (index, ranked) in result.answers.iter().take(show).enumerate() {
        out.push_str(&format!("{}. ", index + 1).bold().to_string());
        out.push_str(&ranked.format_summary(excerpt_len));
        out.push('\n');
    }

    if result.len() > show {
        out.push_str(
            &format!("... {} more answers not shown\n", result.len() - show)
                .dimmed()
                .to_string(),
        );
    }
    out
}

pub fn render_failures(failures: &[FetchFailure]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }

    let ids: Vec<String> = failures.iter().map(|f| f.question_id.to_string()).collect();
    Some(format!(
        "Skipped {} question(s) that could not be fetched: {}",
        failures.len(),
        ids.join(", ")
    ))
}

pub fn render_unanswered(report: &UnansweredReport) -> String {
    if report.questions.is_empty() {
        return format!(
            "No unanswered [{}] questions among {} scanned\n",
            report.tag, report.total_questions
        );
    }

    let mut out = format!(
        "Top {} unanswered [{}] questions ({} scanned over {} pages)\n\n",
        report.questions.len(),
        report.tag.green(),
        report.total_questions,
        report.pages_fetched
    );
    for question in &report.questions {
        out.push_str(&render_question(question));
    }
    out
}

fn render_question(question: &Question) -> String {
    let title = question.title.as_deref().unwrap_or("(untitled)");
    format!(
        "{:>7} views  {}\n               {}\n",
        question.view_count,
        title.bold(),
        question.link.dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Ranker;
    use crate::search::FetchFailure;
    use crate::error::LookupError;
    use crate::test_support::{answer, question, reference_time};

    fn result() -> RankedResult {
        Ranker::new(reference_time())
            .rank(
                "npe",
                vec![
                    answer(1, 9, 30, false),
                    answer(2, 9, 20, false),
                    answer(3, 9, 10, false),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_render_ranked_limits_output() {
        let text = render_ranked(&result(), 2, DEFAULT_EXCERPT_LEN);

        assert!(text.contains("votes 30"));
        assert!(text.contains("votes 20"));
        assert!(!text.contains("votes 10"));
        assert!(text.contains("1 more answers not shown"));
    }

    #[test]
    fn test_render_failures() {
        assert!(render_failures(&[]).is_none());

        let failure = FetchFailure {
            question_id: 42,
            error: "gone".to_string(),
            kind: "NotFoundError",
            source: LookupError::NotFound(42),
        };
        let text = render_failures(&[failure]).unwrap();
        assert!(text.contains("Skipped 1 question(s)"));
        assert!(text.contains("42"));
    }

    #[test]
    fn test_render_unanswered() {
        let mut untitled = question(8, 12, 0);
        untitled.title = None;
        let report = UnansweredReport {
            tag: "rust".to_string(),
            questions: vec![question(7, 300, 0), untitled],
            total_questions: 40,
            pages_fetched: 1,
        };

        let text = render_unanswered(&report);
        assert!(text.contains("300 views"));
        assert!(text.contains("(untitled)"));
        assert!(text.contains("40 scanned over 1 pages"));
    }

    #[test]
    fn test_render_empty_report() {
        let report = UnansweredReport {
            tag: "rust".to_string(),
            questions: Vec::new(),
            total_questions: 0,
            pages_fetched: 1,
        };
        assert_eq!(
            render_unanswered(&report),
            "No unanswered [rust] questions among 0 scanned\n"
        );
    }
}
