//! Top-level collection of runs.

use crate::aggregate::{Filter, TestCounts};
use crate::run::Run;
use crate::template::{escape_html, render_all, Html, Placeholders, RenderContext};
use crate::templates;

/// Date format shown in the report header.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Every run of one or more result bundles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Runs in bundle order.
    pub runs: Vec<Run>,
}

impl Report {
    /// Creates a report over `runs`.
    pub const fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Start date of the first run, formatted for display.
    pub fn date_string(&self) -> String {
        self.runs
            .first()
            .and_then(|run| run.start_date)
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Counts over every run.
    pub fn counts(&self, filter: Filter<'_>) -> TestCounts {
        self.runs
            .iter()
            .map(|run| run.counts(filter))
            .fold(TestCounts::default(), TestCounts::merge)
    }
}

impl Html for Report {
    fn html_template(&self) -> &'static str {
        templates::INDEX
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        let mut values = Placeholders::new();
        values.insert(
            "DEVICES",
            render_all(self.runs.iter().map(Run::device), ctx),
        );
        values.insert("RUNS", render_all(&self.runs, ctx));
        values.insert("DATE_TESTS", escape_html(&self.date_string()));
        values.insert(
            "RESULT_CLASS",
            self.counts(ctx.filter).status().css_class().to_string(),
        );
        values
    }
}
