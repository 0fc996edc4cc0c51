//! Dashboard aggregator
//!
//! Turns the stored submissions into the admin view: a table in store order
//! and two category scatter charts (score by age group, score by job
//! function). Charts are drawn by an injected [`ScatterPlotter`]; the
//! handles it returns are owned here and destroyed before any replacement
//! is built and when the view closes.

use serde::Serialize;
use tracing::debug;

use crate::catalog::QuestionCatalog;
use crate::scoring::format_score;
use crate::submission::Submission;

/// Table placeholder when nothing has been submitted
pub const EMPTY_TABLE_MESSAGE: &str = "제출된 데이터가 없습니다.";

/// Chart-area placeholder when nothing has been submitted
pub const EMPTY_CHART_MESSAGE: &str = "차트를 표시할 데이터가 없습니다.";

/// Y axis caption shared by both charts
pub const SCORE_AXIS_TITLE: &str = "총동기 점수";

/// One point of a category scatter chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Category label on the x axis
    pub x: String,
    pub y: f64,
    /// Hover text, `"{name}: {score:.2}"`
    pub hover: String,
}

/// Input handed to the plotting collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    pub title: String,
    pub axis_title: String,
    /// Every category, in catalog order, whether or not it has points
    pub labels: Vec<String>,
    pub points: Vec<ScatterPoint>,
}

/// A rendered chart; must be destroyed before its surface is reused
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Plotting collaborator: renders a category scatter chart
pub trait ScatterPlotter {
    type Handle: ChartHandle;

    fn plot(&self, series: &ScatterSeries) -> Self::Handle;
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// 1-based display position, not the submission id
    pub ordinal: usize,
    pub timestamp: String,
    pub name: String,
    pub age_group: String,
    pub job_function: String,
    /// Two-decimal score
    pub score: String,
}

/// Everything the dashboard displays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub rows: Vec<TableRow>,
    /// Set when there are no rows
    pub placeholder: Option<String>,
    pub age_chart: Option<ScatterSeries>,
    pub job_chart: Option<ScatterSeries>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn hover_label(submission: &Submission) -> String {
    format!("{}: {}", submission.name, format_score(submission.score))
}

fn series(
    title: &str,
    axis_title: &str,
    labels: &[String],
    submissions: &[Submission],
    category: impl Fn(&Submission) -> &str,
) -> ScatterSeries {
    ScatterSeries {
        title: title.to_string(),
        axis_title: axis_title.to_string(),
        labels: labels.to_vec(),
        points: submissions
            .iter()
            .map(|s| ScatterPoint {
                x: category(s).to_string(),
                y: s.score,
                hover: hover_label(s),
            })
            .collect(),
    }
}

/// Build the dashboard view without drawing anything
///
/// No chart series are produced for an empty submission list.
pub fn aggregate(submissions: &[Submission], catalog: &QuestionCatalog) -> DashboardView {
    let rows = submissions
        .iter()
        .enumerate()
        .map(|(i, s)| TableRow {
            ordinal: i + 1,
            timestamp: s.timestamp.clone(),
            name: s.name.clone(),
            age_group: s.age_group.clone(),
            job_function: s.job_function.clone(),
            score: format_score(s.score),
        })
        .collect();

    if submissions.is_empty() {
        return DashboardView {
            rows,
            placeholder: Some(EMPTY_TABLE_MESSAGE.to_string()),
            age_chart: None,
            job_chart: None,
        };
    }

    DashboardView {
        rows,
        placeholder: None,
        age_chart: Some(series(
            "연령대별 점수 분포",
            "연령대",
            catalog.age_groups(),
            submissions,
            |s| s.age_group.as_str(),
        )),
        job_chart: Some(series(
            "직무별 점수 분포",
            "직무",
            catalog.job_functions(),
            submissions,
            |s| s.job_function.as_str(),
        )),
    }
}

/// Dashboard with owned chart handles
pub struct Dashboard<P: ScatterPlotter> {
    plotter: P,
    age_chart: Option<P::Handle>,
    job_chart: Option<P::Handle>,
}

impl<P: ScatterPlotter> Dashboard<P> {
    pub fn new(plotter: P) -> Self {
        Self {
            plotter,
            age_chart: None,
            job_chart: None,
        }
    }

    /// Rebuild the view for `submissions`
    ///
    /// Previously drawn charts are destroyed first. Nothing is plotted for
    /// an empty list.
    pub fn render(&mut self, submissions: &[Submission], catalog: &QuestionCatalog) -> DashboardView {
        self.close();

        let view = aggregate(submissions, catalog);
        if let Some(series) = &view.age_chart {
            self.age_chart = Some(self.plotter.plot(series));
        }
        if let Some(series) = &view.job_chart {
            self.job_chart = Some(self.plotter.plot(series));
        }
        debug!(
            "Rendered dashboard: {} rows, charts {}",
            view.rows.len(),
            if self.has_charts() { "drawn" } else { "skipped" }
        );
        view
    }

    /// Destroy any live chart handles (leaving the view)
    pub fn close(&mut self) {
        if let Some(mut chart) = self.age_chart.take() {
            chart.destroy();
        }
        if let Some(mut chart) = self.job_chart.take() {
            chart.destroy();
        }
    }

    pub fn age_chart(&self) -> Option<&P::Handle> {
        self.age_chart.as_ref()
    }

    pub fn job_chart(&self) -> Option<&P::Handle> {
        self.job_chart.as_ref()
    }

    pub fn has_charts(&self) -> bool {
        self.age_chart.is_some() || self.job_chart.is_some()
    }
}

impl<P: ScatterPlotter> Drop for Dashboard<P> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecordingPlotter {
        log: Log,
    }

    struct RecordingHandle {
        title: String,
        points: usize,
        log: Log,
    }

    impl ChartHandle for RecordingHandle {
        fn destroy(&mut self) {
            self.log.borrow_mut().push(format!("destroy {}", self.title));
        }
    }

    impl ScatterPlotter for RecordingPlotter {
        type Handle = RecordingHandle;

        fn plot(&self, series: &ScatterSeries) -> RecordingHandle {
            self.log.borrow_mut().push(format!("plot {}", series.title));
            RecordingHandle {
                title: series.title.clone(),
                points: series.points.len(),
                log: self.log.clone(),
            }
        }
    }

    fn submission(id: i64, name: &str, age: &str, job: &str, score: f64) -> Submission {
        Submission {
            id,
            timestamp: format!("2025. 1. {}. 오전 10:00:00", id),
            name: name.to_string(),
            age_group: age.to_string(),
            job_function: job.to_string(),
            score,
        }
    }

    fn three() -> Vec<Submission> {
        vec![
            submission(3, "가", "30대", "개발", 10.0),
            submission(1, "나", "20대", "기획", -2.5),
            submission(2, "다", "30대", "개발", 7.126),
        ]
    }

    #[test]
    fn test_aggregate_table_in_store_order() {
        let view = aggregate(&three(), &QuestionCatalog::default());
        assert_eq!(view.rows.len(), 3);
        assert_eq!(
            view.rows.iter().map(|r| r.ordinal).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            view.rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["가", "나", "다"]
        );
        assert_eq!(view.rows[1].score, "-2.50");
        assert_eq!(view.rows[2].score, "7.13");
        assert!(view.placeholder.is_none());
    }

    #[test]
    fn test_aggregate_age_chart_points() {
        let catalog = QuestionCatalog::default();
        let view = aggregate(&three(), &catalog);
        let age = view.age_chart.unwrap();
        assert_eq!(age.labels, catalog.age_groups());
        assert_eq!(age.points.len(), 3);
        assert_eq!(age.points[0].x, "30대");
        assert_eq!(age.points[1].x, "20대");
        assert_eq!(age.points[0].hover, "가: 10.00");

        let job = view.job_chart.unwrap();
        assert_eq!(job.labels, catalog.job_functions());
        assert_eq!(job.points[1].x, "기획");
    }

    #[test]
    fn test_aggregate_empty() {
        let view = aggregate(&[], &QuestionCatalog::default());
        assert!(view.is_empty());
        assert_eq!(view.placeholder.as_deref(), Some(EMPTY_TABLE_MESSAGE));
        assert!(view.age_chart.is_none());
        assert!(view.job_chart.is_none());
    }

    #[test]
    fn test_render_plots_both_charts() {
        let log: Log = Rc::default();
        let mut dashboard = Dashboard::new(RecordingPlotter { log: log.clone() });
        dashboard.render(&three(), &QuestionCatalog::default());

        assert_eq!(
            *log.borrow(),
            vec!["plot 연령대별 점수 분포", "plot 직무별 점수 분포"]
        );
        assert_eq!(dashboard.age_chart().map(|h| h.points), Some(3));
    }

    #[test]
    fn test_rerender_destroys_before_rebuilding() {
        let log: Log = Rc::default();
        let mut dashboard = Dashboard::new(RecordingPlotter { log: log.clone() });
        let catalog = QuestionCatalog::default();

        let mut submissions = three();
        dashboard.render(&submissions, &catalog);
        submissions.push(submission(4, "라", "40대", "영업", 1.0));
        log.borrow_mut().clear();
        dashboard.render(&submissions, &catalog);

        assert_eq!(
            *log.borrow(),
            vec![
                "destroy 연령대별 점수 분포",
                "destroy 직무별 점수 분포",
                "plot 연령대별 점수 분포",
                "plot 직무별 점수 분포",
            ]
        );
        assert_eq!(dashboard.job_chart().map(|h| h.points), Some(4));
    }

    #[test]
    fn test_render_empty_builds_no_chart() {
        let log: Log = Rc::default();
        let mut dashboard = Dashboard::new(RecordingPlotter { log: log.clone() });
        let view = dashboard.render(&[], &QuestionCatalog::default());
        assert!(view.age_chart.is_none());
        assert!(log.borrow().is_empty());
        assert!(!dashboard.has_charts());
    }

    #[test]
    fn test_render_to_empty_releases_previous_charts() {
        let log: Log = Rc::default();
        let mut dashboard = Dashboard::new(RecordingPlotter { log: log.clone() });
        let catalog = QuestionCatalog::default();
        dashboard.render(&three(), &catalog);
        log.borrow_mut().clear();

        dashboard.render(&[], &catalog);
        assert_eq!(log.borrow().len(), 2);
        assert!(log.borrow().iter().all(|e| e.starts_with("destroy")));
        assert!(!dashboard.has_charts());
    }

    #[test]
    fn test_close_and_drop_release_handles() {
        let log: Log = Rc::default();
        let catalog = QuestionCatalog::default();

        let mut dashboard = Dashboard::new(RecordingPlotter { log: log.clone() });
        dashboard.render(&three(), &catalog);
        dashboard.close();
        dashboard.close();
        assert_eq!(
            log.borrow().iter().filter(|e| e.starts_with("destroy")).count(),
            2
        );

        log.borrow_mut().clear();
        {
            let mut scoped = Dashboard::new(RecordingPlotter { log: log.clone() });
            scoped.render(&three(), &catalog);
        }
        assert_eq!(
            log.borrow().iter().filter(|e| e.starts_with("destroy")).count(),
            2
        );
    }
}
