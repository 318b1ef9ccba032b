pub mod anomaly;
pub mod insights;
pub mod stats;

pub use anomaly::{category_stats, AnomalyDetector, AnomalyRecord, CategoryStats, Direction, DEFAULT_THRESHOLD};
pub use insights::{latest_date, InsightAggregator, InsightSection, Insights, SectionKind};
pub use stats::{busiest_weekday, category_breakdown, daily_totals, monthly_totals, CategorySummary};
