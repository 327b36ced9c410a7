pub mod daily_aggregator;
pub mod data_merger;
pub mod grid_aligner;
pub mod integrity_checker;
pub mod pipeline;
pub mod pm25_series;

pub use daily_aggregator::DailyAggregator;
pub use data_merger::DataMerger;
pub use grid_aligner::GridAligner;
pub use integrity_checker::{
    IntegrityChecker, IntegrityIssue, IntegrityReport, IssueType, StationStatistics,
};
pub use pipeline::{AqiPipeline, PipelineOutput};
pub use pm25_series::daily_pm25_series;
