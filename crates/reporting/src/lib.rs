//! Statistics engine: text charts, per-family aggregation and report sections.

pub mod aggregation;
pub mod builder;
pub mod charts;
pub mod report;

pub use builder::StatisticsReport;
pub use charts::{Histogram, bar_chart, histogram};
pub use report::{
    LineTag, Report, ReportLine, ReportOptions, ReportSection, Section, Selection, UnknownSection,
};
