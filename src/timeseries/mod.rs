//! Monthly rent series: period labels, gap repair and the wide-to-long builder

pub mod builder;
pub mod fill;
pub mod period;

pub use builder::{
    build_series, series_frame, BuildReport, CleanedSeries, LongObservation, Observation,
    SeriesBuild, SeriesBuilder, DEFAULT_MIN_MONTHS,
};
pub use fill::{backward_fill, fill_gaps, forward_fill};
pub use period::Period;
