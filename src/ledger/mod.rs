pub mod engine;

pub use engine::{
    anchor_date, assign_badge, bucket_by_period, current_streak, period_start, point_score,
    rank_subjects, success_rate, summarize,
};
