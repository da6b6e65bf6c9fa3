pub mod checkin;
pub mod goals;
pub mod header;
pub mod leaderboard;
pub mod prayers;
pub mod statusbar;
pub mod streak;
