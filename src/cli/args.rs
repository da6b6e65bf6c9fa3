use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "akhcheck",
    version,
    about = "A terminal accountability companion for daily discipline, streaks and brotherhood"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup wizard (name, group, location, timezone)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Record today's outcome: disciplined or lapsed
    Checkin {
        /// Outcome (disciplined, lapsed — or d / l)
        outcome: String,
        /// Record in a group scope instead of the personal ledger
        #[arg(long)]
        group: Option<String>,
        /// Back-date the check-in (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Replace an existing check-in for the same day
        #[arg(long)]
        amend: bool,
    },
    /// Show today's status, streak and badge
    Status,
    /// Show statistics
    Stats {
        /// Show a heatmap for the last 7 days
        #[arg(long)]
        week: bool,
        /// Show a monthly success-rate trend over the last N months
        #[arg(long)]
        months: Option<u32>,
    },
    /// Show a group leaderboard
    Leaderboard {
        /// Group identifier
        group: String,
        /// Period: daily, weekly or monthly
        #[arg(long, default_value = "weekly")]
        period: String,
    },
    /// Group membership management
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },
    /// Accountability goals
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },
    /// Fasting tracker
    Fast {
        #[command(subcommand)]
        action: FastCommands,
    },
    /// Show today's prayer times and countdown to next prayer
    Times,
    /// Export a weekly summary to stdout (premium)
    Export {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Premium feature gate
    Premium {
        #[command(subcommand)]
        action: PremiumCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Add a member to a group
    Add {
        /// Group identifier
        group: String,
        /// Subject identifier of the member
        subject: String,
        /// Display name shown on the leaderboard
        #[arg(long)]
        name: Option<String>,
    },
    /// List members of a group
    List {
        /// Group identifier
        group: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Create a new accountability goal starting today
    New {
        /// Goal title
        title: String,
        /// Target length in days
        #[arg(long, default_value = "30")]
        days: u32,
        /// Why this goal matters
        #[arg(long, default_value = "")]
        description: String,
        /// Make the goal visible to your group
        #[arg(long)]
        public: bool,
    },
    /// List your goals
    List,
    /// Lock a goal (needs 7+ days of progress; permanent)
    Lock {
        /// Goal id as shown by `goal list`
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum FastCommands {
    /// Log a fasted day (today by default)
    Log {
        /// Kind: voluntary, ramadan or makeup
        #[arg(long, default_value = "voluntary")]
        kind: String,
        /// Date of the fast (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },
    /// Show the last 7 days of fasting
    Week,
}

#[derive(Subcommand, Debug)]
pub enum PremiumCommands {
    /// Show premium status and gated features
    Status,
    /// Activate premium for 30 days
    Activate,
    /// Deactivate premium
    Deactivate,
}
