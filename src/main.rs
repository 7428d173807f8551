// 离线演示入口
// 初始化日志与本地 SQLite 存储，打印今天的挑战、到期复习与提醒状态

use anyhow::Result;
use log::LevelFilter;
use math_mentor::{
    DailyChallengeService, Problem, ProfileService, ReminderService, SequenceSlot, SqliteStore,
    SrsService,
};
use std::sync::Arc;

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

/// 题目的纯文本展示
fn describe(problem: &Problem) -> String {
    match problem {
        Problem::Sprint {
            num1,
            num2,
            operator,
            ..
        } => format!("{} {} {} = ?", num1, operator.symbol(), num2),
        Problem::Algebra { equation, .. } => format!("solve for x: {}", equation),
        Problem::Sequence { sequence, .. } => {
            let slots: Vec<String> = sequence
                .iter()
                .map(|slot| match slot {
                    SequenceSlot::Value(v) => v.to_string(),
                    SequenceSlot::Gap(gap) => gap.clone(),
                })
                .collect();
            slots.join(", ")
        }
        Problem::Geometry { question, .. } => question.clone(),
    }
}

fn run() -> Result<()> {
    let store = Arc::new(SqliteStore::new()?);

    let profile = ProfileService::new(store.clone());
    let user = profile.user().unwrap_or_else(|| "guest".to_string());
    println!("Math Mentor — signed in as {}", user);

    let challenge = DailyChallengeService::new(store.clone());
    println!("\nToday's daily challenge:");
    for (i, entry) in challenge.daily_challenge().iter().enumerate() {
        println!(
            "  {}. [{}] {}",
            i + 1,
            entry.difficulty.as_str(),
            describe(&entry.problem)
        );
    }

    let leaderboard = challenge.leaderboard();
    if leaderboard.is_empty() {
        println!("\nLeaderboard: no scores yet today.");
    } else {
        println!("\nLeaderboard:");
        for (i, entry) in leaderboard.iter().enumerate() {
            println!(
                "  {}. {} — {} pts in {:.1}s",
                i + 1,
                entry.name,
                entry.score,
                entry.time as f64 / 1000.0
            );
        }
    }
    if challenge.completion_status(&user) {
        println!("You have already completed today's challenge.");
    }

    let srs = SrsService::new(store.clone());
    let due = srs.topics_for_review();
    if due.is_empty() {
        println!("\nNo topics due for review.");
    } else {
        println!("\nTopics due for review:");
        for topic in due {
            println!("  - {}: {}", topic.name, topic.description);
        }
    }

    let reminder = ReminderService::new(store);
    let settings = reminder.settings();
    if settings.is_enabled {
        println!(
            "\nWeekly reminder set for {} at {}{}",
            settings.day,
            settings.time,
            if reminder.is_due() { " (due now!)" } else { "" }
        );
    } else {
        println!("\nWeekly reminder is off.");
    }

    Ok(())
}

fn main() {
    if let Err(err) = setup_logger() {
        eprintln!("failed to initialize logger: {}", err);
    }

    if let Err(err) = run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
