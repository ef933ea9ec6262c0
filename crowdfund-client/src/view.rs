//! Presentation rules for projects: which controls an item offers and how its
//! numbers read. Everything here is a pure function of a [`Project`].

use chrono::DateTime;
use ethers::{types::U256, utils::format_ether};
use std::fmt::Write;

use crate::models::{PaginationState, Project, ProjectStatus};

const DISPLAY_DECIMALS: usize = 4;

/// The action a project card offers for its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Contribute,
    Withdraw,
    None,
}

pub fn affordance(status: ProjectStatus) -> Affordance {
    match status {
        ProjectStatus::Active => Affordance::Contribute,
        ProjectStatus::Successful => Affordance::Withdraw,
        ProjectStatus::Failed | ProjectStatus::Withdrawn => Affordance::None,
    }
}

pub fn shows_contribute(status: ProjectStatus) -> bool {
    affordance(status) == Affordance::Contribute
}

pub fn shows_withdraw(status: ProjectStatus) -> bool {
    affordance(status) == Affordance::Withdraw
}

/// Whole percent funded; a zero goal reads as 0.
pub fn funded_percentage(funds_raised: U256, goal: U256) -> U256 {
    if goal.is_zero() {
        return U256::zero();
    }
    funds_raised.saturating_mul(U256::from(100u8)) / goal
}

pub fn funded_label(project: &Project) -> String {
    format!("{}.00% funded", funded_percentage(project.funds_raised, project.goal))
}

/// Formats wei as ether with at most four fractional digits.
pub fn format_eth(wei: U256) -> String {
    let full = format_ether(wei);
    let Some((whole, fraction)) = full.split_once('.') else {
        return full;
    };
    let fraction: String = fraction.chars().take(DISPLAY_DECIMALS).collect();
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

pub fn format_deadline(deadline: u64) -> String {
    i64::try_from(deadline)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn token_label(project_id: U256) -> String {
    format!("PTKN-{project_id}")
}

pub fn render_project_card(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", project.name);
    let _ = writeln!(out, "  Owned by: {:#x}", project.owner);
    let _ = writeln!(out, "  {}", project.description);
    let _ = writeln!(out, "  Project: {}", project.project_id);
    let _ = writeln!(out, "  Goal: {} ETH", format_eth(project.goal));
    let _ = writeln!(out, "  Funds Raised: {} ETH", format_eth(project.funds_raised));
    let _ = writeln!(out, "  Status: {}", project.status);
    let _ = writeln!(out, "  Deadline: {}", format_deadline(project.deadline));
    let _ = writeln!(out, "  Token: {} ({:#x})", token_label(project.project_id), project.token);
    let _ = writeln!(out, "  {}", funded_label(project));
    match affordance(project.status) {
        Affordance::Contribute => {
            let _ = writeln!(out, "  > contribute {} <amount in ETH>", project.project_id);
        }
        Affordance::Withdraw => {
            let _ = writeln!(out, "  > withdraw {}", project.project_id);
        }
        Affordance::None => {}
    }
    out
}

pub fn render_page(title: &str, page: &PaginationState) -> String {
    let mut out = format!("== {title} ==\n");
    if page.items.is_empty() {
        out.push_str("No projects.\n");
    }
    for project in &page.items {
        out.push_str(&render_project_card(project));
        out.push('\n');
    }
    let _ = writeln!(out, "Page {} of {}", page.current_page, page.total_pages);
    out
}
