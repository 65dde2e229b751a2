use super::{resolve_role, Session};
use crate::output::{check, print_json, print_table};
use academy_core::badge::{find_badge, BADGES};
use std::collections::BTreeSet;
use std::path::Path;

pub fn run(
    root: &Path,
    role: Option<&str>,
    all: bool,
    id: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();

    if let Some(id) = id {
        let badge = find_badge(id).ok_or_else(|| anyhow::anyhow!("unknown badge: {id}"))?;
        let role = resolve_role(&tracker, role)?;
        let earned = tracker.earned_badges(&role).contains(badge.id);
        if json {
            return print_json(&serde_json::json!({
                "id": badge.id,
                "name": badge.name,
                "description": badge.description,
                "criteria": badge.criteria,
                "icon": badge.icon,
                "role": role,
                "earned": earned,
            }));
        }
        println!("{} ({})", badge.name, badge.id);
        println!("  {}", badge.description);
        println!("  Criteria: {}", badge.criteria);
        println!(
            "  Status:   {} for {role}",
            if earned { "earned" } else { "not earned" }
        );
        return Ok(());
    }

    if all {
        let view = tracker.achievements();
        if json {
            return print_json(&view);
        }
        let rows = view
            .iter()
            .map(|(role, earned)| {
                vec![
                    role.clone(),
                    format!("{}/{}", earned.len(), tracker.badge_count()),
                    earned.iter().copied().collect::<Vec<_>>().join(", "),
                ]
            })
            .collect();
        print_table(&["ROLE", "BADGES", "EARNED"], rows);
        return Ok(());
    }

    let role = resolve_role(&tracker, role)?;
    let earned: BTreeSet<&str> = tracker.earned_badges(&role);
    if json {
        let out: Vec<_> = BADGES
            .iter()
            .map(|b| {
                serde_json::json!({
                    "id": b.id,
                    "name": b.name,
                    "description": b.description,
                    "criteria": b.criteria,
                    "icon": b.icon,
                    "earned": earned.contains(b.id),
                })
            })
            .collect();
        return print_json(&out);
    }
    let rows = BADGES
        .iter()
        .map(|b| {
            vec![
                check(earned.contains(b.id)),
                b.name.to_string(),
                b.criteria.to_string(),
            ]
        })
        .collect();
    print_table(&["", "BADGE", "CRITERIA"], rows);
    println!();
    println!("{} of {} badges earned for {role}", earned.len(), BADGES.len());
    Ok(())
}
