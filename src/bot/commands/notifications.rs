//! Notification Discord command - toggle and inspect expiry alerts.

use crate::core::notification::{PassReport, Permission};

/// Status line for a permission state.
#[must_use]
pub const fn permission_summary(permission: Permission) -> &'static str {
    match permission {
        Permission::Granted => "🔔 Expiry alerts are **enabled**.",
        Permission::Denied => "🔕 Expiry alerts are **disabled**.",
        Permission::Default => "❔ Expiry alerts have not been set up yet.",
    }
}

/// Summary of a manual notification pass.
#[must_use]
pub fn pass_summary(report: &PassReport) -> String {
    if report.permission != Permission::Granted {
        return format!(
            "{} Enable them with `/notifications enable` first.",
            permission_summary(report.permission)
        );
    }
    let summary = format!(
        "🔎 Checked: {} item(s) expiring. Sent {}, already notified today {}.",
        report.expiring,
        report.sent.len(),
        report.skipped.len()
    );
    if report.failed.is_empty() {
        summary
    } else {
        format!(
            "{summary} ⚠️ {} failed and will be retried.",
            report.failed.len()
        )
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{pass_summary, permission_summary};
    use crate::{
        bot::BotData,
        core::{expiry::today_local, notification::Permission},
        errors::{Error, Result},
    };

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum NotificationAction {
        #[name = "enable"]
        Enable,
        #[name = "disable"]
        Disable,
        #[name = "status"]
        Status,
        #[name = "check"]
        Check,
    }

    /// Turns expiry alerts on or off, shows their state, or runs a check now.
    #[poise::command(slash_command, prefix_command)]
    pub async fn notifications(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What to do"] action: NotificationAction,
    ) -> Result<()> {
        let data = ctx.data();
        let engine = &data.engine;

        let message = match action {
            NotificationAction::Enable => {
                engine.set_permission(Permission::Granted).await?;
                permission_summary(Permission::Granted).to_string()
            }
            NotificationAction::Disable => {
                engine.set_permission(Permission::Denied).await?;
                permission_summary(Permission::Denied).to_string()
            }
            NotificationAction::Status => {
                permission_summary(engine.permission().await?).to_string()
            }
            NotificationAction::Check => {
                ctx.defer().await?;
                let report = engine
                    .check_items(&data.tracker.items(), today_local())
                    .await?;
                pass_summary(&report)
            }
        };

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_summary_without_permission() {
        let report = PassReport {
            permission: Permission::Denied,
            ..PassReport::default()
        };
        let summary = pass_summary(&report);
        assert!(summary.contains("disabled"));
        assert!(summary.contains("/notifications enable"));
    }

    #[test]
    fn test_pass_summary_counts() {
        let report = PassReport {
            permission: Permission::Granted,
            expiring: 3,
            sent: vec!["a".to_string()],
            skipped: vec!["b".to_string()],
            failed: vec!["c".to_string()],
        };
        let summary = pass_summary(&report);
        assert!(summary.contains("3 item(s) expiring"));
        assert!(summary.contains("Sent 1"));
        assert!(summary.contains("1 failed"));
    }
}
