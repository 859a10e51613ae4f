//! Grantline identity role editor command line.

#![forbid(unsafe_code)]

mod cli_config;
mod command;

use std::env;
use std::sync::Arc;

use chrono::Utc;
use grantline_application::{
    IdentityRoleEditor, IdentityRoleEditorConfig, IdentityRoleService, SubmitError, SubmitOutcome,
};
use grantline_core::{AppError, AppResult};
use grantline_domain::{AccessStatus, RoleAssignmentError};
use grantline_infrastructure::{
    HttpApiClient, HttpIdentityMembershipRepository, HttpIdentityPermissionChecker,
    HttpProjectRoleCatalog, HttpSubscriptionProvider, RelativeDurationParser, TracingNotifier,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::cli_config::{CliConfig, init_tracing};
use crate::command::{EditorCommand, parse_commands};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = CliConfig::load()?;
    let commands = parse_commands(&env::args().skip(1).collect::<Vec<_>>())?;
    let service = build_service(&config)?;
    let editor = service
        .open_editor(config.project_id, config.identity_id)
        .await?;

    ensure_can_run(editor.can_edit(), &commands)?;

    for command in commands {
        match run_command(&editor, &command).await {
            Ok(()) => {}
            Err(error) if error.is_field_error() => {
                warn!(command = ?command, error = %error, "invalid temporary access duration");
            }
            Err(error) => warn!(command = ?command, error = %error, "command failed"),
        }
    }

    log_entries(&editor).await;
    if editor.is_dirty().await {
        info!("role list has unsubmitted edits");
    }

    Ok(())
}

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Row(#[from] RoleAssignmentError),
    #[error(transparent)]
    App(#[from] AppError),
}

impl CommandError {
    fn is_field_error(&self) -> bool {
        matches!(self, Self::Row(error) if error.is_field_error())
    }
}

/// Refuses scripts that mutate roles when the caller may not edit them.
fn ensure_can_run(can_edit: bool, commands: &[EditorCommand]) -> AppResult<()> {
    if can_edit {
        return Ok(());
    }

    match commands.iter().find(|command| command.is_mutating()) {
        Some(command) => Err(AppError::Forbidden(format!(
            "not allowed to edit identity roles, refusing {command:?}"
        ))),
        None => Ok(()),
    }
}

fn build_service(config: &CliConfig) -> AppResult<IdentityRoleService> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let api_client = HttpApiClient::new(
        http_client,
        config.api_base_url.as_str(),
        config.api_token.as_str(),
    );
    let editor_config = IdentityRoleEditorConfig::new(config.default_role_slug.as_str())?;

    Ok(IdentityRoleService::new(
        Arc::new(HttpProjectRoleCatalog::new(api_client.clone())),
        Arc::new(HttpSubscriptionProvider::new(api_client.clone())),
        Arc::new(HttpIdentityMembershipRepository::new(api_client.clone())),
        Arc::new(HttpIdentityPermissionChecker::new(api_client)),
        Arc::new(TracingNotifier::new()),
        Arc::new(RelativeDurationParser::new()),
        editor_config,
    ))
}

async fn run_command(
    editor: &IdentityRoleEditor,
    command: &EditorCommand,
) -> Result<(), CommandError> {
    match command {
        EditorCommand::Show => log_entries(editor).await,
        EditorCommand::Add { slug } => {
            let index = editor.add(slug.as_deref()).await?;
            info!(index, "role added");
        }
        EditorCommand::Remove { index } => {
            if !editor.remove(*index).await? {
                warn!(index, "an identity must keep at least one role");
            }
        }
        EditorCommand::SetRole { index, slug } => editor.set_role(*index, slug).await?,
        EditorCommand::Grant { index, range } => {
            editor.grant(*index, range, Utc::now()).await?;
        }
        EditorCommand::Restart { index, range } => {
            editor.restart(*index, range, Utc::now()).await?;
        }
        EditorCommand::Revoke { index } => {
            editor.revoke(*index).await?;
        }
        EditorCommand::Reset => editor.reset().await,
        EditorCommand::Submit => match editor.submit().await {
            Ok(SubmitOutcome::Submitted { role_count }) => {
                info!(role_count, "roles submitted");
            }
            Ok(SubmitOutcome::Ignored) => info!("submission already in flight"),
            Err(SubmitError::Gated(error)) => {
                warn!(
                    custom_roles = ?error.custom_roles,
                    "upgrade the plan to assign custom roles"
                );
            }
            Err(error) => return Err(AppError::from(error).into()),
        },
    }

    Ok(())
}

async fn log_entries(editor: &IdentityRoleEditor) {
    let now = Utc::now();
    for (index, (entry, status)) in editor.entry_statuses(now).await.into_iter().enumerate() {
        info!(
            index,
            role = entry.slug(),
            status = describe_status(&status).as_str(),
            "role assignment"
        );
    }
}

fn describe_status(status: &AccessStatus) -> String {
    match status {
        AccessStatus::Permanent => "permanent".to_owned(),
        AccessStatus::Pending => "temporary, not started".to_owned(),
        AccessStatus::Active { ends_at } => format!("active until {}", ends_at.to_rfc3339()),
        AccessStatus::Expired { ended_at } => format!("expired at {}", ended_at.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use grantline_core::AppError;
    use grantline_domain::RoleAssignmentError;

    use super::{CommandError, ensure_can_run};
    use crate::command::EditorCommand;

    #[test]
    fn mutating_script_is_refused_without_edit_permission() {
        let commands = vec![
            EditorCommand::Show,
            EditorCommand::Grant {
                index: 0,
                range: "1h".to_owned(),
            },
        ];

        assert!(matches!(
            ensure_can_run(false, &commands),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_run(true, &commands).is_ok());
    }

    #[test]
    fn read_only_script_runs_without_edit_permission() {
        let commands = vec![EditorCommand::Show, EditorCommand::Reset];
        assert!(ensure_can_run(false, &commands).is_ok());
    }

    #[test]
    fn only_duration_errors_are_field_errors() {
        assert!(CommandError::from(RoleAssignmentError::RequiredField).is_field_error());
        assert!(
            !CommandError::from(RoleAssignmentError::EntryNotFound { index: 3 }).is_field_error()
        );
        assert!(!CommandError::from(AppError::Internal("timeout".to_owned())).is_field_error());
    }
}
