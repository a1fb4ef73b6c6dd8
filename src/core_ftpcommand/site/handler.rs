use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::site::site_chmod::handle_chmod_command;
use crate::core_ftpcommand::site::site_clear::handle_clear_command;
use crate::core_ftpcommand::site::site_loader::handle_loader_command;
use crate::core_ftpcommand::site::site_mount::{handle_mount_command, handle_unmount_command};
use crate::core_ftpcommand::site::site_passwd::{handle_nopasswd_command, handle_passwd_command};
use crate::core_ftpcommand::utils::split_command;
use crate::server::ServerState;
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteCommand {
    Loader,
    Clear,
    Chmod,
    Passwd,
    NoPasswd,
    Mount,
    Unmount,
}

impl SiteCommand {
    fn from_str(cmd: &str) -> Option<SiteCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "LOADER" => Some(SiteCommand::Loader),
            "CLEAR" => Some(SiteCommand::Clear),
            "CHMOD" => Some(SiteCommand::Chmod),
            "PASSWD" => Some(SiteCommand::Passwd),
            "NOPASSWD" => Some(SiteCommand::NoPasswd),
            "MOUNT" => Some(SiteCommand::Mount),
            "UNMOUNT" => Some(SiteCommand::Unmount),
            _ => None,
        }
    }
}

/// Dispatches `SITE <subcommand> <args>`.
pub async fn handle_site_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    let (subcommand, sub_arg) = split_command(arg);

    let Some(command) = SiteCommand::from_str(&subcommand) else {
        warn!("Session {}: unknown SITE subcommand {:?}", session.id, subcommand);
        session.reply(501, "Unknown SITE command.").await?;
        return Ok(CommandOutcome::Continue);
    };

    info!("Session {}: SITE {:?}", session.id, command);
    let sub_arg = sub_arg.as_str();
    match command {
        SiteCommand::Loader => handle_loader_command(session, state, sub_arg).await,
        SiteCommand::Clear => handle_clear_command(session, state, sub_arg).await,
        SiteCommand::Chmod => handle_chmod_command(session, state, sub_arg).await,
        SiteCommand::Passwd => handle_passwd_command(session, state, sub_arg).await,
        SiteCommand::NoPasswd => handle_nopasswd_command(session, state, sub_arg).await,
        SiteCommand::Mount => handle_mount_command(session, state, sub_arg).await,
        SiteCommand::Unmount => handle_unmount_command(session, state, sub_arg).await,
    }
}
