use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_vfs::DeviceManager;
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_mount_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    alias: &str,
) -> CommandResult {
    if state.vfs.devices().mount(alias) {
        session.reply(250, "Mounted.").await?;
    } else {
        session.reply(550, "Unable to mount.").await?;
    }
    Ok(CommandOutcome::Continue)
}

pub async fn handle_unmount_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    alias: &str,
) -> CommandResult {
    if state.vfs.devices().unmount(alias) {
        session.reply(250, "Unmounted.").await?;
    } else {
        session.reply(550, "Unable to unmount.").await?;
    }
    Ok(CommandOutcome::Continue)
}
