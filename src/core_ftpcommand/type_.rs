use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::split;
use crate::server::ServerState;
use crate::session::{RepresentationType, Session};
use log::debug;
use std::sync::Arc;

/// Accepts `A`, `A N` and `I`, case-insensitively.
fn parse_type(arg: &str) -> Option<RepresentationType> {
    let parts = split(arg, ' ', 1);
    let (kind, param) = (parts[0].as_str(), parts[1].as_str());
    if kind.eq_ignore_ascii_case("A") && (param.is_empty() || param.eq_ignore_ascii_case("N")) {
        Some(RepresentationType::Ascii)
    } else if kind.eq_ignore_ascii_case("I") && param.is_empty() {
        Some(RepresentationType::Image)
    } else {
        None
    }
}

/// Handles the TYPE FTP command.
///
/// Both types transfer bytes unchanged; the type is only recorded.
pub async fn handle_type_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    let Some(representation_type) = parse_type(arg) else {
        session.reply(501, "Syntax error in parameters.").await?;
        return Ok(CommandOutcome::Continue);
    };

    session.representation_type = representation_type;
    debug!("Session {}: type set to {:?}", session.id, session.representation_type);
    let kind = split(arg, ' ', 1).swap_remove(0);
    session.reply(200, &format!("Type set to {}.", kind)).await?;
    Ok(CommandOutcome::Continue)
}
