use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use log::{debug, warn};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Handles the PASV FTP command.
///
/// Any previous listener is closed first. The new one binds on the next port
/// of the server-wide counter and is announced with the configured
/// `pasv_address`, or the local address of the control connection.
pub async fn handle_pasv_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session.data.close_passive();

    let port = state.next_passive_port();
    let listener = match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!("Session {}: unable to bind passive port {}: {}", session.id, port, e);
            session.reply(520, "Unable to bind listening socket.").await?;
            return Ok(CommandOutcome::Continue);
        }
    };

    let port = listener.local_addr().map(|addr| addr.port()).unwrap_or(port);
    let ip = announced_address(state, session.local_addr.ip());
    debug!("Session {}: listening for data on {}:{}", session.id, ip, port);
    session.data.set_passive(listener);
    session.reply(227, &format_pasv_reply(ip, port)).await?;
    Ok(CommandOutcome::Continue)
}

fn announced_address(state: &ServerState, local: IpAddr) -> Ipv4Addr {
    let configured = &state.config.server.pasv_address;
    if !configured.is_empty() {
        match configured.parse::<Ipv4Addr>() {
            Ok(ip) => return ip,
            Err(e) => warn!("Ignoring invalid pasv_address {:?}: {}", configured, e),
        }
    }
    match local {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(ip) => ip.to_ipv4_mapped().unwrap_or(Ipv4Addr::UNSPECIFIED),
    }
}

/// Formats the text of a `227` reply.
pub fn format_pasv_reply(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{}).",
        h1,
        h2,
        h3,
        h4,
        port >> 8,
        port & 0xff
    )
}
