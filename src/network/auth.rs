use crate::common::{OutboundRequest, Packet};
use crate::error::ChatError;

use super::transport::Connection;

/// Opens a connection and signs in. On success the connection is ready for
/// [`Connection::run`]; anything the server sent right after `login_ok` stays
/// buffered for the receive loop.
pub async fn sign_in(addr: &str, username: &str, password: &str) -> Result<Connection, ChatError> {
    let packet = OutboundRequest::SignIn {
        username: username.to_string(),
        password: password.to_string(),
    }
    .into_packet()?;

    let mut connection = Connection::open(addr).await?;
    connection.send(&packet).await?;
    await_reply(&mut connection, "login_ok").await?;
    log::info!("Signed in to {addr} as {username}");
    Ok(connection)
}

/// Registers a new account. The server closes the connection afterwards, so
/// only its confirmation text is returned.
pub async fn sign_up(
    addr: &str,
    username: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<String, ChatError> {
    let packet = OutboundRequest::SignUp {
        username: username.to_string(),
        password: password.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
    .into_packet()?;

    let mut connection = Connection::open(addr).await?;
    connection.send(&packet).await?;
    let reply = await_reply(&mut connection, "signup_ok").await?;
    log::info!("Registered {username} at {addr}");
    Ok(reply.content.unwrap_or_default())
}

async fn await_reply(connection: &mut Connection, expected: &str) -> Result<Packet, ChatError> {
    let Some(reply) = connection.recv().await? else {
        return Err(ChatError::Disconnected);
    };
    if reply.kind == expected {
        return Ok(reply);
    }
    if reply.kind == "error" {
        return Err(ChatError::Rejected(
            reply.content.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    Err(ChatError::UnexpectedReply(reply.kind))
}
