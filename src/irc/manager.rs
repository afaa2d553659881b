use crate::app::event::AppEvent;
use crate::irc::connection::{spawn_connection, ChatConnection};
use anyhow::Result;
use tokio::sync::mpsc;

/// Owns the single chat connection and wraps the send paths the app
/// needs. Sends are no-ops while disconnected; the caller sees connection
/// state through [`AppEvent`]s instead.
pub struct ChatManager {
    connection: Option<ChatConnection>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ChatManager {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            connection: None,
            event_tx,
        }
    }

    pub async fn connect(
        &mut self,
        host: String,
        port: u16,
        tls: bool,
        nickname: String,
        password: Option<String>,
        channels: Vec<String>,
    ) -> Result<()> {
        let conn = spawn_connection(
            host,
            port,
            tls,
            nickname,
            password,
            channels,
            self.event_tx.clone(),
        )
        .await?;
        self.connection = Some(conn);
        Ok(())
    }

    fn sender(&self) -> Option<&irc::client::Sender> {
        self.connection.as_ref().map(|c| &c.sender)
    }

    pub fn send_privmsg(&self, target: &str, text: &str) -> Result<()> {
        if let Some(sender) = self.sender() {
            // Validate: no CTCP injection in outbound messages
            let clean = text.replace('\x01', "");
            sender.send_privmsg(target, &clean)?;
        }
        Ok(())
    }

    pub fn send_join(&self, channel: &str) -> Result<()> {
        if let Some(sender) = self.sender() {
            sender.send_join(channel)?;
        }
        Ok(())
    }

    pub fn send_part(&self, channel: &str) -> Result<()> {
        if let Some(sender) = self.sender() {
            sender.send(irc::client::prelude::Command::PART(
                channel.to_string(),
                None,
            ))?;
        }
        Ok(())
    }

    pub fn send_quit(&mut self, message: Option<&str>) {
        if let Some(conn) = self.connection.take() {
            let _ = conn.sender.send_quit(message.unwrap_or("Leaving"));
        }
    }
}
