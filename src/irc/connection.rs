use crate::app::event::AppEvent;
use anyhow::Result;
use futures::StreamExt;
use irc::client::prelude::*;
use tokio::sync::mpsc;

pub struct ChatConnection {
    pub sender: irc::client::Sender,
}

/// Connect to the chat server and spawn a reader task that forwards every
/// inbound message to the app event channel. PINGs are answered by the
/// `irc` crate itself.
pub async fn spawn_connection(
    host: String,
    port: u16,
    tls: bool,
    nickname: String,
    password: Option<String>,
    channels: Vec<String>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> Result<ChatConnection> {
    let config = Config {
        server: Some(host),
        port: Some(port),
        use_tls: Some(tls),
        nickname: Some(nickname),
        password,
        channels,
        ..Config::default()
    };

    let mut client = Client::from_config(config).await?;
    client.identify()?;

    let sender = client.sender();
    let mut stream = client.stream()?;

    let _ = event_tx.send(AppEvent::IrcConnected);

    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    if event_tx.send(AppEvent::IrcMessage { message }).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = event_tx.send(AppEvent::IrcError {
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }
        let _ = event_tx.send(AppEvent::IrcDisconnected {
            reason: "Connection closed".to_string(),
        });
    });

    Ok(ChatConnection { sender })
}
