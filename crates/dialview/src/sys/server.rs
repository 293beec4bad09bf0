use crate::config::CellLabel;
use crate::events::AppEvent;
use async_channel::Sender;
use strum::{Display, EnumString};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

pub const SOCKET_PATH: &str = "/tmp/dialview.sock";

/// First word of a control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Scroll,
    Add,
    Spin,
}

/// Parses `scroll <index>`, `add <label>` or `spin <velocity>`.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let (verb, arg) = line.trim().split_once(char::is_whitespace)?;
    let arg = arg.trim();

    match verb.parse::<Verb>().ok()? {
        Verb::Scroll => arg.parse().ok().map(AppEvent::ScrollTo),
        Verb::Add => (!arg.is_empty()).then(|| AppEvent::AddCell(CellLabel::new(arg))),
        Verb::Spin => arg
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(AppEvent::Spin),
    }
}

async fn serve_client(stream: UnixStream, tx: Sender<AppEvent>) {
    let mut lines = BufReader::new(stream).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(&line) {
            Some(event) => {
                log::debug!("Control command: {:?}", event);
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            None => log::warn!("Ignoring control line '{}'", line.trim()),
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // stale socket from a previous run
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(serve_client(stream, tx.clone()));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cases = vec![
            ("scroll 3", Some(AppEvent::ScrollTo(3))),
            ("SCROLL  7\n", Some(AppEvent::ScrollTo(7))),
            ("add Sat", Some(AppEvent::AddCell(CellLabel::new("Sat")))),
            ("add  Two words ", Some(AppEvent::AddCell(CellLabel::new("Two words")))),
            ("spin -0.4", Some(AppEvent::Spin(-0.4))),
            ("spin NaN", None),
            ("scroll -1", None),
            ("scroll", None),
            ("add ", None),
            ("jump 2", None),
            ("", None),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_command(line), expected, "{line:?}");
        }
    }

    #[test]
    fn test_verb_display_round_trips() {
        for verb in [Verb::Scroll, Verb::Add, Verb::Spin] {
            assert_eq!(verb.to_string().parse::<Verb>().unwrap(), verb);
        }
        assert_eq!(Verb::Scroll.to_string(), "scroll");
    }

    #[tokio::test]
    async fn test_client_lines_become_events() {
        let (client, server) = UnixStream::pair().unwrap();
        let (tx, rx) = async_channel::unbounded();
        let handle = tokio::spawn(serve_client(server, tx));

        {
            use tokio::io::AsyncWriteExt;
            let mut client = client;
            client.write_all(b"scroll 2\nbogus\nadd Sun\n").await.unwrap();
        }

        handle.await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), AppEvent::ScrollTo(2));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::AddCell(CellLabel::new("Sun")));
        assert!(rx.is_empty());
    }
}
