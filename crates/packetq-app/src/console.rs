//! 대화형 콘솔.
//!
//! 한 줄에 명령 하나. 파싱은 순수 함수([`parse_command`])이고,
//! 콘솔 루프는 파싱된 명령을 폴러에 전달하기만 한다.

use packetq_core::models::params::ParamKey;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::poller::ParamCommand;

pub const HELP: &str = "\
commands:
  set <key> <value>   edit a parameter (bandwidth, buffer, delay, loss)
  submit              send edited parameters to the packet queue
  reset               restore the packet queue's startup parameters
  meter               show attempted/delivered bytes per pipe
  show                show current parameters
  help                show this help
  quit                exit";

/// 콘솔 명령
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Param(ParamCommand),
    Help,
    Quit,
}

/// 한 줄 파싱. 빈 줄이면 `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => return Ok(None),
        "set" => {
            let (key, value) = match rest.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (rest, ""),
            };
            if key.is_empty() {
                return Err("usage: set <key> <value>".to_string());
            }
            let key = ParamKey::parse(key).ok_or_else(|| format!("unknown parameter: {key}"))?;
            ConsoleCommand::Param(ParamCommand::Set(key, value.to_string()))
        }
        "submit" => ConsoleCommand::Param(ParamCommand::Submit),
        "reset" => ConsoleCommand::Param(ParamCommand::Reset),
        "meter" => ConsoleCommand::Param(ParamCommand::Meter),
        "show" => ConsoleCommand::Param(ParamCommand::Show),
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

/// 입력이 끝나거나 `quit`을 받을 때까지 실행.
/// `quit`으로 끝났으면 `true`.
pub async fn run<R>(reader: R, commands: mpsc::Sender<ParamCommand>) -> bool
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("콘솔 입력 종료");
                return false;
            }
            Err(e) => {
                warn!("콘솔 입력 읽기 실패: {e}");
                return false;
            }
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Help)) => println!("{HELP}"),
            Ok(Some(ConsoleCommand::Quit)) => return true,
            Ok(Some(ConsoleCommand::Param(command))) => {
                if commands.send(command).await.is_err() {
                    debug!("폴러가 종료되어 콘솔을 닫음");
                    return false;
                }
            }
            Err(message) => println!("{message}"),
        }
    }
}
