use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use card24_core::{ClientMessage, Operator, ServerMessage, SessionSnapshot};

const DEFAULT_URL: &str = "ws://127.0.0.1:25924/ws";

/// 用户在终端输入的一条命令
#[derive(Debug, PartialEq)]
enum Command {
    Send(ClientMessage),
    /// 按手牌位置选牌 (从 1 开始)
    SelectAt(usize),
    Show,
    Exit,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(&std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string()))?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();
    // 最近一次收到的快照，输入按位置选牌时需要它
    let (snapshot_tx, snapshot_rx) = watch::channel::<Option<SessionSnapshot>>(None);

    // 启动一个任务来处理从服务器接收的消息
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(ServerMessage::SessionSnapshot(snapshot)) => {
                        println!("\n{}", render(&snapshot));
                        snapshot_tx.send_replace(Some(snapshot));
                    }
                    Ok(ServerMessage::GameOver { title, message, .. }) => {
                        println!("\n*** {} {} ***  (输入 restart 重新开局)", title, message);
                    }
                    Ok(ServerMessage::Error { message }) => println!("\n[错误] {}", message),
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
            print!("> "); // 重新显示输入提示符
            let _ = std::io::stdout().flush();
        }
    });

    // 主任务处理用户输入
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    print_help();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else { break };
        let client_msg = match parse_command(&line) {
            Ok(Command::Send(msg)) => msg,
            Ok(Command::SelectAt(pos)) => {
                let card_id = snapshot_rx
                    .borrow()
                    .as_ref()
                    .and_then(|s| s.hand.get(pos - 1))
                    .map(|c| c.id.clone());
                match card_id {
                    Some(card_id) => ClientMessage::ToggleSelect { card_id },
                    None => {
                        println!("没有第 {} 张牌", pos);
                        continue;
                    }
                }
            }
            Ok(Command::Show) => ClientMessage::GetSnapshot,
            Ok(Command::Exit) => {
                println!("正在断开连接...");
                break;
            }
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };

        let payload = serde_json::to_string(&client_msg)?;
        write.send(Message::Text(payload.into())).await?;
    }

    Ok(())
}

fn print_help() {
    println!("--- 24 点客户端 ---");
    println!("可用命令:");
    println!("  s <位置>                  - 按位置选中/取消选中一张牌");
    println!("  select <牌id>             - 按 id 选中/取消选中一张牌");
    println!("  + - * /                   - 对选中的两张牌运算 (先选的在左边)");
    println!("  restart                   - 重新发牌");
    println!("  show                      - 重新显示当前局面");
    println!("  exit                      - 退出");
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["s", pos] => match pos.parse::<usize>() {
            Ok(pos) if pos >= 1 => Ok(Command::SelectAt(pos)),
            _ => Err(format!("无效的位置: {}", pos)),
        },
        ["s", ..] => Err("用法: s <位置>".to_string()),
        ["select", card_id] => Ok(Command::Send(ClientMessage::ToggleSelect { card_id: card_id.to_string() })),
        ["select", ..] => Err("用法: select <牌id>".to_string()),
        ["restart"] => Ok(Command::Send(ClientMessage::Restart)),
        ["show"] => Ok(Command::Show),
        ["exit"] => Ok(Command::Exit),
        [symbol] => match Operator::from_symbol(symbol) {
            Some(op) => Ok(Command::Send(op.into())),
            None => Err(format!("未知命令: {}", line.trim())),
        },
        _ => Err(format!("未知命令: {}", line.trim())),
    }
}

/// 把快照渲染成终端文本
fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::from("手牌:\n");
    for (i, card) in snapshot.hand.iter().enumerate() {
        let mark = match snapshot.selection.iter().position(|id| *id == card.id) {
            Some(0) => "  <- 左",
            Some(_) => "  <- 右",
            None => "",
        };
        out.push_str(&format!("  [{}] {}{}\n", i + 1, card, mark));
    }
    if !snapshot.history.is_empty() {
        out.push_str("运算记录:\n");
        for step in &snapshot.history {
            out.push_str(&format!("  {}\n", step));
        }
    }
    if !snapshot.operators.is_empty() {
        let symbols: Vec<_> = snapshot.operators.iter().map(|op| op.symbol()).collect();
        out.push_str(&format!("可用运算: {}\n", symbols.join(" ")));
    }
    out
}
