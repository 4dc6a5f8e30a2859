//! Console front end: one line per input.
//!
//! A line starting with `@` is a button press carrying callback data
//! (`@item:add:05`); anything else is a typed message.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use stockroom_bot::{Assistant, Input, Keyboard, Reply};
use stockroom_infra::{Config, load_tariffs, open_ledger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = Config::from_env()?;
    let tariffs = load_tariffs(config.tariffs_path.as_deref())?;
    let ledger = open_ledger(&config.database)
        .await
        .context("failed to open inventory ledger")?;

    tracing::info!(
        database = ?config.database,
        policy = ?config.overage_policy,
        destinations = tariffs.len(),
        "stockroom console started"
    );

    let assistant = Assistant::new(ledger, tariffs, config.overage_policy);
    let session = config.session;

    let mut stdout = tokio::io::stdout();
    let welcome = assistant.handle(&session, Input::message("/start")).await;
    stdout.write_all(render(&welcome).as_bytes()).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let input = match line.strip_prefix('@') {
            Some(data) => Input::callback(data),
            None => Input::message(line),
        };
        let reply = assistant.handle(&session, input).await;
        stdout.write_all(render(&reply).as_bytes()).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed; stopping");
    Ok(())
}

fn render(reply: &Reply) -> String {
    let mut out = String::new();
    if let Some(notice) = &reply.notice {
        out.push_str(&format!("[{notice}]\n"));
    }
    out.push_str(reply.text.trim_end());
    out.push('\n');

    match &reply.keyboard {
        Some(Keyboard::Menu(rows)) => {
            for row in rows {
                let labels: Vec<String> = row.iter().map(|l| format!("[{l}]")).collect();
                out.push_str(&format!("  {}\n", labels.join(" ")));
            }
        }
        Some(Keyboard::Inline(rows)) => {
            for row in rows {
                let buttons: Vec<String> = row
                    .iter()
                    .map(|b| format!("[{} @{}]", b.label, b.callback.to_data()))
                    .collect();
                out.push_str(&format!("  {}\n", buttons.join(" ")));
            }
        }
        None => {}
    }
    out.push('\n');
    out
}
