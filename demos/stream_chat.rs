//! Streaming chat through OpenRouter
//!
//! Prints the model's reply to stdout as it arrives.
//!
//! ```bash
//! export OPENROUTER_API_KEY="sk-or-..."
//! export TASKMASTER_LOG_LEVEL=debug   # optional
//! cargo run --example stream_chat -- "Split this feature into three tasks"
//! ```

use std::io::Write;

use futures::StreamExt;
use taskmaster_llm::prelude::*;
use taskmaster_llm::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = telemetry::init_from_env()?;

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.is_empty() {
        "Give me three tips for writing a good task description.".to_string()
    } else {
        prompt
    };

    let client = OpenRouterClient::builder().build()?;
    println!("Model: {}\n", client.config().default_model());

    let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
        .with_system("You are a concise project planning assistant.");

    let mut stream = client.messages().create(&request).await?;

    // Ctrl-C ends the stream and closes the connection.
    let cancel = stream.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut stdout = std::io::stdout();
    while let Some(event) = stream.next().await {
        match event {
            Ok(event) => {
                print!("{}", event.text());
                stdout.flush()?;
            }
            Err(e) => {
                eprintln!("\nStream error: {e}");
                break;
            }
        }
    }
    println!();

    Ok(())
}
