use std::io::{self, Write};

use dotenv::dotenv;
use futures::StreamExt;
use parlance::responses::StreamEvent;
use parlance::{Conversation, OpenAiConfig, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;
    let mut conversation = Conversation::new(&client);

    println!("Assistant (streaming):");
    let mut stream = conversation
        .stream("Tell a short story about a lighthouse keeper.")
        .await?;

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::OutputTextDelta { delta, .. } => {
                print!("{delta}");
                io::stdout().flush()?;
            }
            StreamEvent::Completed { response } => {
                // Adopting the final snapshot lets the next turn chain
                // onto the streamed one.
                conversation.adopt(&response);
            }
            _ => {}
        }
    }
    println!();

    let summary = conversation
        .send("Now summarize that story in one sentence.")
        .await?;
    println!("\nSummary: {}", summary.text);

    Ok(())
}
