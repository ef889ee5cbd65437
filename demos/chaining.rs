use dotenv::dotenv;
use parlance::{AzureConfig, Conversation, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Reads AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_DEPLOYMENT_NAME and
    // AZURE_OPENAI_API_KEY from the environment. OpenAiConfig works the
    // same way with OPENAI_API_KEY.
    let client = ResponsesClient::new(AzureConfig::from_env()?)?;
    let mut conversation = Conversation::new(&client);

    let first = conversation
        .send("Pick a number between 1 and 10 and remember it.")
        .await?;
    println!("Assistant: {}", first.text);

    // The second turn carries no history of its own; the service links it
    // to the first through its response id.
    let second = conversation.send("What number did you pick?").await?;
    println!("Assistant: {}", second.text);

    println!("\nLatest response id: {:?}", conversation.last_response_id());

    Ok(())
}
