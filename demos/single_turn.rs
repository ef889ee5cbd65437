use dotenv::dotenv;
use parlance::{Conversation, OpenAiConfig, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;
    let mut conversation = Conversation::new(&client);

    let reply = conversation.send("What is 2+2?").await?;

    println!("Assistant:\n{}", reply.text);
    println!("\nResponse id: {}", reply.response_id);
    if let Some(message_id) = &reply.message_id {
        println!("Message id:  {message_id}");
    }
    if let Some(usage) = reply.usage {
        println!(
            "Tokens:      {} in, {} out",
            usage.input_tokens, usage.output_tokens
        );
    }
    println!("Time taken:  {:.2}s", reply.elapsed.as_secs_f64());

    Ok(())
}
