use dotenv::dotenv;
use parlance::{Conversation, OpenAiConfig, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;
    let mut conversation = Conversation::new(&client);

    let reply = conversation.send("Write a haiku about rain.").await?;
    println!("Created {}:\n{}\n", reply.response_id, reply.text);

    // Stored responses can be fetched again by handle.
    let fetched = client.retrieve(&reply.response_id).await?;
    println!("Retrieved: {}", fetched.output_text());

    let items = client.list_input_items(&reply.response_id).await?;
    println!("Input items: {}", items.data.len());

    let ack = client.delete(&reply.response_id).await?;
    println!("Deleted {} (deleted = {})", ack.id, ack.deleted);

    match client.delete(&reply.response_id).await {
        Err(e) if e.is_not_found() => println!("Second delete: already gone"),
        other => println!("Second delete: unexpected outcome {other:?}"),
    }

    Ok(())
}
