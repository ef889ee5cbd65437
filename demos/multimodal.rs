use dotenv::dotenv;
use parlance::responses::{ContentPart, InputItem};
use parlance::{Conversation, OpenAiConfig, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let path = std::env::args().nth(1).unwrap_or_else(|| "photo.png".to_string());
    let image = tokio::fs::read(&path).await?;

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;
    let mut conversation = Conversation::new(&client);

    // The image travels inline as a base64 data URL.
    let reply = conversation
        .send_items(vec![InputItem::user_parts(vec![
            ContentPart::text("What is in this image?"),
            ContentPart::image_bytes("image/png", &image),
        ])])
        .await?;

    println!("Assistant: {}", reply.text);

    Ok(())
}
