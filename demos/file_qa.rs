use dotenv::dotenv;
use parlance::responses::{ContentPart, FileUpload, InputItem};
use parlance::{Conversation, OpenAiConfig, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let path = std::env::args().nth(1).unwrap_or_else(|| "report.pdf".to_string());
    let bytes = tokio::fs::read(&path).await?;

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;

    let file = client
        .upload_file(FileUpload::user_data(path, bytes))
        .await?;
    println!("Uploaded {} ({} bytes)", file.id, file.bytes.unwrap_or(0));

    // The uploaded file is referenced by id instead of re-sending bytes.
    let mut conversation = Conversation::new(&client);
    let reply = conversation
        .send_items(vec![InputItem::user_parts(vec![
            ContentPart::text("Summarize this document in three bullet points."),
            ContentPart::file_id(&file.id),
        ])])
        .await?;

    println!("Assistant: {}", reply.text);

    Ok(())
}
